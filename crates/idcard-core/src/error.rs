//! Error types for the idcard-core library.

use thiserror::Error;

/// Main error type for the idcard library.
#[derive(Error, Debug)]
pub enum IdCardError {
    /// Request rejected before it reached the pipeline.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// OCR collaborator failure.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// NER collaborator failure.
    #[error("NER error: {0}")]
    Ner(#[from] NerError),

    /// Malformed pipeline input.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdCardError {
    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            IdCardError::Input(e) => e.status_code(),
            IdCardError::Extraction(ExtractionError::InvalidThreshold(_)) => 422,
            _ => 500,
        }
    }

    /// Human-readable message for an error body.
    ///
    /// Collaborator failures carry the collaborator's own message unchanged.
    pub fn detail(&self) -> String {
        match self {
            IdCardError::Input(e) => e.to_string(),
            IdCardError::Ocr(e) => e.to_string(),
            IdCardError::Ner(e) => e.to_string(),
            IdCardError::Extraction(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors raised while decoding a request, before any processing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// The image payload is not valid base64.
    #[error("Invalid base64 image: {0}")]
    MalformedBase64(String),

    /// The image payload decoded to zero bytes.
    #[error("image payload is empty")]
    EmptyImage,

    /// A required request field is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The threshold is outside [0, 1].
    #[error("threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f32),
}

impl InputError {
    pub fn status_code(&self) -> u16 {
        match self {
            InputError::MalformedBase64(_) | InputError::EmptyImage => 400,
            InputError::MissingField(_) | InputError::ThresholdOutOfRange(_) => 422,
        }
    }
}

/// Errors raised by the OCR collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OcrError {
    /// The image bytes could not be decoded.
    #[error("unreadable image: {0}")]
    UnreadableImage(String),

    /// The engine failed while recognizing text.
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// Errors raised by the NER collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NerError {
    /// The model failed to load or run.
    #[error("NER model failed: {0}")]
    Model(String),
}

/// Malformed input the pipeline cannot process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// An entity span does not fit the normalized text.
    #[error("entity {index} span [{start}, {end}) does not fit text of length {len}")]
    EntityOutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// A token or entity confidence is outside [0, 1].
    #[error("{kind} {index} has confidence {value} outside [0, 1]")]
    InvalidConfidence {
        kind: &'static str,
        index: usize,
        value: f32,
    },

    /// The caller-supplied threshold is outside [0, 1].
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),
}

/// Errors in the extraction configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A configured regular expression failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A configured value is out of range.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// No accepted date formats are configured.
    #[error("at least one date format must be configured")]
    NoDateFormats,
}

/// Result type for the idcard library.
pub type Result<T> = std::result::Result<T, IdCardError>;

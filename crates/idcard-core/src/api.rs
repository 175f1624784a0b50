//! Request and response shapes for service front ends.
//!
//! Transport-agnostic: a front end deserializes an [`ExtractRequest`], calls
//! [`crate::IdCardExtractor::handle_request`] and serializes either the
//! [`crate::ExtractionResult`] or an [`ErrorBody`] with
//! [`IdCardError::status_code`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{IdCardError, InputError};
use crate::models::config::VersionConfig;

/// Extraction request carrying a base64-encoded image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub image: Option<String>,

    /// Minimum confidence for a field to be returned.
    #[serde(default)]
    pub threshold: Option<f32>,
}

/// A request that passed input validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRequest {
    pub image: Vec<u8>,
    pub threshold: f32,
}

impl ExtractRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            threshold: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Validate fields and decode the image.
    ///
    /// Missing fields and bad thresholds are reported before the payload is
    /// decoded.
    pub fn decode(&self, default_threshold: f32) -> Result<DecodedRequest, InputError> {
        let encoded = self.image.as_deref().ok_or(InputError::MissingField("image"))?;
        let threshold = resolve_threshold(self.threshold, default_threshold)?;
        let image = decode_image(encoded)?;
        Ok(DecodedRequest { image, threshold })
    }
}

/// Caller threshold or the default, checked against [0, 1].
pub fn resolve_threshold(threshold: Option<f32>, default: f32) -> Result<f32, InputError> {
    let threshold = threshold.unwrap_or(default);
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(InputError::ThresholdOutOfRange(threshold))
    }
}

/// Decode standard base64, ignoring ASCII whitespace (line-wrapped payloads).
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, InputError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| InputError::MalformedBase64(e.to_string()))?;
    if bytes.is_empty() {
        return Err(InputError::EmptyImage);
    }
    Ok(bytes)
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl From<&IdCardError> for ErrorBody {
    fn from(err: &IdCardError) -> Self {
        Self {
            detail: err.detail(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Version response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub model_version: String,
    pub config_version: String,
}

impl From<&VersionConfig> for VersionInfo {
    fn from(versions: &VersionConfig) -> Self {
        Self {
            model_version: versions.model_version.clone(),
            config_version: versions.config_version.clone(),
        }
    }
}

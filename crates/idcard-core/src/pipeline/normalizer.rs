//! OCR token cleanup and re-indexing.

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::token::{BoundingBox, OcrToken};
use crate::rules::text::{char_len, collapse_whitespace};

/// A cleaned token positioned in the normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedToken {
    /// Cleaned text, as it appears in the normalized text.
    pub text: String,
    /// Text exactly as the OCR engine produced it.
    pub original: String,
    /// Start character offset in the normalized text.
    pub start: usize,
    /// End character offset (exclusive) in the normalized text.
    pub end: usize,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

/// Concatenated normalized text and its tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedText {
    pub text: String,
    pub tokens: Vec<NormalizedToken>,
}

impl NormalizedText {
    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// ASCII-lowercased copy for pattern matching. Byte and character
    /// offsets are the same as in `text`.
    pub fn folded(&self) -> String {
        self.text.to_ascii_lowercase()
    }
}

/// Cleans the OCR token stream and joins it into one text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    separator: String,
    min_confidence: f32,
    substitutions: Vec<(String, String)>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            separator: config.token_separator.clone(),
            min_confidence: config.min_token_confidence,
            substitutions: config
                .artifact_substitutions
                .iter()
                .filter(|(from, _)| !from.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Set the token separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the minimum token confidence.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    /// Clean every token and re-index it into the joined text.
    ///
    /// Tokens that clean down to nothing, or fall below the confidence
    /// floor, are dropped. Confidences outside [0, 1] are rejected.
    pub fn normalize(&self, tokens: &[OcrToken]) -> Result<NormalizedText, ExtractionError> {
        let mut out = NormalizedText::default();
        let separator_len = char_len(&self.separator);
        let mut cursor = 0usize;

        for (index, token) in tokens.iter().enumerate() {
            if !(0.0..=1.0).contains(&token.confidence) {
                return Err(ExtractionError::InvalidConfidence {
                    kind: "token",
                    index,
                    value: token.confidence,
                });
            }
            if token.confidence < self.min_confidence {
                continue;
            }

            let cleaned = self.clean(&token.text);
            if cleaned.is_empty() {
                continue;
            }

            if !out.tokens.is_empty() {
                out.text.push_str(&self.separator);
                cursor += separator_len;
            }

            let start = cursor;
            cursor += char_len(&cleaned);
            out.text.push_str(&cleaned);

            out.tokens.push(NormalizedToken {
                text: cleaned,
                original: token.text.clone(),
                start,
                end: cursor,
                confidence: token.confidence,
                bbox: token.bbox,
            });
        }

        Ok(out)
    }

    fn clean(&self, raw: &str) -> String {
        let printable: String = raw
            .chars()
            .filter_map(|c| {
                if c.is_whitespace() {
                    Some(' ')
                } else if c.is_control() {
                    None
                } else {
                    Some(c)
                }
            })
            .collect();

        let corrected = self
            .substitutions
            .iter()
            .fold(printable, |acc, (from, to)| acc.replace(from.as_str(), to));

        collapse_whitespace(&corrected)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

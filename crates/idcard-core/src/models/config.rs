//! Configuration structures for the extraction pipeline.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Main configuration for the idcard pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdCardConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// ID-number fallback and validation rules.
    pub id_number: IdNumberConfig,

    /// Version information reported to callers.
    pub versions: VersionConfig,
}

/// Text normalization, mapping and validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Threshold used when the caller does not supply one.
    pub default_threshold: f32,

    /// Inserted between consecutive tokens in the normalized text.
    pub token_separator: String,

    /// Tokens with lower OCR confidence are dropped (0.0 keeps all).
    pub min_token_confidence: f32,

    /// Known OCR artifacts, replaced in order as `(from, to)`.
    pub artifact_substitutions: Vec<(String, String)>,

    /// Model-specific label spellings rewritten before label lookup.
    pub label_aliases: BTreeMap<String, String>,

    /// Joins multiple address spans.
    pub address_separator: String,

    /// Confidence multiplier for values that fail format validation.
    pub unverified_format_penalty: f32,

    /// Accepted input date formats (chrono syntax), tried in order.
    pub date_formats: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.7,
            token_separator: " ".to_string(),
            min_token_confidence: 0.0,
            artifact_substitutions: vec![
                ("\u{2014}".to_string(), "-".to_string()),
                ("\u{2013}".to_string(), "-".to_string()),
                ("\u{2018}".to_string(), "'".to_string()),
                ("\u{2019}".to_string(), "'".to_string()),
                ("\u{201c}".to_string(), "\"".to_string()),
                ("\u{201d}".to_string(), "\"".to_string()),
                ("\u{00a0}".to_string(), " ".to_string()),
            ],
            label_aliases: BTreeMap::new(),
            address_separator: ", ".to_string(),
            unverified_format_penalty: 0.5,
            date_formats: vec![
                "%m/%d/%Y".to_string(), // US first
                "%Y-%m-%d".to_string(),
                "%d.%m.%Y".to_string(),
                "%d-%m-%Y".to_string(),
                "%B %d, %Y".to_string(),
                "%d %b %Y".to_string(),
                "%b %d, %Y".to_string(),
            ],
        }
    }
}

/// Check-digit scheme for ID numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdChecksum {
    /// Length check only.
    #[default]
    None,

    /// Luhn mod-10 over an all-digit number.
    Luhn,

    /// Weighted sum of all characters but the last, modulo `modulus`, must
    /// equal the last character. Weights repeat; letters count A=10..Z=35
    /// and the filler `<` counts 0 (ICAO 9303 uses weights 7,3,1 mod 10).
    Weighted { weights: Vec<u32>, modulus: u32 },
}

/// ID-number fallback and validation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdNumberConfig {
    /// Scanned over the normalized text when NER finds no ID number.
    pub fallback_pattern: String,

    /// Confidence given to a fallback match.
    pub regex_match_confidence: f32,

    /// Minimum length after stripping non-alphanumerics.
    pub min_length: usize,

    /// Maximum length after stripping non-alphanumerics.
    pub max_length: usize,

    pub checksum: IdChecksum,
}

impl Default for IdNumberConfig {
    fn default() -> Self {
        Self {
            fallback_pattern: r"\b\d{9}\b".to_string(),
            regex_match_confidence: 0.8,
            min_length: 6,
            max_length: 20,
            checksum: IdChecksum::None,
        }
    }
}

/// Versions reported by the version endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    pub model_version: String,
    pub config_version: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            model_version: "1.0.0".to_string(),
            config_version: "1.0.0".to_string(),
        }
    }
}

impl IdCardConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check ranges and patterns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ex = &self.extraction;
        check_unit("extraction.default_threshold", ex.default_threshold)?;
        check_unit("extraction.min_token_confidence", ex.min_token_confidence)?;
        check_unit(
            "extraction.unverified_format_penalty",
            ex.unverified_format_penalty,
        )?;
        if ex.date_formats.is_empty() {
            return Err(ConfigError::NoDateFormats);
        }

        let id = &self.id_number;
        check_unit("id_number.regex_match_confidence", id.regex_match_confidence)?;
        if id.min_length > id.max_length {
            return Err(ConfigError::InvalidValue {
                key: "id_number.min_length",
                reason: format!(
                    "{} is greater than max_length {}",
                    id.min_length, id.max_length
                ),
            });
        }
        if let IdChecksum::Weighted { weights, modulus } = &id.checksum {
            if weights.is_empty() || *modulus == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "id_number.checksum",
                    reason: "weighted checksum needs weights and a non-zero modulus".to_string(),
                });
            }
            if let Some(w) = weights.iter().find(|w| **w > MAX_CHECKSUM_WEIGHT) {
                return Err(ConfigError::InvalidValue {
                    key: "id_number.checksum",
                    reason: format!("weight {w} is greater than {MAX_CHECKSUM_WEIGHT}"),
                });
            }
        }
        Regex::new(&id.fallback_pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: id.fallback_pattern.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

/// Largest accepted weight in a weighted checksum.
pub const MAX_CHECKSUM_WEIGHT: u32 = 1_000;

fn check_unit(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}

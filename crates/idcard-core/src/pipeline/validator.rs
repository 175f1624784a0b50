//! Per-field canonicalization and format validation.
//!
//! Validation never fails a request. A value that does not pass keeps its
//! raw text and has its confidence multiplied by the configured penalty.
//! An empty value never passes.

use tracing::warn;

use crate::models::config::{ExtractionConfig, IdNumberConfig};
use crate::models::result::{ExtractedField, FieldName};
use crate::rules::dates::normalize_date;
use crate::rules::id_number::{normalize_id, validate_id};
use crate::rules::text::collapse_whitespace;

/// A formatted value and whether it passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub value: String,
    pub verified: bool,
}

impl Formatted {
    fn verified(value: String) -> Self {
        Self { value, verified: true }
    }

    fn unverified(value: String) -> Self {
        Self { value, verified: false }
    }
}

/// Formats and validates field values.
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator<'a> {
    extraction: &'a ExtractionConfig,
    id_rules: &'a IdNumberConfig,
}

impl<'a> FieldValidator<'a> {
    pub fn new(extraction: &'a ExtractionConfig, id_rules: &'a IdNumberConfig) -> Self {
        Self { extraction, id_rules }
    }

    /// Canonical form of `raw` for `field`.
    pub fn format(&self, field: FieldName, raw: &str) -> Formatted {
        match field {
            FieldName::DateOfBirth | FieldName::ExpiryDate => {
                match normalize_date(raw, &self.extraction.date_formats) {
                    Some(iso) => Formatted::verified(iso),
                    None => Formatted::unverified(raw.to_string()),
                }
            }
            FieldName::IdNumber => {
                let id = normalize_id(raw);
                if id.is_empty() {
                    Formatted::unverified(raw.to_string())
                } else if validate_id(&id, self.id_rules) {
                    Formatted::verified(id)
                } else {
                    Formatted::unverified(id)
                }
            }
            FieldName::Name | FieldName::Address => {
                let value = collapse_whitespace(raw);
                if value.is_empty() {
                    Formatted::unverified(value)
                } else {
                    Formatted::verified(value)
                }
            }
        }
    }

    /// Format `raw` and apply the penalty to `confidence` if it fails.
    pub fn apply(&self, field: FieldName, raw: &str, confidence: f32) -> ExtractedField {
        let formatted = self.format(field, raw);
        if formatted.verified {
            ExtractedField::new(formatted.value, confidence)
        } else {
            let penalized = confidence * self.extraction.unverified_format_penalty;
            warn!(
                "{} value {:?} failed format validation, confidence {:.3} -> {:.3}",
                field, formatted.value, confidence, penalized
            );
            ExtractedField::new(formatted.value, penalized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::IdChecksum;

    fn with<F: FnOnce(FieldValidator<'_>)>(id_rules: IdNumberConfig, f: F) {
        let extraction = ExtractionConfig::default();
        f(FieldValidator::new(&extraction, &id_rules));
    }

    #[test]
    fn test_date_round_trip() {
        with(IdNumberConfig::default(), |v| {
            let field = v.apply(FieldName::DateOfBirth, "01/01/1990", 0.9);
            assert_eq!(field.value, "1990-01-01");
            assert_eq!(field.confidence, 0.9);
        });
    }

    #[test]
    fn test_unparseable_date_keeps_raw_and_is_penalized() {
        with(IdNumberConfig::default(), |v| {
            let field = v.apply(FieldName::ExpiryDate, "3I/I2/2O3O", 0.8);
            assert_eq!(field.value, "3I/I2/2O3O");
            assert!((field.confidence - 0.4).abs() < 1e-6);
        });
    }

    #[test]
    fn test_id_is_stripped() {
        with(IdNumberConfig::default(), |v| {
            let field = v.apply(FieldName::IdNumber, "123-456 789", 0.8);
            assert_eq!(field.value, "123456789");
            assert_eq!(field.confidence, 0.8);
        });
    }

    #[test]
    fn test_id_failing_checksum_is_penalized() {
        let rules = IdNumberConfig {
            checksum: IdChecksum::Luhn,
            ..IdNumberConfig::default()
        };
        with(rules, |v| {
            let field = v.apply(FieldName::IdNumber, "7992-7398-710", 1.0);
            assert_eq!(field.value, "79927398710");
            assert_eq!(field.confidence, 0.5);

            let field = v.apply(FieldName::IdNumber, "7992-7398-713", 1.0);
            assert_eq!(field.confidence, 1.0);
        });
    }

    #[test]
    fn test_short_id_is_penalized() {
        with(IdNumberConfig::default(), |v| {
            let formatted = v.format(FieldName::IdNumber, "A-12");
            assert_eq!(formatted, Formatted { value: "A12".into(), verified: false });
        });
    }

    #[test]
    fn test_punctuation_only_id_keeps_raw() {
        with(IdNumberConfig::default(), |v| {
            let formatted = v.format(FieldName::IdNumber, "--/--");
            assert_eq!(formatted.value, "--/--");
            assert!(!formatted.verified);
        });
    }

    #[test]
    fn test_name_and_address_whitespace() {
        with(IdNumberConfig::default(), |v| {
            assert_eq!(v.format(FieldName::Name, "  JOHN   DOE ").value, "JOHN DOE");
            let address = v.format(FieldName::Address, "12  MAIN ST,  SPRINGFIELD");
            assert_eq!(address, Formatted::verified("12 MAIN ST, SPRINGFIELD".into()));
        });
    }

    #[test]
    fn test_empty_name_is_penalized() {
        with(IdNumberConfig::default(), |v| {
            let field = v.apply(FieldName::Name, "   ", 0.9);
            assert_eq!(field.value, "");
            assert!((field.confidence - 0.45).abs() < 1e-6);
        });
    }
}

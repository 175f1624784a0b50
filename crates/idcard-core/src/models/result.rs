//! Field candidates and the final extraction result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical identity-card fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Name,
    IdNumber,
    DateOfBirth,
    Address,
    ExpiryDate,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::Name,
        FieldName::IdNumber,
        FieldName::DateOfBirth,
        FieldName::Address,
        FieldName::ExpiryDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::IdNumber => "id_number",
            FieldName::DateOfBirth => "date_of_birth",
            FieldName::Address => "address",
            FieldName::ExpiryDate => "expiry_date",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// One or more NER entities.
    Entity,
    /// The ID-number fallback pattern.
    RegexFallback,
}

/// An unresolved proposal for a field's value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCandidate {
    pub field: FieldName,
    /// Text of the source span(s) in the normalized text.
    pub raw_value: String,
    /// Entity-level (or fallback) confidence, before token scoring.
    pub confidence: f32,
    /// Character span `(start, end)` in the normalized text.
    pub source_span: (usize, usize),
    /// Indices of the normalized tokens supporting this candidate.
    pub tokens: Vec<usize>,
    pub source: CandidateSource,
}

/// A resolved, scored and formatted field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub value: String,
    pub confidence: f32,
}

impl ExtractedField {
    pub fn new(value: impl Into<String>, confidence: f32) -> Self {
        Self {
            value: value.into(),
            confidence: clamp_unit(confidence),
        }
    }
}

/// The externally visible result of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub extracted_fields: BTreeMap<FieldName, String>,
    pub confidence_scores: BTreeMap<FieldName, f32>,
    pub raw_text: String,
    pub overall_confidence: f32,
}

impl ExtractionResult {
    /// Result with no fields for the given text.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    pub fn field(&self, name: FieldName) -> Option<ExtractedField> {
        let value = self.extracted_fields.get(&name)?;
        let confidence = *self.confidence_scores.get(&name)?;
        Some(ExtractedField {
            value: value.clone(),
            confidence,
        })
    }

    pub fn len(&self) -> usize {
        self.extracted_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extracted_fields.is_empty()
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_serializes_snake_case() {
        let mut result = ExtractionResult::empty("JOHN DOE");
        result.extracted_fields.insert(FieldName::DateOfBirth, "1990-01-01".into());
        result.confidence_scores.insert(FieldName::DateOfBirth, 0.9);

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""date_of_birth":"1990-01-01""#));
        assert!(json.contains(r#""raw_text":"JOHN DOE""#));
    }

    #[test]
    fn test_extracted_field_clamps() {
        assert_eq!(ExtractedField::new("x", 1.4).confidence, 1.0);
        assert_eq!(ExtractedField::new("x", -0.2).confidence, 0.0);
        assert_eq!(ExtractedField::new("x", f32::NAN).confidence, 0.0);
    }

    #[test]
    fn test_field_lookup() {
        let mut result = ExtractionResult::empty("");
        result.extracted_fields.insert(FieldName::Name, "JANE ROE".into());
        result.confidence_scores.insert(FieldName::Name, 0.8);

        let field = result.field(FieldName::Name).unwrap();
        assert_eq!(field.value, "JANE ROE");
        assert_eq!(field.confidence, 0.8);
        assert!(result.field(FieldName::Address).is_none());
    }
}

//! Threshold filtering and result assembly.

use std::collections::BTreeMap;

use crate::models::result::{ExtractedField, ExtractionResult, FieldName, clamp_unit};

/// Keep fields whose confidence reaches `threshold` and average them.
///
/// Fields below the threshold are left out of both maps entirely.
/// `raw_text` is carried through untouched.
pub fn aggregate(
    fields: BTreeMap<FieldName, ExtractedField>,
    raw_text: &str,
    threshold: f32,
) -> ExtractionResult {
    let mut result = ExtractionResult::empty(raw_text);

    for (name, field) in fields {
        if field.confidence >= threshold {
            result.confidence_scores.insert(name, field.confidence);
            result.extracted_fields.insert(name, field.value);
        }
    }

    if !result.confidence_scores.is_empty() {
        let total: f32 = result.confidence_scores.values().sum();
        result.overall_confidence = clamp_unit(total / result.confidence_scores.len() as f32);
    }

    result
}

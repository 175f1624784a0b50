//! Field confidence from entity and OCR token confidences.

use crate::models::result::{FieldCandidate, clamp_unit};

use super::normalizer::NormalizedToken;

/// Score a candidate: its own confidence when no token supports it,
/// otherwise that confidence times the mean confidence of its tokens.
///
/// A single weak token pulls the field down even when the recognizer was
/// sure of the span.
pub fn score(candidate: &FieldCandidate, tokens: &[NormalizedToken]) -> f32 {
    let supporting: Vec<f32> = candidate
        .tokens
        .iter()
        .filter_map(|&i| tokens.get(i))
        .map(|t| t.confidence)
        .collect();

    if supporting.is_empty() {
        return clamp_unit(candidate.confidence);
    }

    let mean = supporting.iter().sum::<f32>() / supporting.len() as f32;
    clamp_unit(candidate.confidence * mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::{CandidateSource, FieldName};

    fn token(confidence: f32) -> NormalizedToken {
        NormalizedToken {
            text: "X".into(),
            original: "X".into(),
            start: 0,
            end: 1,
            confidence,
            bbox: None,
        }
    }

    fn candidate(confidence: f32, tokens: Vec<usize>) -> FieldCandidate {
        FieldCandidate {
            field: FieldName::Name,
            raw_value: "X".into(),
            confidence,
            source_span: (0, 1),
            tokens,
            source: CandidateSource::Entity,
        }
    }

    #[test]
    fn test_no_tokens_trusts_entity() {
        assert_eq!(score(&candidate(0.83, vec![]), &[]), 0.83);
    }

    #[test]
    fn test_product_with_token_mean() {
        let tokens = [token(0.9), token(0.9)];
        let s = score(&candidate(0.95, vec![0, 1]), &tokens);
        assert!((s - 0.855).abs() < 1e-6, "score was {s}");
    }

    #[test]
    fn test_weak_token_pulls_down() {
        let tokens = [token(1.0), token(0.2)];
        let s = score(&candidate(1.0, vec![0, 1]), &tokens);
        assert!((s - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_result_in_unit_range() {
        let tokens = [token(1.0)];
        assert_eq!(score(&candidate(1.0, vec![0]), &tokens), 1.0);
        assert_eq!(score(&candidate(0.0, vec![0]), &tokens), 0.0);
    }
}

//! Maps NER entity spans back onto the OCR tokens they cover.

use crate::error::ExtractionError;
use crate::models::token::NerEntity;

use super::normalizer::NormalizedText;

/// An entity together with the indices of the tokens it overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedEntity {
    pub entity: NerEntity,
    /// Indices into `NormalizedText::tokens`, in text order.
    pub tokens: Vec<usize>,
}

impl AlignedEntity {
    pub fn is_aligned(&self) -> bool {
        !self.tokens.is_empty()
    }
}

/// Align every entity with the tokens whose `[start, end)` interval shares
/// at least one character with it.
///
/// An entity that overlaps no token is kept with an empty token list; its
/// own confidence then stands alone. Spans that do not fit the text and
/// confidences outside [0, 1] are rejected.
pub fn align(
    normalized: &NormalizedText,
    entities: &[NerEntity],
) -> Result<Vec<AlignedEntity>, ExtractionError> {
    let len = normalized.char_len();

    entities
        .iter()
        .enumerate()
        .map(|(index, entity)| {
            if entity.start > entity.end || entity.end > len {
                return Err(ExtractionError::EntityOutOfBounds {
                    index,
                    start: entity.start,
                    end: entity.end,
                    len,
                });
            }
            if !(0.0..=1.0).contains(&entity.confidence) {
                return Err(ExtractionError::InvalidConfidence {
                    kind: "entity",
                    index,
                    value: entity.confidence,
                });
            }

            let tokens = normalized
                .tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| overlaps(t.start, t.end, entity.start, entity.end))
                .map(|(i, _)| i)
                .collect();

            Ok(AlignedEntity {
                entity: entity.clone(),
                tokens,
            })
        })
        .collect()
}

/// Half-open intervals sharing at least one character.
fn overlaps(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_start < a_end && b_start < b_end && a_start < b_end && b_start < a_end
}

//! Rule-based entity recognizer for printed "Label: value" layouts.

use tracing::trace;

use super::NerModel;
use crate::error::NerError;
use crate::models::token::{EntityLabel, NerEntity};
use crate::rules::patterns::FIELD_LABEL;
use crate::rules::text::char_offset;

/// Confidence given to every span found by [`KeyValueNerModel`].
pub const DEFAULT_CONFIDENCE: f32 = 0.85;

/// Finds printed field labels and labels the text up to the next one.
///
/// Useful when no statistical model is available; cards without printed
/// labels yield nothing.
#[derive(Debug, Clone)]
pub struct KeyValueNerModel {
    confidence: f32,
}

impl KeyValueNerModel {
    pub fn new() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

impl Default for KeyValueNerModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Entity label for a printed field label.
fn label_for(printed: &str) -> Option<EntityLabel> {
    let key: String = printed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('.', "");

    match key.as_str() {
        "full name" | "surname" | "name" => Some(EntityLabel::Person),
        "date of birth" | "birth date" | "dob" => Some(EntityLabel::DateOfBirth),
        "date of expiry" | "expiry date" | "expiration date" | "expiry" | "expires" | "exp"
        | "valid until" => Some(EntityLabel::ExpiryDate),
        "id number" | "id no" | "id" | "card number" | "document number" | "roll number" => {
            Some(EntityLabel::IdNumber)
        }
        "address" | "addr" => Some(EntityLabel::Address),
        _ => None,
    }
}

impl NerModel for KeyValueNerModel {
    fn recognize(&self, text: &str) -> Result<Vec<NerEntity>, NerError> {
        let labels: Vec<_> = FIELD_LABEL.captures_iter(text).collect();
        let mut entities = Vec::new();

        for (i, caps) in labels.iter().enumerate() {
            let (Some(whole), Some(printed)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(label) = label_for(printed.as_str()) else {
                continue;
            };

            let value_end = labels
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let region = &text[whole.end()..value_end];
            let value = region.trim();
            if value.is_empty() {
                trace!("Label {:?} has no value", printed.as_str());
                continue;
            }

            let leading = region.len() - region.trim_start().len();
            let start = whole.end() + leading;
            let end = start + value.len();

            entities.push(NerEntity::new(
                label,
                char_offset(text, start),
                char_offset(text, end),
                self.confidence,
            ));
        }

        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::text::char_slice;
    use pretty_assertions::assert_eq;

    fn spans(text: &str) -> Vec<(EntityLabel, String)> {
        KeyValueNerModel::new()
            .recognize(text)
            .unwrap()
            .into_iter()
            .map(|e| (e.label, char_slice(text, e.start, e.end).to_string()))
            .collect()
    }

    #[test]
    fn test_labeled_card() {
        let text = "NAME: JOHN DOE DOB: 01/01/1990 EXP: 12/31/2030 ID: 123456789";
        assert_eq!(
            spans(text),
            vec![
                (EntityLabel::Person, "JOHN DOE".to_string()),
                (EntityLabel::DateOfBirth, "01/01/1990".to_string()),
                (EntityLabel::ExpiryDate, "12/31/2030".to_string()),
                (EntityLabel::IdNumber, "123456789".to_string()),
            ]
        );
    }

    #[test]
    fn test_long_form_labels() {
        let text = "Full Name: Ana Müller Date of Birth: 02.03.1985 Address: 12 Main St";
        assert_eq!(
            spans(text),
            vec![
                (EntityLabel::Person, "Ana Müller".to_string()),
                (EntityLabel::DateOfBirth, "02.03.1985".to_string()),
                (EntityLabel::Address, "12 Main St".to_string()),
            ]
        );
    }

    #[test]
    fn test_offsets_are_chars() {
        let text = "Name: Zoë Ñuñez ID: 987654321";
        let entities = KeyValueNerModel::new().recognize(text).unwrap();
        assert_eq!((entities[0].start, entities[0].end), (6, 15));
        assert_eq!(char_slice(text, entities[1].start, entities[1].end), "987654321");
    }

    #[test]
    fn test_unlabeled_text_yields_nothing() {
        assert!(spans("JOHN DOE 123456789").is_empty());
        assert!(spans("").is_empty());
    }

    #[test]
    fn test_empty_value_is_skipped() {
        assert_eq!(
            spans("NAME: DOB: 01/01/1990"),
            vec![(EntityLabel::DateOfBirth, "01/01/1990".to_string())]
        );
    }

    #[test]
    fn test_confidence() {
        let model = KeyValueNerModel::new().with_confidence(0.6);
        let entities = model.recognize("NAME: JANE").unwrap();
        assert_eq!(entities[0].confidence, 0.6);
        assert_eq!(
            KeyValueNerModel::default().recognize("NAME: JANE").unwrap()[0].confidence,
            DEFAULT_CONFIDENCE
        );
    }
}

//! End-to-end properties of the extraction pipeline.

use std::sync::Arc;

use idcard_core::{
    EntityLabel, ExtractionResult, FieldName, FieldPipeline, IdCardConfig, IdCardExtractor,
    KeyValueNerModel, NerEntity, OcrToken, RecordedOcr,
};
use pretty_assertions::assert_eq;

fn pipeline() -> FieldPipeline {
    FieldPipeline::new(IdCardConfig::default()).unwrap()
}

fn tokens(items: &[(&str, f32)]) -> Vec<OcrToken> {
    items.iter().map(|(t, c)| OcrToken::new(*t, *c)).collect()
}

/// "NAME: JOHN DOE DOB: 01/01/1990 ADDRESS: 12 MAIN ST SPRINGFIELD 123456789"
fn sample_card() -> (Vec<OcrToken>, Vec<NerEntity>) {
    let tokens = tokens(&[
        ("NAME:", 0.98),
        ("JOHN", 0.9),
        ("DOE", 0.9),
        ("DOB:", 0.97),
        ("01/01/1990", 0.85),
        ("ADDRESS:", 0.96),
        ("12", 0.6),
        ("MAIN", 0.7),
        ("ST", 0.65),
        ("SPRINGFIELD", 0.8),
        ("123456789", 0.93),
    ]);
    let entities = vec![
        NerEntity::new(EntityLabel::Person, 6, 14, 0.95),
        NerEntity::new(EntityLabel::Date, 20, 30, 0.92),
        NerEntity::new(EntityLabel::Address, 40, 50, 0.7),
        NerEntity::new(EntityLabel::Location, 51, 62, 0.8),
        NerEntity::new(EntityLabel::Org, 0, 4, 0.99),
    ];
    (tokens, entities)
}

fn assert_consistent(result: &ExtractionResult) {
    assert_eq!(
        result.extracted_fields.keys().collect::<Vec<_>>(),
        result.confidence_scores.keys().collect::<Vec<_>>()
    );
    for score in result.confidence_scores.values() {
        assert!((0.0..=1.0).contains(score), "score {score} out of range");
    }
    assert!((0.0..=1.0).contains(&result.overall_confidence));
}

#[test]
fn sample_card_text_layout() {
    let (tokens, _) = sample_card();
    let normalized = pipeline().normalize(&tokens).unwrap();
    assert_eq!(
        normalized.text,
        "NAME: JOHN DOE DOB: 01/01/1990 ADDRESS: 12 MAIN ST SPRINGFIELD 123456789"
    );
}

#[test]
fn maps_are_consistent_at_every_threshold() {
    let (tokens, entities) = sample_card();
    let p = pipeline();

    for step in 0..=20 {
        let threshold = step as f32 / 20.0;
        let result = p.extract(&tokens, &entities, threshold).unwrap();
        assert_consistent(&result);
        for score in result.confidence_scores.values() {
            assert!(*score >= threshold);
        }
    }
}

#[test]
fn raising_threshold_never_adds_fields() {
    let (tokens, entities) = sample_card();
    let p = pipeline();

    let mut previous: Option<Vec<FieldName>> = None;
    for step in 0..=20 {
        let threshold = step as f32 / 20.0;
        let result = p.extract(&tokens, &entities, threshold).unwrap();
        let fields: Vec<FieldName> = result.extracted_fields.keys().copied().collect();
        if let Some(prev) = &previous {
            assert!(fields.iter().all(|f| prev.contains(f)), "{fields:?} not within {prev:?}");
        }
        previous = Some(fields);
    }
}

#[test]
fn identical_input_serializes_identically() {
    let (tokens, entities) = sample_card();
    let first = serde_json::to_string(&pipeline().extract(&tokens, &entities, 0.3).unwrap()).unwrap();
    let second = serde_json::to_string(&pipeline().extract(&tokens, &entities, 0.3).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sample_card_fields() {
    let (tokens, entities) = sample_card();
    let result = pipeline().extract(&tokens, &entities, 0.0).unwrap();

    assert_eq!(result.extracted_fields[&FieldName::Name], "JOHN DOE");
    assert_eq!(result.extracted_fields[&FieldName::DateOfBirth], "1990-01-01");
    assert_eq!(
        result.extracted_fields[&FieldName::Address],
        "12 MAIN ST, SPRINGFIELD"
    );
    assert_eq!(result.extracted_fields[&FieldName::IdNumber], "123456789");
    assert!(!result.extracted_fields.contains_key(&FieldName::ExpiryDate));

    // mean entity 0.75 times mean token (0.6 + 0.7 + 0.65 + 0.8) / 4
    let address = result.confidence_scores[&FieldName::Address];
    assert!((address - 0.515_625).abs() < 1e-5, "address scored {address}");
}

#[test]
fn us_date_becomes_iso() {
    let text = tokens(&[("01/01/1990", 1.0)]);
    let entities = [NerEntity::new(EntityLabel::DateOfBirth, 0, 10, 1.0)];
    let result = pipeline().extract(&text, &entities, 0.7).unwrap();
    assert_eq!(result.extracted_fields[&FieldName::DateOfBirth], "1990-01-01");
    assert_eq!(result.confidence_scores[&FieldName::DateOfBirth], 1.0);
}

#[test]
fn empty_input_gives_empty_result() {
    let result = pipeline().extract(&[], &[], 0.7).unwrap();
    assert!(result.extracted_fields.is_empty());
    assert!(result.confidence_scores.is_empty());
    assert_eq!(result.raw_text, "");
    assert_eq!(result.overall_confidence, 0.0);
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"extracted_fields":{},"confidence_scores":{},"raw_text":"","overall_confidence":0.0}"#
    );
}

#[test]
fn person_scored_against_tokens() {
    let text = tokens(&[("JOHN", 0.9), ("DOE", 0.9), ("123456789", 0.99)]);
    let entities = [NerEntity::new(EntityLabel::Person, 0, 8, 0.95)];
    let p = pipeline();

    let result = p.extract(&text, &entities, 0.7).unwrap();
    assert_eq!(result.extracted_fields[&FieldName::Name], "JOHN DOE");
    assert!((result.confidence_scores[&FieldName::Name] - 0.855).abs() < 1e-6);
    assert!((result.overall_confidence - (0.855 + 0.8) / 2.0).abs() < 1e-6);

    let result = p.extract(&text, &entities, 0.9).unwrap();
    assert!(!result.extracted_fields.contains_key(&FieldName::Name));
    assert!(!result.extracted_fields.contains_key(&FieldName::IdNumber));
    assert_eq!(result.overall_confidence, 0.0);

    let result = p.extract(&text, &entities, 0.85).unwrap();
    assert_eq!(result.len(), 1);
    assert!((result.overall_confidence - 0.855).abs() < 1e-6);
}

#[test]
fn id_number_from_fallback_pattern() {
    let text = tokens(&[("CARD", 0.9), ("NO", 0.9), ("987654321", 0.4)]);
    let result = pipeline().extract(&text, &[], 0.7).unwrap();

    assert_eq!(result.extracted_fields[&FieldName::IdNumber], "987654321");
    assert_eq!(result.confidence_scores[&FieldName::IdNumber], 0.8);
}

#[test]
fn fallback_confidence_follows_config() {
    let mut config = IdCardConfig::default();
    config.id_number.regex_match_confidence = 0.65;
    let p = FieldPipeline::new(config).unwrap();

    let result = p.extract(&tokens(&[("123456789", 1.0)]), &[], 0.5).unwrap();
    assert_eq!(result.confidence_scores[&FieldName::IdNumber], 0.65);
}

#[test]
fn non_ascii_text_uses_char_offsets() {
    let text = tokens(&[("José", 0.9), ("Muñoz", 0.9), ("DOB", 0.9), ("02.03.1985", 0.9)]);
    let entities = [
        NerEntity::new(EntityLabel::Person, 0, 10, 0.9),
        NerEntity::new(EntityLabel::Date, 15, 25, 0.9),
    ];
    let result = pipeline().extract(&text, &entities, 0.5).unwrap();
    assert_eq!(result.extracted_fields[&FieldName::Name], "José Muñoz");
    assert_eq!(result.extracted_fields[&FieldName::DateOfBirth], "1985-03-02");
}

#[test]
fn extractor_over_recorded_ocr() {
    let ocr = RecordedOcr::new(tokens(&[
        ("Surname:", 0.95),
        ("NOWAK", 0.9),
        ("Expiry", 0.9),
        ("Date:", 0.9),
        ("2031-05-17", 0.9),
    ]));
    let extractor = IdCardExtractor::new(ocr, KeyValueNerModel::new(), Arc::new(pipeline()));
    let result = extractor.process_image(b"scan", 0.5).unwrap();

    assert_consistent(&result);
    assert_eq!(result.extracted_fields[&FieldName::Name], "NOWAK");
    assert_eq!(result.extracted_fields[&FieldName::ExpiryDate], "2031-05-17");
    assert!(!result.extracted_fields.contains_key(&FieldName::IdNumber));
}

#[test]
fn zero_width_entity_is_penalized() {
    let p = pipeline();
    let tokens = tokens(&[("JOHN", 1.0), ("DOE", 1.0)]);
    let entities = vec![NerEntity::new(EntityLabel::Person, 4, 4, 0.9)];

    let result = p.extract(&tokens, &entities, 0.7).unwrap();
    assert!(result.is_empty());

    let result = p.extract(&tokens, &entities, 0.0).unwrap();
    assert_eq!(result.extracted_fields[&FieldName::Name], "");
    assert!((result.confidence_scores[&FieldName::Name] - 0.45).abs() < 1e-6);
}

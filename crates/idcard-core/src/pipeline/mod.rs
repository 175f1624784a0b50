//! Field-extraction and confidence-scoring pipeline.
//!
//! Stages run strictly in order, each a pure function of its inputs and the
//! compiled configuration:
//!
//! 1. [`normalizer`] - clean and re-index OCR tokens
//! 2. [`aligner`] - attach entity spans to the tokens they cover
//! 3. [`mapper`] - route labels to fields, fall back to the ID pattern
//! 4. [`scorer`] - combine entity and token confidences
//! 5. [`validator`] - canonicalize values, penalize format failures
//! 6. [`aggregator`] - apply the threshold, assemble the result

pub mod aggregator;
pub mod aligner;
pub mod mapper;
pub mod normalizer;
pub mod scorer;
pub mod validator;

pub use aligner::AlignedEntity;
pub use mapper::{FieldMapper, FieldRoute};
pub use normalizer::{NormalizedText, NormalizedToken, TextNormalizer};
pub use validator::{FieldValidator, Formatted};

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{ConfigError, ExtractionError};
use crate::models::config::IdCardConfig;
use crate::models::result::{ExtractedField, ExtractionResult, FieldName};
use crate::models::token::{EntityLabel, NerEntity, OcrToken};

/// Compiled, immutable pipeline configuration.
///
/// Build once at startup and share (it is `Send + Sync`); every call works
/// only on its own inputs.
#[derive(Debug, Clone)]
pub struct FieldPipeline {
    config: IdCardConfig,
    normalizer: TextNormalizer,
    aliases: BTreeMap<String, EntityLabel>,
    id_fallback: Regex,
}

impl FieldPipeline {
    /// Validate and compile a configuration.
    pub fn new(config: IdCardConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        // Scanned over the case-folded text, so upper-case classes in the
        // configured pattern must still match.
        let pattern = &config.id_number.fallback_pattern;
        let id_fallback = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

        let aliases = config
            .extraction
            .label_aliases
            .iter()
            .map(|(from, to)| (EntityLabel::key(from), EntityLabel::parse(to)))
            .collect();

        Ok(Self {
            normalizer: TextNormalizer::from_config(&config.extraction),
            config,
            aliases,
            id_fallback,
        })
    }

    pub fn config(&self) -> &IdCardConfig {
        &self.config
    }

    /// Threshold applied when the caller supplies none.
    pub fn default_threshold(&self) -> f32 {
        self.config.extraction.default_threshold
    }

    /// Run only the text normalizer.
    pub fn normalize(&self, tokens: &[OcrToken]) -> Result<NormalizedText, ExtractionError> {
        self.normalizer.normalize(tokens)
    }

    /// Normalize `tokens` and run the full pipeline.
    pub fn extract(
        &self,
        tokens: &[OcrToken],
        entities: &[NerEntity],
        threshold: f32,
    ) -> Result<ExtractionResult, ExtractionError> {
        check_threshold(threshold)?;
        let normalized = self.normalize(tokens)?;
        self.extract_normalized(&normalized, entities, threshold)
    }

    /// Run the pipeline on text that is already normalized; `entities` must
    /// index into `normalized.text`.
    pub fn extract_normalized(
        &self,
        normalized: &NormalizedText,
        entities: &[NerEntity],
        threshold: f32,
    ) -> Result<ExtractionResult, ExtractionError> {
        check_threshold(threshold)?;

        let aligned = aligner::align(normalized, entities)?;
        debug!(
            "Aligned {} entities ({} without tokens) over {} tokens",
            aligned.len(),
            aligned.iter().filter(|a| !a.is_aligned()).count(),
            normalized.tokens.len()
        );

        let mapper = FieldMapper::new(
            &self.aliases,
            &self.config.extraction.address_separator,
            &self.id_fallback,
            self.config.id_number.regex_match_confidence,
        );
        let candidates = mapper.map(normalized, &aligned);
        debug!("Mapped {} field candidates", candidates.len());

        let validator = FieldValidator::new(&self.config.extraction, &self.config.id_number);
        let fields: BTreeMap<FieldName, ExtractedField> = candidates
            .into_values()
            .map(|candidate| {
                let confidence = scorer::score(&candidate, &normalized.tokens);
                let field = validator.apply(candidate.field, &candidate.raw_value, confidence);
                (candidate.field, field)
            })
            .collect();

        let result = aggregator::aggregate(fields, &normalized.text, threshold);
        debug!(
            "{} fields passed threshold {:.2}, overall confidence {:.3}",
            result.len(),
            threshold,
            result.overall_confidence
        );

        Ok(result)
    }
}

fn check_threshold(threshold: f32) -> Result<(), ExtractionError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ExtractionError::InvalidThreshold(threshold))
    }
}

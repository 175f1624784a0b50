//! End-to-end extraction service: OCR, normalization, NER and the field
//! pipeline behind one entry point.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::api::{DecodedRequest, ExtractRequest, HealthStatus, VersionInfo, resolve_threshold};
use crate::collab::{NerModel, OcrEngine};
use crate::error::{InputError, Result};
use crate::models::result::ExtractionResult;
use crate::models::token::OcrToken;
use crate::pipeline::FieldPipeline;

/// Identity-card extractor over an OCR engine and an NER model.
///
/// Holds no per-request state; one instance can serve concurrent callers.
pub struct IdCardExtractor<O, N> {
    ocr: O,
    ner: N,
    pipeline: Arc<FieldPipeline>,
}

impl<O: OcrEngine, N: NerModel> IdCardExtractor<O, N> {
    pub fn new(ocr: O, ner: N, pipeline: Arc<FieldPipeline>) -> Self {
        Self { ocr, ner, pipeline }
    }

    pub fn pipeline(&self) -> &FieldPipeline {
        &self.pipeline
    }

    /// Recognize and extract fields from raw image bytes.
    pub fn process_image(&self, image: &[u8], threshold: f32) -> Result<ExtractionResult> {
        let start = Instant::now();
        info!("Processing image ({} bytes)", image.len());

        let tokens = self.ocr.recognize(image)?;
        debug!("OCR produced {} tokens", tokens.len());

        let result = self.process_tokens(&tokens, threshold)?;
        info!(
            "Extracted {} fields in {:.1}ms",
            result.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(result)
    }

    /// Extract fields from already recognized tokens.
    ///
    /// The NER model sees the normalized text, so its offsets line up with
    /// the token offsets the pipeline aligns against.
    pub fn process_tokens(&self, tokens: &[OcrToken], threshold: f32) -> Result<ExtractionResult> {
        let normalized = self.pipeline.normalize(tokens)?;
        let entities = self.ner.recognize(&normalized.text)?;
        debug!("NER produced {} entities", entities.len());

        Ok(self
            .pipeline
            .extract_normalized(&normalized, &entities, threshold)?)
    }

    /// Validate and decode a request, then process its image.
    pub fn handle_request(&self, request: &ExtractRequest) -> Result<ExtractionResult> {
        let DecodedRequest { image, threshold } =
            request.decode(self.pipeline.default_threshold())?;
        self.process_image(&image, threshold)
    }

    /// Process an uploaded file.
    pub fn handle_upload(&self, file: &[u8], threshold: Option<f32>) -> Result<ExtractionResult> {
        let threshold = resolve_threshold(threshold, self.pipeline.default_threshold())?;
        if file.is_empty() {
            return Err(InputError::EmptyImage.into());
        }
        self.process_image(file, threshold)
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::ok()
    }

    pub fn version(&self) -> VersionInfo {
        VersionInfo::from(&self.pipeline.config().versions)
    }
}

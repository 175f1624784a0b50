use serde::{Deserialize, Serialize};

use super::{NerModel, OcrEngine};
use crate::error::{NerError, OcrError};
use crate::models::token::{NerEntity, OcrToken};

/// Replays a fixed token list, whatever image it is given.
///
/// Used for tests and for re-running extraction on saved OCR output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedOcr {
    pub tokens: Vec<OcrToken>,
}

impl RecordedOcr {
    pub fn new(tokens: Vec<OcrToken>) -> Self {
        Self { tokens }
    }
}

impl OcrEngine for RecordedOcr {
    fn recognize(&self, _image: &[u8]) -> Result<Vec<OcrToken>, OcrError> {
        Ok(self.tokens.clone())
    }
}

/// Replays a fixed entity list, whatever text it is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedNer {
    pub entities: Vec<NerEntity>,
}

impl RecordedNer {
    pub fn new(entities: Vec<NerEntity>) -> Self {
        Self { entities }
    }
}

impl NerModel for RecordedNer {
    fn recognize(&self, _text: &str) -> Result<Vec<NerEntity>, NerError> {
        Ok(self.entities.clone())
    }
}

//! OCR and NER collaborators.
//!
//! The pipeline never runs a model itself. It consumes whatever an
//! [`OcrEngine`] and a [`NerModel`] produce, so real engines, recorded
//! fixtures and rule-based stand-ins are interchangeable.

mod key_value;
mod recorded;

pub use key_value::KeyValueNerModel;
pub use recorded::{RecordedNer, RecordedOcr};

use crate::error::{NerError, OcrError};
use crate::models::token::{NerEntity, OcrToken};

/// Turns raw image bytes into tokens in reading order.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<Vec<OcrToken>, OcrError>;
}

/// Labels spans of normalized text.
///
/// Entity offsets must be character offsets into `text`.
pub trait NerModel: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<NerEntity>, NerError>;
}

impl<T: OcrEngine + ?Sized> OcrEngine for Box<T> {
    fn recognize(&self, image: &[u8]) -> Result<Vec<OcrToken>, OcrError> {
        (**self).recognize(image)
    }
}

impl<T: NerModel + ?Sized> NerModel for Box<T> {
    fn recognize(&self, text: &str) -> Result<Vec<NerEntity>, NerError> {
        (**self).recognize(text)
    }
}

//! Core library for identity-card field extraction.
//!
//! This crate provides:
//! - OCR token normalization with character-offset bookkeeping
//! - Alignment of NER entity spans onto OCR tokens
//! - Field mapping (name, ID number, dates of birth and expiry, address)
//! - Confidence scoring, format validation and threshold filtering
//! - Collaborator traits for OCR engines and NER models, with recorded and
//!   rule-based implementations
//! - Request/response shapes for service front ends

pub mod api;
pub mod collab;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod rules;
pub mod service;

pub use api::{ErrorBody, ExtractRequest, HealthStatus, VersionInfo};
pub use collab::{KeyValueNerModel, NerModel, OcrEngine, RecordedNer, RecordedOcr};
pub use error::{
    ConfigError, ExtractionError, IdCardError, InputError, NerError, OcrError, Result,
};
pub use models::config::{ExtractionConfig, IdCardConfig, IdChecksum, IdNumberConfig};
pub use models::result::{ExtractedField, ExtractionResult, FieldName};
pub use models::token::{BoundingBox, EntityLabel, NerEntity, OcrToken};
pub use pipeline::{FieldPipeline, NormalizedText};
pub use service::IdCardExtractor;

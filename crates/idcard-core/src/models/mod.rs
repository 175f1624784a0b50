//! Data models for identity-card extraction.

pub mod config;
pub mod result;
pub mod token;

pub use config::{ExtractionConfig, IdCardConfig, IdChecksum, IdNumberConfig, VersionConfig};
pub use result::{CandidateSource, ExtractedField, ExtractionResult, FieldCandidate, FieldName};
pub use token::{BoundingBox, EntityLabel, NerEntity, OcrToken};

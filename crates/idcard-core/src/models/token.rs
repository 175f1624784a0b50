//! Collaborator output: OCR tokens and NER entity spans.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle of a token, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A recognized word produced by the OCR collaborator.
///
/// Tokens are delivered in reading order. `start`/`end` are the character
/// offsets the engine reported once its tokens are concatenated; the
/// normalizer re-indexes them, so they are informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrToken {
    /// Recognized text.
    pub text: String,

    /// Start character offset reported by the engine.
    #[serde(default)]
    pub start: usize,

    /// End character offset (exclusive) reported by the engine.
    #[serde(default)]
    pub end: usize,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Bounding box, when the engine provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl OcrToken {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            start: 0,
            end: 0,
            confidence,
            bbox: None,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

/// Label attached to an entity span by the NER collaborator.
///
/// Model label sets vary, so parsing is lenient: common spellings collapse
/// onto one variant and anything unrecognized is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Person,
    Date,
    IdNumber,
    Address,
    /// Geopolitical entity, location or facility.
    Location,
    Org,
    DateOfBirth,
    ExpiryDate,
    Other(String),
}

impl EntityLabel {
    /// Parse a model label, ignoring case and `-`/space/`_` differences.
    pub fn parse(label: &str) -> Self {
        let key = Self::key(label);
        match key.as_str() {
            "PERSON" | "PER" | "NAME" => EntityLabel::Person,
            "DATE" => EntityLabel::Date,
            "ID_NUMBER" | "ID" | "ID_NO" | "DOCUMENT_NUMBER" => EntityLabel::IdNumber,
            "ADDRESS" | "ADDR" => EntityLabel::Address,
            "GPE" | "LOC" | "LOCATION" | "FAC" => EntityLabel::Location,
            "ORG" | "ORGANIZATION" => EntityLabel::Org,
            "DATE_OF_BIRTH" | "DOB" | "BIRTH_DATE" => EntityLabel::DateOfBirth,
            "EXPIRY_DATE" | "EXPIRY" | "DOE" | "DATE_OF_EXPIRY" => EntityLabel::ExpiryDate,
            _ => EntityLabel::Other(label.trim().to_string()),
        }
    }

    /// Comparison key for a label string: trimmed, uppercased, with `-` and
    /// spaces turned into `_`.
    pub fn key(label: &str) -> String {
        label
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect()
    }

    /// Canonical label string.
    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Date => "DATE",
            EntityLabel::IdNumber => "ID_NUMBER",
            EntityLabel::Address => "ADDRESS",
            EntityLabel::Location => "LOCATION",
            EntityLabel::Org => "ORG",
            EntityLabel::DateOfBirth => "DATE_OF_BIRTH",
            EntityLabel::ExpiryDate => "EXPIRY_DATE",
            EntityLabel::Other(s) => s,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(s: String) -> Self {
        EntityLabel::parse(&s)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled span produced by the NER collaborator.
///
/// Offsets are character (not byte) offsets into the normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerEntity {
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
    /// Model confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl NerEntity {
    pub fn new(label: EntityLabel, start: usize, end: usize, confidence: f32) -> Self {
        Self {
            label,
            start,
            end,
            confidence,
        }
    }
}

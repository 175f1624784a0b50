//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use idcard_core::{
    ExtractionResult, FieldPipeline, IdCardConfig, IdCardExtractor, KeyValueNerModel, NerEntity,
    NerModel, OcrToken, RecordedNer, RecordedOcr,
};

/// Saved OCR output, optionally with the entities a model found in it.
///
/// Dumps without entities are labeled by [`KeyValueNerModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrDump {
    pub tokens: Vec<OcrToken>,

    #[serde(default)]
    pub entities: Option<Vec<NerEntity>>,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("idcard")
        .join("config.json")
}

/// Load the configuration from `config_path`, the default location if a
/// file exists there, or the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IdCardConfig> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => {
            let path = default_config_path();
            if !path.exists() {
                return Ok(IdCardConfig::default());
            }
            path
        }
    };

    debug!("Loading configuration from {}", path.display());
    IdCardConfig::from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
}

pub fn build_pipeline(config_path: Option<&str>) -> anyhow::Result<Arc<FieldPipeline>> {
    let config = load_config(config_path)?;
    Ok(Arc::new(FieldPipeline::new(config)?))
}

/// Run extraction on one dump file.
pub fn extract_dump(
    path: &Path,
    pipeline: Arc<FieldPipeline>,
    threshold: f32,
) -> anyhow::Result<ExtractionResult> {
    let data = std::fs::read(path)?;
    let dump: OcrDump = serde_json::from_slice(&data)
        .map_err(|e| anyhow::anyhow!("Invalid OCR dump {}: {}", path.display(), e))?;

    let ner: Box<dyn NerModel> = match dump.entities {
        Some(entities) => Box::new(RecordedNer::new(entities)),
        None => Box::new(KeyValueNerModel::new()),
    };

    // The recorded engine replays the dump's tokens for the file contents.
    let extractor = IdCardExtractor::new(RecordedOcr::new(dump.tokens), ner, pipeline);
    Ok(extractor.process_image(&data, threshold)?)
}

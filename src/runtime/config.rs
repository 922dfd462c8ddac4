use crate::error::{ChunkError, Result};
use crate::retrieval::reconstruct::DEFAULT_INDENT_WIDTH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_extensions() -> Vec<String> {
    ["txt", "docx", "pdf", "html", "htm"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_detect_forms() -> bool {
    true
}

fn default_indent_width() -> usize {
    DEFAULT_INDENT_WIDTH
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkerConfig {
    /// Files converted concurrently by the batch driver.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Extensions (without the dot) picked up when walking an input folder.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Attach `forms` to appendix documents.
    #[serde(default = "default_detect_forms")]
    pub detect_forms: bool,
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            extensions: default_extensions(),
            detect_forms: default_detect_forms(),
            indent_width: default_indent_width(),
        }
    }
}

impl ChunkerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ChunkError::io(path, e))?;
        let config: ChunkerConfig =
            serde_json::from_str(&content).map_err(|e| ChunkError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ChunkError::InvalidConfig("workers must be at least 1".to_string()));
        }
        if self.indent_width == 0 {
            return Err(ChunkError::InvalidConfig(
                "indentWidth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

use crate::error::{ChunkError, Result};
use crate::sources::TextExtractor;
use std::path::Path;

pub struct TxtExtractor;

pub static TXT_EXTRACTOR: TxtExtractor = TxtExtractor;

impl TextExtractor for TxtExtractor {
    /// Invalid UTF-8 is replaced rather than rejected.
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| ChunkError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

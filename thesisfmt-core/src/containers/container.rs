// Container abstraction for document storage formats
//
// The pipeline only ever sees `Document`. Containers own the translation
// between a storage format and that model, and must keep paragraph order
// and run text intact in both directions.

use crate::types::Document;
use anyhow::{Context, Result};
use std::path::Path;

pub trait DocumentContainer {
    /// Decode a stored document
    fn decode(&self, bytes: &[u8]) -> Result<Document>;

    /// Encode a document for storage
    fn encode(&self, document: &Document) -> Result<Vec<u8>>;

    fn open(&self, path: &Path) -> Result<Document> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.decode(&bytes)
            .with_context(|| format!("{} could not decode {}", self.name(), path.display()))
    }

    fn save(&self, document: &Document, path: &Path) -> Result<()> {
        let bytes = self.encode(document)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Container name for logging
    fn name(&self) -> &str;

    fn supports_file_type(&self, path: &Path) -> bool;
}

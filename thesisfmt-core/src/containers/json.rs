use super::container::DocumentContainer;
use crate::types::Document;
use anyhow::Result;
use std::path::Path;

/// Paragraph model stored as pretty-printed JSON
#[derive(Debug, Clone, Default)]
pub struct JsonContainer;

impl JsonContainer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentContainer for JsonContainer {
    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let document: Document = serde_json::from_slice(bytes)?;
        log::debug!("📄 Decoded {} paragraphs", document.len());
        Ok(document)
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(document)?)
    }

    fn name(&self) -> &str {
        "JsonContainer"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

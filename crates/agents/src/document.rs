//! Loading source documents as plain text

use crate::{AgentError, Result};
use std::path::Path;
use tracing::debug;

/// How a source document is read, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => DocumentFormat::Pdf,
            _ => DocumentFormat::Text,
        }
    }
}

/// Read `path` as text; PDFs go through text extraction
pub async fn load_document(path: &Path) -> Result<String> {
    let format = DocumentFormat::from_path(path);
    debug!("Loading {} as {:?}", path.display(), format);

    match format {
        DocumentFormat::Text => Ok(tokio::fs::read_to_string(path).await?),
        DocumentFormat::Pdf => {
            let owned = path.to_path_buf();
            // Extraction is CPU-bound and may panic on malformed files
            tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
                .await
                .map_err(|e| AgentError::Processing(format!("PDF extraction aborted: {}", e)))?
                .map_err(|e| {
                    AgentError::Processing(format!(
                        "cannot extract text from {}: {}",
                        path.display(),
                        e
                    ))
                })
        }
    }
}

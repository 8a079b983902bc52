//! Thin wrapper over `lopdf` for opening documents and reading page text.
//!
//! Parsing is CPU-bound, so async callers go through [`spawn_blocking`](tokio::task::spawn_blocking).

use std::path::{Path, PathBuf};

use lopdf::Document;

/// Opens and parses the whole document.
pub fn load_document(path: &Path) -> Result<Document, String> {
    Document::load(path).map_err(|e| e.to_string())
}

/// Checks on a blocking thread that `path` parses as a PDF.
pub async fn validate_document(path: PathBuf) -> Result<(), String> {
    tokio::task::spawn_blocking(move || load_document(&path).map(|_| ()))
        .await
        .map_err(|e| e.to_string())?
}

/// Extracted text of every page, in page order, as `(page_number, text)`.
///
/// Pages whose text cannot be decoded yield an empty string rather than
/// failing the whole document.
pub fn page_texts(document: &Document) -> Vec<(u32, String)> {
    document
        .get_pages()
        .keys()
        .map(|&page| {
            let text = document.extract_text(&[page]).unwrap_or_else(|e| {
                tracing::debug!(page, error = %e, "Could not extract page text");
                String::new()
            });
            (page, text)
        })
        .collect()
}

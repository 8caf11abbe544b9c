//! Plain text lines from PDFs that carry a text layer.

use tracing::debug;

use crate::error::{IngestError, Result};

/// Extract the text of every page and split it into lines, in page order.
pub fn extract_text_lines(bytes: &[u8]) -> Result<Vec<String>> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| IngestError::Text(e.to_string()))?;

    let mut lines = Vec::new();
    for (idx, page) in pages.iter().enumerate() {
        let before = lines.len();
        lines.extend(page.lines().map(str::to_string));
        debug!(page = idx + 1, lines = lines.len() - before, "text lines");
    }
    Ok(lines)
}

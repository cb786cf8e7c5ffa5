//! PDF → plain text.

use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("could not extract text: {0}")]
    Extraction(String),

    #[error("PDF parser crashed on this document")]
    Panicked,
}

/// Extracts the text of every page, joined and trimmed.
///
/// Extraction is CPU-bound and the underlying parser can panic on malformed
/// input, so it runs on the blocking pool and a panic becomes `PdfError::Panicked`.
pub async fn parse_pdf(file_bytes: Bytes) -> Result<String, PdfError> {
    let joined = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&file_bytes))
        .await
        .map_err(|e| {
            warn!("PDF extraction task failed: {e}");
            PdfError::Panicked
        })?;

    let text = joined.map_err(|e| PdfError::Extraction(e.to_string()))?;
    Ok(clean_text(&text))
}

/// Drops trailing whitespace on each line and trims the document.
fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_trims_document_and_lines() {
        let raw = "\n\n  Jane Doe   \nSoftware Engineer\t\n\n";
        assert_eq!(clean_text(raw), "Jane Doe\nSoftware Engineer");
    }

    #[tokio::test]
    async fn test_garbage_bytes_rejected() {
        let result = parse_pdf(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(result.is_err());
    }
}

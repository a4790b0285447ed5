use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// Plain text pulled out of a PDF, one trimmed page per line group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
    pub pages_with_text: usize,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extract the text of every page that has any, in page order.
///
/// Pages that produce no text (scanned images, blank pages) are skipped.
/// An empty result is not an error. Malformed input, including input that
/// makes the PDF parser panic, is reported as [`AppError::DocumentParse`].
pub fn extract(document_bytes: &[u8]) -> Result<ExtractedText> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(document_bytes))
        .map_err(|_| AppError::DocumentParse("PDF parser aborted on malformed input".to_string()))?
        .map_err(|e| AppError::DocumentParse(e.to_string()))?;

    let extracted = join_pages(pages);
    debug!(
        pages = extracted.page_count,
        pages_with_text = extracted.pages_with_text,
        chars = extracted.text.len(),
        "Extracted PDF text"
    );
    Ok(extracted)
}

pub fn extract_file(path: &Path) -> Result<ExtractedText> {
    let bytes = std::fs::read(path)?;
    extract(&bytes)
}

/// Each page with text contributes its trimmed text followed by a newline.
pub fn join_pages<I, S>(pages: I) -> ExtractedText
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extracted = ExtractedText::default();
    for page in pages {
        extracted.page_count += 1;
        let text = page.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        extracted.pages_with_text += 1;
        extracted.text.push_str(text);
        extracted.text.push('\n');
    }
    extracted
}

/// Stage an uploaded document in a uniquely named temp file under
/// `upload_dir` and extract it on the blocking pool. The temp file is
/// removed whether or not extraction succeeds.
pub async fn extract_upload<B>(document_bytes: B, upload_dir: PathBuf) -> Result<ExtractedText>
where
    B: AsRef<[u8]> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut staged = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile_in(&upload_dir)?;
        staged.write_all(document_bytes.as_ref())?;
        staged.flush()?;

        let result = extract_file(staged.path());

        let staged_path = staged.path().to_path_buf();
        if let Err(e) = staged.close() {
            warn!("Failed to remove temp upload {}: {}", staged_path.display(), e);
        }
        result
    })
    .await
    .map_err(|e| AppError::DocumentParse(format!("Extraction task failed: {}", e)))?
}

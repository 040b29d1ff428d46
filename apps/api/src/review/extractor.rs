//! Text Extractor — turns an uploaded PDF into plain text.
//!
//! Pages are read concurrently and re-joined in page order: items within a page
//! are joined with single spaces, pages with newlines. Any failure yields an
//! empty string; callers treat that as "nothing to analyze".

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF could not be loaded: {0}")]
    Load(String),

    #[error("Page {page} could not be read: {reason}")]
    Page { page: usize, reason: String },

    #[error("PDF worker failed: {0}")]
    Worker(String),
}

/// Opens PDF payloads. Swap implementations without touching the extractor.
#[async_trait]
pub trait PdfBackend: Send + Sync {
    async fn open(&self, data: Bytes) -> Result<Arc<dyn PdfDocument>, ExtractError>;
}

/// A loaded PDF document.
#[async_trait]
pub trait PdfDocument: Send + Sync {
    fn page_count(&self) -> usize;

    /// Text items of one page. `page_number` is 1-based.
    async fn page_items(&self, page_number: usize) -> Result<Vec<String>, ExtractError>;
}

#[derive(Clone)]
pub struct TextExtractor {
    backend: Arc<dyn PdfBackend>,
}

impl TextExtractor {
    pub fn new(backend: Arc<dyn PdfBackend>) -> Self {
        Self { backend }
    }

    /// Extracts the page-joined text of `data`. Never fails.
    pub async fn extract(&self, data: Bytes) -> String {
        match self.try_extract(data).await {
            Ok(text) => text,
            Err(e) => {
                warn!("PDF text extraction failed: {e}");
                String::new()
            }
        }
    }

    async fn try_extract(&self, data: Bytes) -> Result<String, ExtractError> {
        let document = self.backend.open(data).await?;
        let page_count = document.page_count();

        let mut tasks = JoinSet::new();
        for page_number in 1..=page_count {
            let document = Arc::clone(&document);
            tasks.spawn(async move {
                let items = document.page_items(page_number).await?;
                Ok::<_, ExtractError>((page_number, items.join(" ")))
            });
        }

        let mut pages = Vec::with_capacity(page_count);
        while let Some(joined) = tasks.join_next().await {
            let page = joined.map_err(|e| ExtractError::Worker(e.to_string()))??;
            pages.push(page);
        }
        pages.sort_by_key(|(page_number, _)| *page_number);

        let text = pages
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n");
        debug!(pages = page_count, chars = text.len(), "PDF text extracted");
        Ok(text.trim().to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// pdf-extract backend
// ────────────────────────────────────────────────────────────────────────────

/// Backend built on the `pdf-extract` crate. Parsing is CPU-bound and may
/// panic on malformed input, so it runs on the blocking pool.
pub struct PdfExtractBackend;

#[async_trait]
impl PdfBackend for PdfExtractBackend {
    async fn open(&self, data: Bytes) -> Result<Arc<dyn PdfDocument>, ExtractError> {
        let pages =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&data))
                .await
                .map_err(|e| ExtractError::Worker(e.to_string()))?
                .map_err(|e| ExtractError::Load(e.to_string()))?;
        Ok(Arc::new(ExtractedPages { pages }))
    }
}

struct ExtractedPages {
    pages: Vec<String>,
}

#[async_trait]
impl PdfDocument for ExtractedPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_items(&self, page_number: usize) -> Result<Vec<String>, ExtractError> {
        let page = page_number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .ok_or_else(|| ExtractError::Page {
                page: page_number,
                reason: "out of range".to_string(),
            })?;
        Ok(page.split_whitespace().map(str::to_string).collect())
    }
}

//! PDF text flattening using lopdf and pdf-extract.

use std::cell::OnceCell;
use std::panic;

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PageSource, Result};
use crate::error::DocumentError;

/// Page source backed by a parsed PDF document.
///
/// Page text is rendered with pdf-extract over the whole document when
/// possible, since it handles font encodings and layout spacing better.
/// When that fails, each page is rendered on its own with lopdf so a single
/// broken page cannot take the rest of the document down with it.
pub struct PdfFlattener {
    document: Document,
    raw_data: Vec<u8>,
    whole_document: bool,
    rendered: OnceCell<Option<Vec<String>>>,
}

impl PdfFlattener {
    /// Parse PDF bytes. Encrypted documents load fine; their text is
    /// unreadable until [`PageSource::decrypt`] succeeds.
    pub fn load(data: &[u8]) -> Result<Self> {
        let document =
            Document::load_mem(data).map_err(|e| DocumentError::Malformed(e.to_string()))?;

        debug!(
            "Loaded PDF with {} pages (encrypted: {})",
            document.get_pages().len(),
            document.is_encrypted()
        );

        Ok(Self {
            document,
            raw_data: data.to_vec(),
            whole_document: true,
            rendered: OnceCell::new(),
        })
    }

    /// Enable or disable the whole-document renderer.
    pub fn with_whole_document(mut self, enabled: bool) -> Self {
        self.whole_document = enabled;
        self
    }

    fn rendered_pages(&self) -> Option<&Vec<String>> {
        self.rendered
            .get_or_init(|| render_by_pages(&self.raw_data, self.page_count()))
            .as_ref()
    }
}

/// Render all pages with pdf-extract. `None` when the renderer fails or
/// disagrees with lopdf about the page count.
fn render_by_pages(data: &[u8], expected_pages: u32) -> Option<Vec<String>> {
    // pdf-extract panics on some malformed content streams.
    let outcome = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data));

    match outcome {
        Ok(Ok(pages)) if pages.len() == expected_pages as usize => {
            trace!("Rendered {} pages with pdf-extract", pages.len());
            Some(pages)
        }
        Ok(Ok(pages)) => {
            warn!(
                "pdf-extract rendered {} pages, expected {}; falling back to per-page rendering",
                pages.len(),
                expected_pages
            );
            None
        }
        Ok(Err(e)) => {
            warn!("pdf-extract failed ({}); falling back to per-page rendering", e);
            None
        }
        Err(_) => {
            warn!("pdf-extract panicked; falling back to per-page rendering");
            None
        }
    }
}

impl PageSource for PdfFlattener {
    fn is_encrypted(&self) -> bool {
        self.document.is_encrypted()
    }

    fn decrypt(&mut self, secret: &str) -> Result<()> {
        self.document
            .decrypt(secret)
            .map_err(|_| DocumentError::IncorrectSecret)?;

        // Save the decrypted document so pdf-extract sees plain streams
        let mut decrypted_data = Vec::new();
        self.document
            .save_to(&mut decrypted_data)
            .map_err(|e| DocumentError::Malformed(format!("failed to save decrypted PDF: {}", e)))?;
        self.raw_data = decrypted_data;
        self.rendered = OnceCell::new();

        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        if self.whole_document {
            if let Some(text) = self
                .rendered_pages()
                .and_then(|pages| pages.get((page - 1) as usize))
            {
                return Ok(text.clone());
            }
        }

        self.document
            .extract_text(&[page])
            .map_err(|e| DocumentError::PageText {
                page,
                reason: e.to_string(),
            })
    }
}

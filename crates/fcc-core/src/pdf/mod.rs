//! PDF decryption and text flattening.

mod extractor;

pub use extractor::PdfFlattener;

use tracing::{debug, warn};

use crate::error::DocumentError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// A paged document that can report protection and render page text.
pub trait PageSource {
    /// Whether the document reports itself as access-protected.
    fn is_encrypted(&self) -> bool;

    /// Decrypt the document with the given secret. Called at most once.
    fn decrypt(&mut self, secret: &str) -> Result<()>;

    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Render the text of a single page (1-indexed).
    fn page_text(&self, page: u32) -> Result<String>;
}

/// Flatten every page of `source` into one string, in page order.
///
/// Protected documents are decrypted with `secret` first; without one the
/// call fails before any page is rendered. Each page contributes its text
/// followed by a single newline. A page that fails to render contributes
/// nothing but its newline.
pub fn flatten<S: PageSource>(source: &mut S, secret: Option<&str>) -> Result<String> {
    if source.is_encrypted() {
        let secret = secret.ok_or(DocumentError::SecretRequired)?;
        source.decrypt(secret)?;
        debug!("Decrypted protected document");
    }

    let page_count = source.page_count();
    if page_count == 0 {
        return Err(DocumentError::NoPages);
    }

    let mut text = String::new();
    let mut unreadable = 0;

    for page in 1..=page_count {
        match source.page_text(page) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                warn!("Skipping unreadable page {}: {}", page, e);
                unreadable += 1;
            }
        }
        text.push('\n');
    }

    debug!(
        "Flattened {} pages ({} unreadable) into {} chars",
        page_count,
        unreadable,
        text.len()
    );

    Ok(text)
}

/// Load PDF bytes and flatten them into text.
pub fn flatten_text(data: &[u8], secret: Option<&str>) -> Result<String> {
    let mut flattener = PdfFlattener::load(data)?;
    flatten(&mut flattener, secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentErrorKind;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// In-memory page source for exercising the flattening policy.
    struct FakeSource {
        encrypted: bool,
        secret: &'static str,
        pages: Vec<Option<&'static str>>,
        pages_requested: Cell<u32>,
    }

    impl FakeSource {
        fn new(pages: Vec<Option<&'static str>>) -> Self {
            Self {
                encrypted: false,
                secret: "",
                pages,
                pages_requested: Cell::new(0),
            }
        }

        fn protected(mut self, secret: &'static str) -> Self {
            self.encrypted = true;
            self.secret = secret;
            self
        }
    }

    impl PageSource for FakeSource {
        fn is_encrypted(&self) -> bool {
            self.encrypted
        }

        fn decrypt(&mut self, secret: &str) -> Result<()> {
            if secret != self.secret {
                return Err(DocumentError::IncorrectSecret);
            }
            self.encrypted = false;
            Ok(())
        }

        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_text(&self, page: u32) -> Result<String> {
            self.pages_requested.set(self.pages_requested.get() + 1);
            self.pages[(page - 1) as usize]
                .map(str::to_string)
                .ok_or_else(|| DocumentError::PageText {
                    page,
                    reason: "broken content stream".to_string(),
                })
        }
    }

    #[test]
    fn test_flatten_joins_pages_in_order() {
        let mut source = FakeSource::new(vec![Some("first"), Some("second")]);
        let text = flatten(&mut source, None).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }

    #[test]
    fn test_protected_without_secret_fails_before_rendering() {
        let mut source = FakeSource::new(vec![Some("secret page")]).protected("1020304050");

        let err = flatten(&mut source, None).unwrap_err();

        assert!(matches!(err, DocumentError::SecretRequired));
        assert_eq!(err.kind(), DocumentErrorKind::Protected);
        assert_eq!(source.pages_requested.get(), 0);
    }

    #[test]
    fn test_protected_with_wrong_secret() {
        let mut source = FakeSource::new(vec![Some("secret page")]).protected("1020304050");

        let err = flatten(&mut source, Some("999")).unwrap_err();

        assert!(matches!(err, DocumentError::IncorrectSecret));
        assert_eq!(source.pages_requested.get(), 0);
    }

    #[test]
    fn test_protected_with_secret() {
        let mut source = FakeSource::new(vec![Some("secret page")]).protected("1020304050");
        let text = flatten(&mut source, Some("1020304050")).unwrap();
        assert_eq!(text, "secret page\n");
    }

    #[test]
    fn test_unreadable_page_is_tolerated() {
        let mut source = FakeSource::new(vec![Some("page one"), None, Some("page three")]);

        let text = flatten(&mut source, None).unwrap();

        assert_eq!(text, "page one\n\npage three\n");
        assert_eq!(source.pages_requested.get(), 3);
    }

    #[test]
    fn test_no_pages() {
        let mut source = FakeSource::new(vec![]);
        let err = flatten(&mut source, None).unwrap_err();
        assert!(matches!(err, DocumentError::NoPages));
    }
}

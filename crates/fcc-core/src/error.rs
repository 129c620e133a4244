//! Error types for the fcc-core library.

use thiserror::Error;

/// Main error type for the fcc library.
#[derive(Error, Debug)]
pub enum FccError {
    /// Document decryption or flattening error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or unwritable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning document bytes into text.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document is encrypted and no secret was supplied.
    #[error("document is protected and no secret was provided")]
    SecretRequired,

    /// The supplied secret did not decrypt the document.
    #[error("document is protected and the secret was rejected")]
    IncorrectSecret,

    /// The bytes are not a readable PDF.
    #[error("failed to parse document: {0}")]
    Malformed(String),

    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// A single page could not be rendered to text.
    #[error("failed to extract text from page {page}: {reason}")]
    PageText { page: u32, reason: String },
}

/// Coarse classification of [`DocumentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentErrorKind {
    /// Access-protected document (missing or wrong secret).
    Protected,
    /// Bytes that do not form a usable document.
    Malformed,
}

impl DocumentError {
    /// Classify the error.
    pub fn kind(&self) -> DocumentErrorKind {
        match self {
            DocumentError::SecretRequired | DocumentError::IncorrectSecret => {
                DocumentErrorKind::Protected
            }
            DocumentError::Malformed(_)
            | DocumentError::NoPages
            | DocumentError::PageText { .. } => DocumentErrorKind::Malformed,
        }
    }
}

impl FccError {
    /// Whether the failure was caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FccError::Document(_))
    }
}

/// Result type for the fcc library.
pub type Result<T> = std::result::Result<T, FccError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_kind() {
        assert_eq!(DocumentError::SecretRequired.kind(), DocumentErrorKind::Protected);
        assert_eq!(DocumentError::IncorrectSecret.kind(), DocumentErrorKind::Protected);
        assert_eq!(
            DocumentError::Malformed("bad xref".to_string()).kind(),
            DocumentErrorKind::Malformed
        );
        assert_eq!(DocumentError::NoPages.kind(), DocumentErrorKind::Malformed);
    }

    #[test]
    fn test_client_error_classification() {
        let err: FccError = DocumentError::SecretRequired.into();
        assert!(err.is_client_error());

        let err = FccError::Config("missing section".to_string());
        assert!(!err.is_client_error());
    }
}

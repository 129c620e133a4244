//! Core library for FCC (Formulario de Conocimiento del Cliente) processing.
//!
//! This crate provides:
//! - PDF decryption and text flattening
//! - Rule-driven extraction of the form's five field groups
//! - The grouped record model and pipeline configuration

pub mod error;
pub mod form;
pub mod models;
pub mod pdf;

use tracing::{info, warn};

pub use error::{DocumentError, DocumentErrorKind, FccError, Result};
pub use form::{ExtractionResult, FormExtractor, FormParser};
pub use models::config::FccConfig;
pub use models::record::{ExtractedRecord, FieldValue, Group, GroupRecord};
pub use pdf::{flatten, flatten_text, PageSource, PdfFlattener};

/// Decrypt, flatten and extract a form using the default configuration.
///
/// `secret` is only consulted when the document is protected.
pub fn process_document(data: &[u8], secret: Option<&str>) -> Result<ExtractedRecord> {
    process_document_with(&FccConfig::default(), data, secret).map(|result| result.record)
}

/// Decrypt, flatten and extract a form.
pub fn process_document_with(
    config: &FccConfig,
    data: &[u8],
    secret: Option<&str>,
) -> Result<ExtractionResult> {
    let text = flatten_document(config, data, secret)?;

    let result = FormParser::from_config(&config.extraction).parse(&text);
    info!(
        "Extracted {}/{} fields in {}ms",
        result.record.filled_count(),
        result.record.field_count(),
        result.processing_time_ms
    );

    Ok(result)
}

/// Decrypt and flatten PDF bytes using the configured renderer.
pub fn flatten_document(config: &FccConfig, data: &[u8], secret: Option<&str>) -> Result<String> {
    let mut flattener =
        PdfFlattener::load(data)?.with_whole_document(config.pdf.prefer_whole_document);
    let text = flatten(&mut flattener, secret)?;

    let length = text.trim().chars().count();
    if length < config.pdf.min_text_length {
        warn!(
            "Flattened text is only {} chars; the document may be scanned or empty",
            length
        );
    }

    Ok(text)
}

//! FCC form field extraction.
//!
//! Turns the flattened text of a form into an [`ExtractedRecord`] with five
//! groups of named fields. Extraction never fails: fields that cannot be
//! located are present with no value.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, FormParser};

use crate::models::record::ExtractedRecord;

/// Trait for form extractors.
pub trait FormExtractor {
    /// Extract every field of the form from flattened text.
    fn extract(&self, text: &str) -> ExtractedRecord;
}

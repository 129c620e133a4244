//! Section assemblers and record composition for FCC forms.

use std::time::Instant;

use tracing::{debug, info, trace};

use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractedRecord, Group, GroupRecord};

use super::rules::{locate_match, rules_for, FieldRule, Normalizer};
use super::FormExtractor;

/// Result of form extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: ExtractedRecord,
    /// Fields that resolved to no value, as `Group.Field`.
    pub missing_fields: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-driven form parser.
///
/// Every field is located independently against the whole text, so a field
/// that fails to match never affects another one.
#[derive(Debug, Clone, Default)]
pub struct FormParser {
    /// Replaces the built-in country fallback.
    default_country: Option<String>,
    /// Replaces the built-in city fallback.
    default_city: Option<String>,
}

impl FormParser {
    /// Create a parser using the built-in fallbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_default_country(&config.default_country)
            .with_default_city(&config.default_city)
    }

    /// Set the country used when the birth-country fragment is absent.
    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = Some(country.into());
        self
    }

    /// Set the city used when the residence fragment is absent.
    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = Some(city.into());
        self
    }

    fn default_for(&self, rule: &FieldRule) -> Option<&str> {
        match rule.spec.normalizer {
            Normalizer::CountryFallback => self.default_country.as_deref(),
            Normalizer::CityFallback => self.default_city.as_deref(),
            Normalizer::Verbatim | Normalizer::Collapse => None,
        }
    }

    /// Build the sub-record for one group.
    fn assemble_group(&self, group: Group, text: &str) -> GroupRecord {
        let mut record = GroupRecord::new(group);

        for rule in rules_for(group) {
            let value = rule.evaluate(text, self.default_for(rule));

            if tracing::enabled!(tracing::Level::TRACE) {
                let span = locate_match(text, rule.pattern()).and_then(|m| m.position);
                trace!("{}.{} -> {:?} (span {:?})", group, rule.spec.field, value, span);
            }

            record.push(rule.spec.field, value);
        }

        record
    }

    /// Parse a form from flattened text.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing form from {} characters of text", text.len());

        let groups = Group::ALL.map(|group| self.assemble_group(group, text));
        let record = ExtractedRecord::compose(groups);
        let missing_fields = record.missing_fields();

        debug!(
            "Extracted {}/{} fields",
            record.filled_count(),
            record.field_count()
        );

        ExtractionResult {
            record,
            missing_fields,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl FormExtractor for FormParser {
    fn extract(&self, text: &str) -> ExtractedRecord {
        self.parse(text).record
    }
}

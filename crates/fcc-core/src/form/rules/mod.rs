//! Rule-based field extraction for FCC forms.
//!
//! Every output field is described by one static [`FieldSpec`] row: the
//! label that introduces it, what bounds its value, how the value is
//! normalized, and what it falls back to. Rows are compiled into
//! [`FieldRule`]s once per process and shared read-only.

pub mod locator;
pub mod normalize;
pub mod patterns;

pub use locator::{locate, locate_match, FieldPattern};
pub use normalize::{
    city_fallback, collapse, collapse_whitespace, country_fallback, verbatim, DEFAULT_CITY,
    DEFAULT_COUNTRY,
};
pub use patterns::{rules_for, FIELD_RULES, FIELD_SPECS};

use crate::models::record::Group;

/// A located value with its position in the source text.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in source text.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Expected shape of a value whose end cannot be anchored to the next label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A run of digits (document numbers, phones, postal codes).
    Digits,
    /// `YYYY-MM-DD`.
    IsoDate,
    /// `$` followed by a thousands-grouped amount with optional decimals.
    /// Only the amount is captured.
    Currency,
    /// `Sí` or `No`.
    YesNo,
}

impl Shape {
    /// Regex fragment with exactly one capture group around the value.
    pub fn capture(&self) -> &'static str {
        match self {
            Shape::Digits => r"(\d+)",
            Shape::IsoDate => r"(\d{4}-\d{2}-\d{2})",
            Shape::Currency => r"\$(\d{1,3}(?:,\d{3})*(?:\.\d+)?)",
            Shape::YesNo => r"(Sí|No)",
        }
    }
}

/// What ends a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The next label in the form layout.
    Label(&'static str),
    /// The value's own shape.
    Shape(Shape),
}

/// How a located span is turned into the output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    /// Trim only.
    Verbatim,
    /// Collapse layout whitespace.
    Collapse,
    /// Text after a birth-country fragment, or the default country.
    CountryFallback,
    /// Text after a residence fragment, or the default city.
    CityFallback,
}

impl Normalizer {
    /// Apply to a located span. Fallback normalizers use `default` when
    /// the span has no usable fragment, and never return `None` when given
    /// a default.
    pub fn apply(&self, raw: Option<&str>, default: Option<&str>) -> Option<String> {
        match self {
            Normalizer::Verbatim => verbatim(raw),
            Normalizer::Collapse => collapse(raw),
            Normalizer::CountryFallback => {
                Some(country_fallback(raw, default.unwrap_or(DEFAULT_COUNTRY)))
            }
            Normalizer::CityFallback => Some(city_fallback(raw, default.unwrap_or(DEFAULT_CITY))),
        }
    }
}

/// Static description of one output field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub group: Group,
    pub field: &'static str,
    /// Literal label text preceding the value.
    pub label: &'static str,
    pub terminator: Terminator,
    pub normalizer: Normalizer,
    /// Value used when nothing usable is found.
    pub default: Option<&'static str>,
}

/// A [`FieldSpec`] with its compiled pattern.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub spec: &'static FieldSpec,
    pattern: FieldPattern,
}

impl FieldRule {
    /// Compile the pattern for `spec`.
    pub fn new(spec: &'static FieldSpec) -> Result<Self, regex::Error> {
        let pattern = FieldPattern::compile(spec.label, &spec.terminator)?;
        Ok(Self { spec, pattern })
    }

    pub fn pattern(&self) -> &FieldPattern {
        &self.pattern
    }

    /// Locate, normalize and default the field. `default` overrides the
    /// row's declared default.
    pub fn evaluate(&self, text: &str, default: Option<&str>) -> Option<String> {
        let default = default.or(self.spec.default);
        let raw = locate(text, &self.pattern);
        self.spec
            .normalizer
            .apply(raw, default)
            .or_else(|| default.map(str::to_string))
    }
}

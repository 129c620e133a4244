//! Value normalizers. All of them are total: any input, including a missing
//! match, produces a defined value.

use lazy_static::lazy_static;
use regex::Regex;

/// Country used when no birth-country fragment can be found.
pub const DEFAULT_COUNTRY: &str = "Colombia";

/// City used when no residence fragment can be found.
pub const DEFAULT_CITY: &str = "BOGOTÁ";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    static ref BIRTH_FRAGMENT: Regex = Regex::new(r"(?m)nacimiento\s+(.+?)$").unwrap();

    static ref RESIDENCE_FRAGMENT: Regex = Regex::new(r"(?m)residencia\s+(.+?)$").unwrap();
}

/// Collapse every whitespace run into a single space and trim.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value, " ").trim().to_string()
}

/// [`collapse_whitespace`] over an optional match.
pub fn collapse(value: Option<&str>) -> Option<String> {
    value.map(collapse_whitespace)
}

/// Trim surrounding whitespace, keeping the value otherwise as found.
pub fn verbatim(value: Option<&str>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Text following `nacimiento` on the same line, or `default`.
pub fn country_fallback(value: Option<&str>, default: &str) -> String {
    after_fragment(value, &BIRTH_FRAGMENT).unwrap_or_else(|| default.to_string())
}

/// Text following `residencia` on the same line, or `default`.
pub fn city_fallback(value: Option<&str>, default: &str) -> String {
    after_fragment(value, &RESIDENCE_FRAGMENT).unwrap_or_else(|| default.to_string())
}

fn after_fragment(value: Option<&str>, fragment: &Regex) -> Option<String> {
    let caps = fragment.captures(value?)?;
    let found = caps[1].trim();
    if found.is_empty() {
        None
    } else {
        Some(found.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  CARRERA 7\n  # 71 - 21\t "), "CARRERA 7 # 71 - 21");
        assert_eq!(collapse_whitespace("\n\n"), "");
        assert_eq!(collapse(None), None);
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let samples = [
            "",
            "   ",
            "single",
            " leading",
            "trailing\n",
            "MARIA\n  JOSE",
            "a\t\tb \r\n c",
            "ÁLVARO  PÉREZ\u{00a0}\u{00a0}GÓMEZ",
        ];

        for sample in samples {
            let once = collapse_whitespace(sample);
            assert_eq!(collapse_whitespace(&once), once, "input: {:?}", sample);
        }
    }

    #[test]
    fn test_verbatim_trims_only() {
        assert_eq!(verbatim(Some(" Persona  Natural ")), Some("Persona  Natural".to_string()));
        assert_eq!(verbatim(None), None);
    }

    #[test]
    fn test_country_fallback_reads_after_fragment() {
        let span = "nacimiento Colombia\nPaís nacionalidad Colombia\n¿Otra nacionalidad? No";
        assert_eq!(country_fallback(Some(span), DEFAULT_COUNTRY), "Colombia");

        let span = "nacimiento   Perú   \nmore text";
        assert_eq!(country_fallback(Some(span), DEFAULT_COUNTRY), "Perú");
    }

    #[test]
    fn test_country_fallback_defaults() {
        assert_eq!(country_fallback(None, DEFAULT_COUNTRY), "Colombia");
        assert_eq!(country_fallback(Some("Ecuador"), DEFAULT_COUNTRY), "Colombia");
        assert_eq!(country_fallback(Some(""), "Chile"), "Chile");
    }

    #[test]
    fn test_city_fallback() {
        let span = "de residencia MEDELLÍN\nInformación laboral\nSituación laboral Empleado";
        assert_eq!(city_fallback(Some(span), DEFAULT_CITY), "MEDELLÍN");
        assert_eq!(city_fallback(Some("CALI"), DEFAULT_CITY), "BOGOTÁ");
        assert_eq!(city_fallback(None, DEFAULT_CITY), "BOGOTÁ");
    }

    #[test]
    fn test_blank_fragment_uses_default() {
        assert_eq!(country_fallback(Some("País de nacimiento   "), "Chile"), "Chile");
        assert_eq!(city_fallback(Some("Ciudad de residencia \t "), DEFAULT_CITY), "BOGOTÁ");
    }
}

//! Label/terminator field location.

use regex::Regex;

use super::{ExtractionMatch, Terminator};

/// A compiled label/terminator pair.
///
/// The pattern matches the label, any whitespace (including line breaks),
/// then lazily captures up to the terminator. With a label terminator the
/// capture must be followed by whitespace and the next label; with a shape
/// terminator the capture is the value shape itself.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
}

impl FieldPattern {
    /// Compile a pattern for a literal `label` bounded by `terminator`.
    pub fn compile(label: &str, terminator: &Terminator) -> Result<Self, regex::Error> {
        let label = regex::escape(label);
        let pattern = match terminator {
            Terminator::Label(next) => {
                format!(r"(?s){}\s+(.+?)\s+{}", label, regex::escape(next))
            }
            Terminator::Shape(shape) => format!(r"(?s){}\s+{}", label, shape.capture()),
        };

        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

}

/// Return the span between the first occurrence of the pattern's label and
/// its terminator, untrimmed. `None` when the label is absent or the
/// terminator never follows it.
pub fn locate<'t>(text: &'t str, pattern: &FieldPattern) -> Option<&'t str> {
    locate_match(text, pattern).map(|m| m.value)
}

/// Like [`locate`], keeping the byte offsets of the captured span.
pub fn locate_match<'t>(text: &'t str, pattern: &FieldPattern) -> Option<ExtractionMatch<&'t str>> {
    let caps = pattern.regex.captures(text)?;
    let span = caps.get(1)?;
    Some(ExtractionMatch::new(span.as_str()).with_position(span.start(), span.end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::rules::Shape;

    fn label(label: &str, next: &'static str) -> FieldPattern {
        FieldPattern::compile(label, &Terminator::Label(next)).unwrap()
    }

    #[test]
    fn test_locate_between_labels() {
        let pattern = label("Tipo cliente/vinculación", "Tipo solicitud");
        let text = "Tipo cliente/vinculación  Persona Natural   Tipo solicitud  Nueva";

        assert_eq!(locate(text, &pattern), Some("Persona Natural"));
    }

    #[test]
    fn test_locate_spans_newlines() {
        let pattern = label("Primer nombre", "Segundo nombre");
        let text = "Primer nombre\n\n  MARIA\n  JOSE \nSegundo nombre  ANA";

        assert_eq!(locate(text, &pattern), Some("MARIA\n  JOSE"));
    }

    #[test]
    fn test_locate_first_occurrence_wins() {
        let pattern = label("Canal", "Sucursal");
        let text = "Canal Directo Sucursal Norte Canal Agencia Sucursal Sur";

        assert_eq!(locate(text, &pattern), Some("Directo"));
    }

    #[test]
    fn test_locate_missing_terminator() {
        let pattern = label("Ramo", "Producto");
        let text = "Ramo Vida individual y todo lo que sigue hasta el final";

        assert_eq!(locate(text, &pattern), None);
    }

    #[test]
    fn test_locate_missing_label() {
        let pattern = label("Ramo", "Producto");
        assert_eq!(locate("Producto Vida", &pattern), None);
    }

    #[test]
    fn test_label_metacharacters_are_literal() {
        let pattern = label("Producto", "No. formulario");

        assert_eq!(locate("Producto Vida No. formulario 77", &pattern), Some("Vida"));
        assert_eq!(locate("Producto Vida NoX formulario 77", &pattern), None);
    }

    #[test]
    fn test_locate_digits_shape() {
        let pattern = FieldPattern::compile("Celular", &Terminator::Shape(Shape::Digits)).unwrap();
        assert_eq!(locate("Celular   3001234567 Dirección", &pattern), Some("3001234567"));
        assert_eq!(locate("Celular   no registra", &pattern), None);
    }

    #[test]
    fn test_locate_match_positions() {
        let pattern = FieldPattern::compile("Código postal", &Terminator::Shape(Shape::Digits)).unwrap();
        let text = "Código postal 110111";

        let found = locate_match(text, &pattern).unwrap();
        let (start, end) = found.position.unwrap();
        assert_eq!(&text[start..end], "110111");
    }
}

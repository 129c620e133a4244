//! The field table for FCC forms.
//!
//! Rows are grouped by output section and listed in output order. Labels are
//! literal text from the form layout. Numeric fields are bounded by their
//! value shape because the label that follows them is not reliably present
//! in the flattened text.

use lazy_static::lazy_static;

use super::{FieldRule, FieldSpec, Normalizer, Shape, Terminator, DEFAULT_CITY, DEFAULT_COUNTRY};
use crate::models::record::Group;

use super::Normalizer::{CityFallback, Collapse, CountryFallback, Verbatim};
use super::Terminator::Label;

const fn field(
    group: Group,
    field: &'static str,
    label: &'static str,
    terminator: Terminator,
    normalizer: Normalizer,
) -> FieldSpec {
    FieldSpec {
        group,
        field,
        label,
        terminator,
        normalizer,
        default: None,
    }
}

const fn shaped(group: Group, field: &'static str, label: &'static str, shape: Shape) -> FieldSpec {
    FieldSpec {
        group,
        field,
        label,
        terminator: Terminator::Shape(shape),
        normalizer: Verbatim,
        default: None,
    }
}

/// Every field of the form, in output order.
#[rustfmt::skip]
pub static FIELD_SPECS: &[FieldSpec] = &[
    // Datos del riesgo
    field(Group::RiskData, "Tipo_cliente_vinculacion", "Tipo cliente/vinculación", Label("Tipo solicitud"), Verbatim),
    field(Group::RiskData, "Tipo_solicitud", "Tipo solicitud", Label("Canal"), Verbatim),
    field(Group::RiskData, "Canal", "Canal", Label("Sucursal"), Verbatim),
    field(Group::RiskData, "Sucursal", "Sucursal", Label("Ramo"), Verbatim),
    field(Group::RiskData, "Ramo", "Ramo", Label("Producto"), Verbatim),
    field(Group::RiskData, "Producto", "Producto", Label("No. formulario"), Verbatim),
    shaped(Group::RiskData, "Fecha_formulario", "Fecha formulario", Shape::IsoDate),
    // Información personal
    field(Group::PersonalInfo, "Primer_nombre", "Primer nombre", Label("Segundo nombre"), Collapse),
    field(Group::PersonalInfo, "Segundo_nombre", "Segundo nombre", Label("Primer apellido"), Collapse),
    field(Group::PersonalInfo, "Primer_apellido", "Primer apellido", Label("Segundo apellido"), Collapse),
    field(Group::PersonalInfo, "Segundo_apellido", "Segundo apellido", Label("Tipo documento"), Collapse),
    field(Group::PersonalInfo, "Tipo_documento", "Tipo documento", Label("Número documento"), Collapse),
    shaped(Group::PersonalInfo, "Numero_documento", "Número documento", Shape::Digits),
    shaped(Group::PersonalInfo, "Fecha_expedicion", "Fecha expedición", Shape::IsoDate),
    field(Group::PersonalInfo, "Genero", "Género", Label("Estado civil"), Verbatim),
    field(Group::PersonalInfo, "Estado_civil", "Estado civil", Label("Fecha nacimiento"), Verbatim),
    shaped(Group::PersonalInfo, "Fecha_nacimiento", "Fecha nacimiento", Shape::IsoDate),
    field(Group::PersonalInfo, "Pais_nacimiento", "País nacimiento", Label("País nacionalidad"), Collapse),
    field(Group::PersonalInfo, "Pais_nacionalidad", "País nacionalidad", Label("¿Otra nacionalidad?"), Collapse),
    field(Group::PersonalInfo, "Otra_nacionalidad", "¿Otra nacionalidad?", Label("Otras nacionalidades"), Verbatim),
    // Información de contacto
    field(Group::ContactInfo, "Correo_electronico", "Correo electrónico", Label("Celular"), Collapse),
    shaped(Group::ContactInfo, "Celular", "Celular", Shape::Digits),
    field(Group::ContactInfo, "Direccion", "Dirección", Label("Código postal"), Collapse),
    shaped(Group::ContactInfo, "Codigo_postal", "Código postal", Shape::Digits),
    field(Group::ContactInfo, "Pais_residencia", "País de residencia", Label("Departamento de residencia"), Verbatim),
    field(Group::ContactInfo, "Departamento_residencia", "Departamento de residencia", Label("Ciudad de residencia"), Verbatim),
    field(Group::ContactInfo, "Ciudad_residencia", "Ciudad de residencia", Label("Información laboral"), Verbatim),
    // Información laboral
    field(Group::EmploymentInfo, "Situacion_laboral", "Situación laboral", Label("Profesión"), Verbatim),
    field(Group::EmploymentInfo, "Profesion", "Profesión", Label("NIT"), Collapse),
    field(Group::EmploymentInfo, "NIT", "NIT", Label("Nombre empresa"), Verbatim),
    field(Group::EmploymentInfo, "Nombre_empresa", "Nombre empresa", Label("País"), Collapse),
    FieldSpec {
        group: Group::EmploymentInfo,
        field: "Pais",
        label: "País",
        terminator: Label("Ciudad"),
        normalizer: CountryFallback,
        default: Some(DEFAULT_COUNTRY),
    },
    FieldSpec {
        group: Group::EmploymentInfo,
        field: "Ciudad",
        label: "Ciudad",
        terminator: Label("Dirección empresa"),
        normalizer: CityFallback,
        default: Some(DEFAULT_CITY),
    },
    field(Group::EmploymentInfo, "Direccion_empresa", "Dirección empresa", Label("Cargo que desempeña"), Collapse),
    field(Group::EmploymentInfo, "Cargo", "Cargo que desempeña", Label("Código CIIU"), Verbatim),
    field(Group::EmploymentInfo, "Codigo_CIIU", "Código CIIU", Label("Nombre de la actividad"), Verbatim),
    field(Group::EmploymentInfo, "Nombre_actividad", "Nombre de la actividad", Label("Formulario"), Verbatim),
    // Información financiera
    shaped(Group::FinancialInfo, "Total_activos", "Total activos", Shape::Currency),
    shaped(Group::FinancialInfo, "Total_pasivos", "Total pasivos", Shape::Currency),
    shaped(Group::FinancialInfo, "Total_patrimonio", "Total patrimonio", Shape::Currency),
    shaped(Group::FinancialInfo, "Ingresos_totales_anuales", "Ingresos totales anuales", Shape::Currency),
    shaped(Group::FinancialInfo, "Egresos_totales_anuales", "Egresos totales anuales", Shape::Currency),
    shaped(
        Group::FinancialInfo,
        "Realiza_operaciones_moneda_extranjera",
        "¿Realiza operaciones en moneda extranjera?",
        Shape::YesNo,
    ),
];

lazy_static! {
    /// Compiled rules, one per row of [`FIELD_SPECS`].
    pub static ref FIELD_RULES: Vec<FieldRule> = FIELD_SPECS
        .iter()
        .map(|spec| FieldRule::new(spec).expect("field table patterns are valid"))
        .collect();
}

/// Compiled rules belonging to `group`, in output order.
pub fn rules_for(group: Group) -> impl Iterator<Item = &'static FieldRule> {
    FIELD_RULES.iter().filter(move |rule| rule.spec.group == group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::rules::locate;
    use std::collections::HashSet;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(FIELD_RULES.len(), FIELD_SPECS.len());
    }

    #[test]
    fn test_field_names_unique_per_group() {
        let mut seen = HashSet::new();
        for spec in FIELD_SPECS {
            assert!(
                seen.insert((spec.group, spec.field)),
                "duplicate field {}.{}",
                spec.group,
                spec.field
            );
        }
    }

    #[test]
    fn test_every_group_has_fields() {
        let counts: Vec<usize> = Group::ALL.iter().map(|g| rules_for(*g).count()).collect();
        assert_eq!(counts, vec![7, 13, 7, 10, 6]);
    }

    #[test]
    fn test_rows_are_grouped_in_output_order() {
        let groups: Vec<Group> = FIELD_SPECS.iter().map(|s| s.group).collect();
        let mut sorted = groups.clone();
        sorted.sort();
        assert_eq!(groups, sorted);
    }

    #[test]
    fn test_locate_none_without_label() {
        let text = "Formulario de conocimiento del cliente\n\nsin etiquetas reconocibles 123 $4,000";
        for rule in FIELD_RULES.iter() {
            assert_eq!(
                locate(text, rule.pattern()),
                None,
                "{}.{} matched unlabeled text",
                rule.spec.group,
                rule.spec.field
            );
        }
    }

    #[test]
    fn test_only_fallback_rows_declare_defaults() {
        for spec in FIELD_SPECS {
            let is_fallback = matches!(spec.normalizer, CountryFallback | CityFallback);
            assert_eq!(spec.default.is_some(), is_fallback, "{}", spec.field);
        }
    }
}

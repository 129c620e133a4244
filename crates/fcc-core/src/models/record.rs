//! Extracted form record: five fixed groups of named string fields.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One of the five fixed top-level sections of an extracted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    /// Client relationship and request data (Datos del riesgo).
    #[serde(rename = "Datos_del_Riesgo")]
    RiskData,
    /// Names, identity document and nationality.
    #[serde(rename = "Informacion_Personal")]
    PersonalInfo,
    /// E-mail, phone and residence.
    #[serde(rename = "Informacion_Contacto")]
    ContactInfo,
    /// Occupation and employer.
    #[serde(rename = "Informacion_Laboral")]
    EmploymentInfo,
    /// Assets, liabilities, income and expenses.
    #[serde(rename = "Informacion_Financiera")]
    FinancialInfo,
}

impl Group {
    /// All groups in output order.
    pub const ALL: [Group; 5] = [
        Group::RiskData,
        Group::PersonalInfo,
        Group::ContactInfo,
        Group::EmploymentInfo,
        Group::FinancialInfo,
    ];

    /// Key used for this group in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            Group::RiskData => "Datos_del_Riesgo",
            Group::PersonalInfo => "Informacion_Personal",
            Group::ContactInfo => "Informacion_Contacto",
            Group::EmploymentInfo => "Informacion_Laboral",
            Group::FinancialInfo => "Informacion_Financiera",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A single extracted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    /// Field name as it appears in output.
    pub name: &'static str,
    /// Normalized value, or `None` when nothing matched and no default applies.
    pub value: Option<String>,
}

/// The fields of one group, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    group: Group,
    fields: Vec<FieldValue>,
}

impl GroupRecord {
    /// Create an empty sub-record for `group`.
    pub fn new(group: Group) -> Self {
        Self {
            group,
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn push(&mut self, name: &'static str, value: Option<String>) {
        self.fields.push(FieldValue { name, value });
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    /// Value of a field; `None` both for unknown fields and unmatched ones.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_deref())
    }

    /// Whether the field is declared in this group, matched or not.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for GroupRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(field.name, &field.value)?;
        }
        map.end()
    }
}

/// The structured result of extracting one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    groups: Vec<GroupRecord>,
}

impl ExtractedRecord {
    /// Compose sub-records into one record, ordered by [`Group::ALL`].
    pub fn compose(groups: impl IntoIterator<Item = GroupRecord>) -> Self {
        let mut groups: Vec<GroupRecord> = groups.into_iter().collect();
        groups.sort_by_key(|g| g.group);
        Self { groups }
    }

    pub fn groups(&self) -> &[GroupRecord] {
        &self.groups
    }

    pub fn group(&self, group: Group) -> Option<&GroupRecord> {
        self.groups.iter().find(|g| g.group == group)
    }

    /// Value of `group.field`, if present and matched.
    pub fn get(&self, group: Group, field: &str) -> Option<&str> {
        self.group(group).and_then(|g| g.get(field))
    }

    /// Iterate over every field as `(group, field)`.
    pub fn iter(&self) -> impl Iterator<Item = (Group, &FieldValue)> {
        self.groups
            .iter()
            .flat_map(|g| g.fields.iter().map(move |f| (g.group, f)))
    }

    /// Total number of declared fields.
    pub fn field_count(&self) -> usize {
        self.groups.iter().map(GroupRecord::len).sum()
    }

    /// Number of fields with a value.
    pub fn filled_count(&self) -> usize {
        self.iter().filter(|(_, f)| f.value.is_some()).count()
    }

    /// Fields without a value, as `Group.Field`.
    pub fn missing_fields(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, f)| f.value.is_none())
            .map(|(group, f)| format!("{}.{}", group.key(), f.name))
            .collect()
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(group.group.key(), group)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ExtractedRecord {
        let mut financial = GroupRecord::new(Group::FinancialInfo);
        financial.push("Total_activos", Some("1,200,000.50".to_string()));
        financial.push("Total_pasivos", None);

        let mut risk = GroupRecord::new(Group::RiskData);
        risk.push("Canal", Some("Asesor".to_string()));

        ExtractedRecord::compose([financial, risk])
    }

    #[test]
    fn test_compose_orders_groups() {
        let record = sample();
        let order: Vec<Group> = record.groups().iter().map(GroupRecord::group).collect();
        assert_eq!(order, vec![Group::RiskData, Group::FinancialInfo]);
    }

    #[test]
    fn test_get_and_contains() {
        let record = sample();

        assert_eq!(record.get(Group::FinancialInfo, "Total_activos"), Some("1,200,000.50"));
        assert_eq!(record.get(Group::FinancialInfo, "Total_pasivos"), None);

        let financial = record.group(Group::FinancialInfo).unwrap();
        assert!(financial.contains("Total_pasivos"));
        assert!(!financial.contains("Total_patrimonio"));
    }

    #[test]
    fn test_counts_and_missing() {
        let record = sample();
        assert_eq!(record.field_count(), 3);
        assert_eq!(record.filled_count(), 2);
        assert_eq!(
            record.missing_fields(),
            vec!["Informacion_Financiera.Total_pasivos".to_string()]
        );
    }

    #[test]
    fn test_serialize_preserves_order_and_nulls() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"Datos_del_Riesgo":{"Canal":"Asesor"},"Informacion_Financiera":{"Total_activos":"1,200,000.50","Total_pasivos":null}}"#
        );
    }

    #[test]
    fn test_group_serializes_as_key() {
        for group in Group::ALL {
            let json = serde_json::to_string(&group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.key()));
        }
    }
}

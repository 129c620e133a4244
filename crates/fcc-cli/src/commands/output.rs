//! Record rendering shared by the extraction commands.

use std::fs;
use std::path::Path;

use console::style;
use fcc_core::ExtractedRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON object keyed by group
    Json,
    /// One `group,field,value` row per field
    Csv,
    /// Indented plain text
    Text,
}

impl OutputFormat {
    /// File extension for outputs written in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_record(record: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["group", "field", "value"])?;
    for (group, field) in record.iter() {
        wtr.write_record([group.key(), field.name, field.value.as_deref().unwrap_or("")])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractedRecord) -> String {
    let mut output = String::new();

    for group in record.groups() {
        output.push_str(&format!("{}:\n", group.group().key()));
        for field in group.fields() {
            output.push_str(&format!(
                "  {}: {}\n",
                field.name,
                field.value.as_deref().unwrap_or("-")
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "{}/{} fields extracted\n",
        record.filled_count(),
        record.field_count()
    ));

    output
}

/// Write `content` to `path`, or print it to stdout.
pub fn emit(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcc_core::{FormExtractor, FormParser};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_has_one_row_per_field() {
        let record = FormParser::new().extract("Canal  Directo  Sucursal  Norte");
        let csv = format_record(&record, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "group,field,value");
        assert_eq!(lines.len(), record.field_count() + 1);
        assert!(lines.contains(&"Datos_del_Riesgo,Canal,Directo"));
        assert!(lines.contains(&"Datos_del_Riesgo,Ramo,"));
    }

    #[test]
    fn test_text_marks_missing_values() {
        let record = FormParser::new().extract("");
        let text = format_record(&record, OutputFormat::Text).unwrap();

        assert!(text.starts_with("Datos_del_Riesgo:\n  Tipo_cliente_vinculacion: -\n"));
        assert!(text.contains("  Pais: Colombia\n"));
        assert!(text.ends_with("2/43 fields extracted\n"));
    }
}

//! Process command - extract fields from a single form PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fcc_core::{flatten_document, DocumentErrorKind, ExtractedRecord, FccConfig, FccError, FormParser};

use super::load_config;
use super::output::{emit, format_record, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Secret for protected documents (usually the document number)
    #[arg(short, long, env = "FCC_PDF_SECRET")]
    secret: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the flattened text instead of extracting fields
    #[arg(long)]
    text_only: bool,

    /// List fields that could not be extracted
    #[arg(long)]
    show_missing: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading PDF...");
    pb.set_position(10);
    let data = fs::read(&args.input)?;

    pb.set_message("Flattening text...");
    pb.set_position(30);
    let text = flatten_document(&config, &data, args.secret.as_deref()).inspect_err(|e| {
        pb.finish_and_clear();
        if let Some(hint) = hint_for(e) {
            eprintln!("{} {}", style("ℹ").blue(), hint);
        }
    })?;

    if args.text_only {
        pb.finish_and_clear();
        return emit(&text, args.output.as_deref());
    }

    pb.set_message("Extracting fields...");
    pb.set_position(70);
    let record = extract_record(&text, &config);

    pb.finish_and_clear();

    let output = format_record(&record, args.format)?;
    emit(&output, args.output.as_deref())?;

    if args.show_missing {
        let missing = record.missing_fields();
        eprintln!();
        if missing.is_empty() {
            eprintln!("{} All fields extracted", style("✓").green());
        } else {
            eprintln!("{}", style("Missing fields:").yellow());
            for field in &missing {
                eprintln!("  - {}", field);
            }
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run the field rules over flattened text.
pub fn extract_record(text: &str, config: &FccConfig) -> ExtractedRecord {
    let result = FormParser::from_config(&config.extraction).parse(text);
    debug!(
        "Extracted {}/{} fields in {}ms",
        result.record.filled_count(),
        result.record.field_count(),
        result.processing_time_ms
    );
    result.record
}

/// Suggestion printed alongside a flattening failure.
fn hint_for(err: &FccError) -> Option<&'static str> {
    match err {
        FccError::Document(e) if e.kind() == DocumentErrorKind::Protected => {
            Some("Protected forms open with the holder's document number: pass it with --secret")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcc_core::DocumentError;

    #[test]
    fn test_hint_only_for_protected_documents() {
        assert!(hint_for(&DocumentError::SecretRequired.into()).is_some());
        assert!(hint_for(&DocumentError::IncorrectSecret.into()).is_some());
        assert!(hint_for(&DocumentError::NoPages.into()).is_none());
        assert!(hint_for(&FccError::Config("bad".to_string())).is_none());
    }
}

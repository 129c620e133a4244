//! Batch processing command for multiple form PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use fcc_core::{process_document_with, ExtractedRecord, FccConfig};

use super::load_config;
use super::output::{format_record, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input PDFs
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Secret for protected documents
    #[arg(short, long, env = "FCC_PDF_SECRET")]
    secret: Option<String>,

    /// Use each file's stem as its secret (forms named after the document number)
    #[arg(long, conflicts_with = "secret")]
    secret_from_name: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileOutcome {
    path: PathBuf,
    record: Option<ExtractedRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let secret = secret_for(&path, &args);
        let result = process_file(&path, secret.as_deref(), &config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(record) => outcomes.push(FileOutcome {
                path,
                record: Some(record),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                outcomes.push(FileOutcome {
                    path,
                    record: None,
                    error: Some(error_msg),
                    processing_time_ms,
                });
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        write_outputs(output_dir, &outcomes, args.format)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or(Path::new("."))
            .join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        eprintln!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    report(&outcomes, start.elapsed());

    Ok(())
}

fn write_outputs(dir: &Path, outcomes: &[FileOutcome], format: OutputFormat) -> anyhow::Result<()> {
    for outcome in outcomes {
        let Some(record) = &outcome.record else {
            continue;
        };
        let stem = outcome
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("form");
        let target = dir.join(format!("{}.{}", stem, format.extension()));

        fs::write(&target, format_record(record, format)?)?;
        debug!("Wrote {}", target.display());
    }
    Ok(())
}

fn report(outcomes: &[FileOutcome], elapsed: std::time::Duration) {
    let failures: Vec<(&Path, &str)> = outcomes
        .iter()
        .filter_map(|o| o.error.as_deref().map(|e| (o.path.as_path(), e)))
        .collect();

    eprintln!();
    eprintln!(
        "{} {} forms in {:.2}s: {} extracted, {} failed",
        style("✓").green(),
        outcomes.len(),
        elapsed.as_secs_f64(),
        style(outcomes.len() - failures.len()).green(),
        style(failures.len()).red()
    );

    for (path, error) in failures {
        eprintln!("  {} {}: {}", style("✗").red(), path.display(), error);
    }
}

fn secret_for(path: &Path, args: &BatchArgs) -> Option<String> {
    if args.secret_from_name {
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
    } else {
        args.secret.clone()
    }
}

fn process_file(path: &Path, secret: Option<&str>, config: &FccConfig) -> anyhow::Result<ExtractedRecord> {
    let data = fs::read(path)?;
    let result = process_document_with(config, &data, secret)?;
    Ok(result.record)
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "fields_extracted",
        "fields_total",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = outcome.processing_time_ms.to_string();

        match &outcome.record {
            Some(record) => wtr.write_record([
                filename,
                "success",
                &record.filled_count().to_string(),
                &record.field_count().to_string(),
                &time,
                "",
            ])?,
            None => wtr.write_record([
                filename,
                "error",
                "",
                "",
                &time,
                outcome.error.as_deref().unwrap_or(""),
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

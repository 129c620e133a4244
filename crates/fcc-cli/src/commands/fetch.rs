//! Fetch command - download a form from the document service and extract it.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use fcc_core::process_document_with;

use super::load_config;
use super::output::{emit, format_record, OutputFormat};
use crate::resolver::{Credentials, DocumentRequest, Resolver, ResolverError};

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Document type (CC, NIT, CE, ...)
    #[arg(short = 't', long)]
    type_document: String,

    /// Document number; also the secret of the returned PDF
    #[arg(short = 'n', long)]
    num_document: String,

    /// Form variant
    #[arg(long, default_value = "FCC-STA")]
    form_type: String,

    #[command(flatten)]
    credentials: CredentialArgs,

    /// Keep a copy of the downloaded PDF
    #[arg(long)]
    save_pdf: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Document service credentials.
#[derive(Args)]
pub struct CredentialArgs {
    /// Service username
    #[arg(long, env = "FCC_USERNAME", hide_env_values = true)]
    username: Option<String>,

    /// Service password
    #[arg(long, env = "FCC_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl TryFrom<CredentialArgs> for Credentials {
    type Error = ResolverError;

    fn try_from(args: CredentialArgs) -> Result<Self, Self::Error> {
        Credentials::from_parts(args.username, args.password)
    }
}

pub async fn run(args: FetchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let request = DocumentRequest::new(args.type_document, args.num_document, args.form_type);
    request.validate()?;

    let resolver = Resolver::new(&config.resolver, args.credentials.try_into()?)?;
    let data = resolver.fetch(&request).await?;
    info!("Downloaded {} bytes", data.len());

    if let Some(path) = &args.save_pdf {
        fs::write(path, &data)?;
        eprintln!("{} PDF saved to {}", style("✓").green(), path.display());
    }

    let secret = request.secret().to_string();
    let result = tokio::task::spawn_blocking(move || {
        process_document_with(&config, &data, Some(&secret))
    })
    .await??;

    let output = format_record(&result.record, args.format)?;
    emit(&output, args.output.as_deref())
}

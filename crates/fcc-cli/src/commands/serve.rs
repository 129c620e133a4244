//! Serve command - run the extraction HTTP service.

use clap::Args;

use super::fetch::CredentialArgs;
use super::load_config;
use crate::resolver::Resolver;
use crate::server::{self, AppState};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (default from config)
    #[arg(long)]
    host: Option<String>,

    /// Port (default from config)
    #[arg(short, long)]
    port: Option<u16>,

    #[command(flatten)]
    credentials: CredentialArgs,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let resolver = Resolver::new(&config.resolver, args.credentials.try_into()?)?;
    server::serve(AppState::new(resolver, config), &host, port).await
}

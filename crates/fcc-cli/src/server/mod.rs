//! HTTP service exposing form extraction.
//!
//! A request names a document; the form is fetched from the upstream
//! document service, decrypted with the document number and extracted.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use fcc_core::FccConfig;

use crate::resolver::Resolver;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub config: Arc<FccConfig>,
}

impl AppState {
    pub fn new(resolver: Resolver, config: FccConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            config: Arc::new(config),
        }
    }
}

/// Start the web server.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

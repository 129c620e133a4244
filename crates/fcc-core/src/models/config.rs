//! Configuration structures for the form processing pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{FccError, Result};
use crate::form::rules::{DEFAULT_CITY, DEFAULT_COUNTRY};

/// Main configuration for the fcc pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FccConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Upstream document resolver configuration.
    pub resolver: ResolverConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Render the whole document with pdf-extract before falling back to
    /// per-page rendering.
    pub prefer_whole_document: bool,

    /// Flattened text shorter than this is logged as suspicious.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_whole_document: true,
            min_text_length: 50,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Value used for the employment country when no birth-country fragment is found.
    pub default_country: String,

    /// Value used for the employment city when no residence fragment is found.
    pub default_city: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_country: DEFAULT_COUNTRY.to_string(),
            default_city: DEFAULT_CITY.to_string(),
        }
    }
}

/// Upstream identity and document lookup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Authentication endpoint returning an access token.
    pub auth_url: String,

    /// Base URL of the document lookup endpoint.
    pub lookup_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://localhost:8080/login/oauth/authenticate/v1".to_string(),
            lookup_url: "http://localhost:8080/fcc/validate-document".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl FccConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FccError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| FccError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

//! Client for the upstream document service.
//!
//! Forms are fetched in two steps: an access token is requested with the
//! service credentials, then the form is looked up by document type and
//! number. The service returns the PDF base64-encoded; it is protected with
//! the document number.

use std::time::Duration;

use base64::Engine;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use fcc_core::models::config::ResolverConfig;

/// Identity document types accepted by the service.
pub const DOCUMENT_TYPES: &[&str] = &[
    "CC", "NIT", "CE", "CN", "TI", "RC", "PA", "AS", "MS", "CD", "PE", "SC", "DE", "SI", "PT", "NS",
];

/// Form variants accepted by the service.
pub const FORM_TYPES: &[&str] = &["FCC-STA", "FCC-SIM"];

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("invalid document type: {0}")]
    InvalidDocumentType(String),

    #[error("invalid form type: {0}")]
    InvalidFormType(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("document lookup failed: {0}")]
    Lookup(String),

    #[error("failed to decode document payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("missing service credentials (set FCC_USERNAME and FCC_PASSWORD)")]
    MissingCredentials,
}

impl ResolverError {
    /// Whether the request itself was invalid, as opposed to the upstream call failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ResolverError::InvalidDocumentType(_)
                | ResolverError::InvalidFormType(_)
                | ResolverError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;

/// Service account credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials, rejecting absent or blank values.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Result<Self> {
        let present = |v: Option<String>| v.filter(|v| !v.is_empty());
        match (present(username), present(password)) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(ResolverError::MissingCredentials),
        }
    }
}

/// A form lookup.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub document_type: String,
    pub document_number: String,
    pub form_type: String,
}

impl DocumentRequest {
    pub fn new(
        document_type: impl Into<String>,
        document_number: impl Into<String>,
        form_type: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_number: document_number.into(),
            form_type: form_type.into(),
        }
    }

    /// Check the document and form types against the accepted sets.
    pub fn validate(&self) -> Result<()> {
        if !DOCUMENT_TYPES.contains(&self.document_type.as_str()) {
            return Err(ResolverError::InvalidDocumentType(self.document_type.clone()));
        }
        if !FORM_TYPES.contains(&self.form_type.as_str()) {
            return Err(ResolverError::InvalidFormType(self.form_type.clone()));
        }
        Ok(())
    }

    /// Secret protecting the returned PDF.
    pub fn secret(&self) -> &str {
        &self.document_number
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct AuthData {
    #[serde(rename = "AccessToken")]
    access_token: String,
}

#[derive(Deserialize)]
struct DocumentData {
    file: String,
}

/// Upstream document service client.
pub struct Resolver {
    client: reqwest::Client,
    auth_url: String,
    lookup_url: String,
    credentials: Credentials,
}

impl Resolver {
    pub fn new(config: &ResolverConfig, credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            auth_url: config.auth_url.clone(),
            lookup_url: config.lookup_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Request a fresh access token.
    async fn authenticate(&self) -> Result<String> {
        let response = self
            .client
            .post(&self.auth_url)
            .json(&serde_json::json!({
                "username": self.credentials.username,
                "password": self.credentials.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolverError::Authentication(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: Envelope<AuthData> = response
            .json()
            .await
            .map_err(|e| ResolverError::Authentication(format!("unexpected response: {}", e)))?;

        debug!("Obtained access token");
        Ok(body.data.access_token)
    }

    /// Validate the request, then download and decode the form PDF.
    pub async fn fetch(&self, request: &DocumentRequest) -> Result<Vec<u8>> {
        request.validate()?;

        let token = self.authenticate().await?;
        let url = format!(
            "{}/{}/{}",
            self.lookup_url, request.document_type, request.document_number
        );

        info!(
            "Fetching {} form for {} document",
            request.form_type, request.document_type
        );

        let response = self
            .client
            .get(&url)
            .query(&[("form_type", request.form_type.as_str())])
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolverError::Lookup(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: Envelope<DocumentData> = response
            .json()
            .await
            .map_err(|e| ResolverError::Lookup(format!("unexpected response: {}", e)))?;

        let data = base64::engine::general_purpose::STANDARD.decode(body.data.file.trim())?;
        debug!("Decoded {} bytes of PDF data", data.len());

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_known_types() {
        for document_type in DOCUMENT_TYPES {
            let request = DocumentRequest::new(*document_type, "123", "FCC-SIM");
            assert!(request.validate().is_ok(), "{}", document_type);
        }
    }

    #[test]
    fn test_validate_rejects_unknown_types() {
        let request = DocumentRequest::new("XX", "123", "FCC-STA");
        assert!(matches!(
            request.validate(),
            Err(ResolverError::InvalidDocumentType(t)) if t == "XX"
        ));

        let request = DocumentRequest::new("cc", "123", "FCC-STA");
        assert!(request.validate().is_err());

        let request = DocumentRequest::new("CC", "123", "FCC-XYZ");
        assert!(matches!(
            request.validate(),
            Err(ResolverError::InvalidFormType(_))
        ));
    }

    #[test]
    fn test_credentials_required() {
        assert!(matches!(
            Credentials::from_parts(Some("user".to_string()), None),
            Err(ResolverError::MissingCredentials)
        ));
        assert!(Credentials::from_parts(Some(String::new()), Some("pass".to_string())).is_err());
        assert!(Credentials::from_parts(Some("user".to_string()), Some("pass".to_string())).is_ok());
    }

    #[test]
    fn test_secret_is_document_number() {
        let request = DocumentRequest::new("CC", "1020304050", "FCC-STA");
        assert_eq!(request.secret(), "1020304050");
    }

    #[tokio::test]
    async fn test_fetch_validates_before_any_request() {
        let config = ResolverConfig {
            auth_url: "http://127.0.0.1:1/auth".to_string(),
            lookup_url: "http://127.0.0.1:1/lookup".to_string(),
            timeout_secs: 1,
        };
        let resolver = Resolver::new(
            &config,
            Credentials {
                username: "user".to_string(),
                password: "pass".to_string(),
            },
        )
        .unwrap();

        let err = resolver
            .fetch(&DocumentRequest::new("ZZ", "1", "FCC-STA"))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}

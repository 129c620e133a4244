//! Request handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use fcc_core::{process_document_with, ExtractedRecord, FccError};

use super::AppState;
use crate::resolver::{DocumentRequest, ResolverError};

/// Query parameters of the extraction endpoint.
#[derive(Debug, Deserialize)]
pub struct ExtractParams {
    pub type_document: Option<String>,
    pub num_document: Option<String>,
    pub form_type: Option<String>,
}

impl ExtractParams {
    /// Build a document request when every parameter is present and non-empty.
    fn into_request(self) -> Option<DocumentRequest> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(DocumentRequest::new(
            present(self.type_document)?,
            present(self.num_document)?,
            present(self.form_type)?,
        ))
    }
}

/// Error response in the service's envelope.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Upstream(m) => (StatusCode::BAD_GATEWAY, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({"status": "error", "message": message}))).into_response()
    }
}

impl From<ResolverError> for ApiError {
    fn from(e: ResolverError) -> Self {
        if e.is_client_error() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::Upstream(e.to_string())
        }
    }
}

impl From<FccError> for ApiError {
    fn from(e: FccError) -> Self {
        if e.is_client_error() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Fetch the named form, decrypt it with the document number and extract it.
pub async fn extract_info_pdf(
    State(state): State<AppState>,
    Query(params): Query<ExtractParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request = params
        .into_request()
        .ok_or_else(|| ApiError::BadRequest("missing request parameters".to_string()))?;

    let data = state.resolver.fetch(&request).await.inspect_err(|e| {
        warn!("Document fetch failed: {}", e);
    })?;

    let config = state.config.clone();
    let secret = request.secret().to_string();
    let record: ExtractedRecord = tokio::task::spawn_blocking(move || {
        process_document_with(&config, &data, Some(&secret)).map(|result| result.record)
    })
    .await
    .map_err(|e| {
        error!("Extraction task failed: {}", e);
        ApiError::Internal("extraction task failed".to_string())
    })??;

    info!(
        "Extracted {}/{} fields for {} document",
        record.filled_count(),
        record.field_count(),
        request.document_type
    );

    Ok(Json(json!({"status": "success", "data": record})))
}

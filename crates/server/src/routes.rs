// ABOUTME: Request handlers for the health probe and the text extraction endpoint.
// ABOUTME: Extraction validates the JSON body, then runs the pipeline on the blocking pool.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use ofd_extract::{ExtractRequest, ExtractionResult};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// `POST /extract-text`
///
/// Accepts `{"html": "..."}` regardless of the declared content type.
pub async fn extract_text(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let body = body?;
    let request = ExtractRequest::from_json_bytes(&body)?;
    let input_len = request.html.len();

    let extractor = state.extractor.clone();
    let result = tokio::task::spawn_blocking(move || extractor.extract_request(&request)).await?;

    info!(
        input_len,
        output_len = result.length(),
        links = result.links().len(),
        "extracted receipt text"
    );
    Ok(Json(result))
}

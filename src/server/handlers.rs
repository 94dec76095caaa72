//! Request handlers.

use super::AppState;
use super::error::ApiError;
use crate::domain::ClassifyResult;
use crate::processors::ImageFormatHint;
use axum::Json;
use axum::extract::{Multipart, Query, State};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// Query string of `GET /recognize`.
#[derive(Debug, Deserialize)]
pub struct RecognizeQuery {
    /// URL of the image to fetch.
    pub img: Option<String>,
}

/// `POST /recognize`: classifies the multipart field `image`.
pub async fn recognize_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResult>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            ApiError::BadRequest(format!("failed to read field '{IMAGE_FIELD}': {e}"))
        })?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload
        .ok_or_else(|| ApiError::BadRequest(format!("missing form field '{IMAGE_FIELD}'")))?;
    let format = ImageFormatHint::from_name(&filename);
    info!(filename, size = bytes.len(), %format, "recognize upload");

    let result = classify(&state, bytes, format, filename).await?;
    Ok(Json(result))
}

/// `GET /recognize?img=<url>`: fetches and classifies a remote image.
pub async fn recognize_url(
    State(state): State<AppState>,
    Query(query): Query<RecognizeQuery>,
) -> Result<Json<ClassifyResult>, ApiError> {
    let raw = query
        .img
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing query parameter 'img'".to_string()))?;
    let url = Url::parse(&raw)
        .map_err(|e| ApiError::BadRequest(format!("invalid image URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::BadRequest(format!(
            "unsupported URL scheme '{}'",
            url.scheme()
        )));
    }

    let format = ImageFormatHint::from_name(url.path());
    info!(url = %url, %format, "recognize url");

    let bytes = fetch_image(&state, url).await?;
    let result = classify(&state, bytes, format, raw).await?;
    Ok(Json(result))
}

/// `GET /health`: liveness plus a summary of the loaded model.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "engine": state.classifier.engine_info(),
        "labels": state.classifier.labels().len(),
        "top_n": state.classifier.top_n(),
    }))
}

async fn fetch_image(state: &AppState, url: Url) -> Result<Vec<u8>, ApiError> {
    let max = state.config.max_fetch_bytes;
    let mut response = state
        .http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ApiError::Fetch(e.to_string()))?;

    if let Some(len) = response.content_length() {
        if len > max as u64 {
            return Err(ApiError::Fetch(format!(
                "remote image is {len} bytes, limit is {max}"
            )));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ApiError::Fetch(e.to_string()))?
    {
        if body.len() + chunk.len() > max {
            return Err(ApiError::Fetch(format!(
                "remote image exceeds limit of {max} bytes"
            )));
        }
        body.extend_from_slice(&chunk);
    }
    debug!(size = body.len(), "fetched remote image");
    Ok(body)
}

/// Runs the classifier on the blocking pool, bounded by the request deadline.
async fn classify<B>(
    state: &AppState,
    bytes: B,
    format: ImageFormatHint,
    source: String,
) -> Result<ClassifyResult, ApiError>
where
    B: AsRef<[u8]> + Send + 'static,
{
    let classifier = Arc::clone(&state.classifier);
    let task =
        tokio::task::spawn_blocking(move || classifier.classify(bytes.as_ref(), format, &source));

    let joined = match state.config.request_deadline() {
        Some(deadline) => tokio::time::timeout(deadline, task)
            .await
            .map_err(|_| ApiError::DeadlineExceeded(deadline))?,
        None => task.await,
    };
    let result = joined.map_err(|e| ApiError::Internal(format!("classification task: {e}")))??;
    Ok(result)
}

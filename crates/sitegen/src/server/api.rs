use super::AppState;
use crate::prelude::Error;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sitegen_core::archive::pack;
use sitegen_core::bundle::split_all;
use sitegen_core::prompt::{GenerationRequest, DEFAULT_PREVIEW_PATH};
use sitegen_core::session::preview;
use std::sync::Arc;

/// Success body of `/api/generate`. The field keeps its historical name even
/// though the payload is a multi-file blob.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub html: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub text: String,
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub path: String,
    pub found: bool,
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub text: String,
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Service(_) => StatusCode::BAD_GATEWAY,
            Error::EmptyBundle | Error::NotGenerated | Error::UnsafePath(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        log::warn!("Request failed with {status}: {self}");

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Error::InvalidInput(rejection.body_text()))
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, Error> {
    let request = json_body(payload)?;
    let html = state.relay.generate(&request.prompt).await?;

    Ok(Json(GenerateResponse { html }))
}

pub async fn preview_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, Error> {
    let request = json_body(payload)?;
    let path = request.path.as_deref().unwrap_or(DEFAULT_PREVIEW_PATH);
    let preview = preview(&request.text, path, state.mode);

    if !preview.is_found() {
        log::debug!("Preview of {} not found in response", preview.path());
    }

    Ok(Json(PreviewResponse {
        path: preview.path().to_string(),
        found: preview.is_found(),
        html: preview.html(),
    }))
}

pub async fn archive_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ArchiveRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let request = json_body(payload)?;
    if request.text.trim().is_empty() {
        return Err(Error::NotGenerated);
    }

    let bundle = split_all(&request.text, state.mode);
    let bytes = pack(&bundle)?;

    log::info!(
        "Packaged {} files into {} bytes",
        bundle.len(),
        bytes.len()
    );

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.archive_name),
        ),
    ];

    Ok((headers, bytes).into_response())
}

use crate::api::middleware::RequestOwner;
use crate::api::state::AppState;
use crate::error::AppError;
use crate::export::{ExportFile, ExportFormat};
use crate::models::Report;
use crate::services::ExportRequest;
use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

pub async fn get_current(
    State(state): State<AppState>,
    Extension(owner): Extension<RequestOwner>,
) -> Result<Json<Report>, AppError> {
    let report = state
        .reports
        .build(&state.now(), owner.as_deref(), None)
        .await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub filename: Option<String>,
}

pub async fn export_get(
    State(state): State<AppState>,
    Extension(owner): Extension<RequestOwner>,
    Path(format): Path<String>,
    Query(params): Query<ExportParams>,
) -> Response {
    let request = ExportRequest {
        filename: params.filename,
        activities: None,
    };
    run_export(&state, &format, request, &owner).await
}

/// Same as the GET variant, with an optional JSON body carrying the filename
/// and an activity list to export instead of the fetched one.
pub async fn export_post(
    State(state): State<AppState>,
    Extension(owner): Extension<RequestOwner>,
    Path(format): Path<String>,
    body: Bytes,
) -> Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ExportRequest::default()
    } else {
        match serde_json::from_slice::<ExportRequest>(&body) {
            Ok(request) => request,
            Err(e) => return AppError::InvalidInput(format!("Invalid export body: {}", e)).into_response(),
        }
    };
    run_export(&state, &format, request, &owner).await
}

async fn run_export(
    state: &AppState,
    format: &str,
    request: ExportRequest,
    owner: &RequestOwner,
) -> Response {
    let format = match format.parse::<ExportFormat>() {
        Ok(format) => format,
        Err(e) => return AppError::InvalidInput(e.to_string()).into_response(),
    };

    match state
        .exports
        .export(format, request, owner.as_deref(), &state.now())
        .await
    {
        Ok(file) => attachment(file),
        Err(failure) => failure.into_response(),
    }
}

fn attachment(file: ExportFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    let disposition = match HeaderValue::from_str(&disposition) {
        Ok(value) => value,
        Err(e) => return AppError::Internal(e.to_string()).into_response(),
    };

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

use crate::export::{sanitize_filename, ExportFile, ExportFormat, ExportNotification, Exporters};
use crate::models::Activity;
use crate::services::report::ReportBuilder;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use thiserror::Error;

/// Optional inputs of an export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub filename: Option<String>,
    /// Replaces the fetched activity log when non-empty.
    #[serde(default)]
    pub activities: Option<Vec<Activity>>,
}

#[derive(Debug, Error)]
#[error("{} export failed: {}", .notification.format, .notification.description)]
pub struct ExportFailure {
    pub notification: ExportNotification,
}

impl IntoResponse for ExportFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.notification)).into_response()
    }
}

#[derive(Clone)]
pub struct ExportService {
    builder: ReportBuilder,
    exporters: Exporters,
}

impl ExportService {
    pub fn new(builder: ReportBuilder, exporters: Exporters) -> Self {
        Self { builder, exporters }
    }

    /// Build a fresh report and render it. Every call is independent of any other.
    pub async fn export(
        &self,
        format: ExportFormat,
        request: ExportRequest,
        owner: Option<&str>,
        now: &DateTime<FixedOffset>,
    ) -> Result<ExportFile, ExportFailure> {
        let fail = |description: String| {
            tracing::error!("{} export failed: {}", format.label(), description);
            ExportFailure {
                notification: format.failure_notice(description),
            }
        };

        let report = self
            .builder
            .build(now, owner, request.activities)
            .await
            .map_err(|e| fail(e.to_string()))?;

        let bytes = self
            .exporters
            .get(format)
            .and_then(|exporter| exporter.render(&report))
            .map_err(|e| fail(e.to_string()))?;

        let notice = format.success_notice();
        tracing::info!(
            "{}: {} ({} bytes)",
            notice.title,
            notice.description,
            bytes.len()
        );

        Ok(ExportFile {
            filename: format!(
                "{}.{}",
                sanitize_filename(request.filename.as_deref()),
                format.extension()
            ),
            content_type: format.content_type(),
            bytes,
        })
    }
}

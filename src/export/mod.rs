//! Report serializers.
//!
//! Every exporter turns the same [`Report`] into the bytes of one file
//! format. Exporters are stateless; a failure in one never affects another.

pub mod csv;
pub mod pdf;
pub mod xlsx;

use crate::models::Report;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_FILENAME: &str = "biodigester-report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Name shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }

    pub fn success_notice(&self) -> ExportNotification {
        let description = match self {
            ExportFormat::Pdf => "Relatório gerado com sucesso.",
            ExportFormat::Csv => "Dados exportados com sucesso.",
            ExportFormat::Xlsx => "Arquivo .xlsx gerado com sucesso.",
        };
        ExportNotification {
            title: format!("{} exportado", self.label()),
            description: description.to_string(),
            format: *self,
        }
    }

    pub fn failure_notice(&self, description: impl Into<String>) -> ExportNotification {
        let mut description = description.into();
        if description.trim().is_empty() {
            description = format!("Não foi possível exportar o {}.", self.label());
        }
        ExportNotification {
            title: "Erro na exportação".to_string(),
            description,
            format: *self,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(ExportError::Unsupported(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported export format: {0}")]
    Unsupported(String),
}

/// User-facing outcome of an export, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportNotification {
    pub title: String,
    pub description: String,
    pub format: ExportFormat,
}

/// A rendered file ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait ReportExporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError>;
}

/// One exporter per format.
#[derive(Clone)]
pub struct Exporters {
    by_format: HashMap<ExportFormat, Arc<dyn ReportExporter>>,
}

impl Exporters {
    pub fn standard() -> Self {
        Self {
            by_format: HashMap::new(),
        }
        .with(Arc::new(pdf::PdfExporter))
        .with(Arc::new(csv::CsvExporter))
        .with(Arc::new(xlsx::XlsxExporter))
    }

    /// Register `exporter`, replacing whatever handled its format before.
    pub fn with(mut self, exporter: Arc<dyn ReportExporter>) -> Self {
        self.by_format.insert(exporter.format(), exporter);
        self
    }

    pub fn get(&self, format: ExportFormat) -> Result<&dyn ReportExporter, ExportError> {
        self.by_format
            .get(&format)
            .map(|e| e.as_ref())
            .ok_or_else(|| ExportError::Unsupported(format.to_string()))
    }
}

impl Default for Exporters {
    fn default() -> Self {
        Self::standard()
    }
}

/// Keep `[A-Za-z0-9._-]`, replace anything else with `-`.
pub fn sanitize_filename(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

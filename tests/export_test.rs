// Export service: one format failing must leave the others usable.


use biodash_api::export::{ExportError, ExportFormat, Exporters, ReportExporter};
use biodash_api::models::{Activity, Report};
use biodash_api::repositories::{IndicatorFetcher, TimeColumn};
use biodash_api::services::{ExportRequest, ExportService, ReportBuilder};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use test_helpers::*;

/// Spreadsheet serializer that always fails, like a broken formatting library.
struct BrokenSpreadsheet;

impl ReportExporter for BrokenSpreadsheet {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, _report: &Report) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Unsupported("spreadsheet writer unavailable".into()))
    }
}

fn service(store: Arc<MemoryStore>, exporters: Exporters) -> ExportService {
    let builder = ReportBuilder::new(IndicatorFetcher::new(store), "Relatório do Biodigestor", 10);
    ExportService::new(builder, exporters)
}

#[tokio::test]
async fn test_failing_spreadsheet_does_not_block_csv() {
    let store = MemoryStore::new(october_fixture("ana"));
    let svc = service(store, Exporters::standard().with(Arc::new(BrokenSpreadsheet)));
    let now = reference_now();

    let failure = svc
        .export(ExportFormat::Xlsx, ExportRequest::default(), Some("ana"), &now)
        .await
        .unwrap_err();
    assert_eq!(failure.notification.title, "Erro na exportação");
    assert_eq!(failure.notification.format, ExportFormat::Xlsx);
    assert!(failure
        .notification
        .description
        .contains("spreadsheet writer unavailable"));

    let file = svc
        .export(ExportFormat::Csv, ExportRequest::default(), Some("ana"), &now)
        .await
        .unwrap();
    assert_eq!(file.filename, "biodigester-report.csv");
    assert_eq!(file.content_type, "text/csv; charset=utf-8");

    let text = String::from_utf8(file.bytes).unwrap();
    assert!(text.starts_with("\"Relatório do Biodigestor\"\n"));
    assert!(text.contains("\"Energia Gerada\",\"65 kWh\""));
    assert!(text.contains("\"Eficiência Média\",\"80%\""));
    assert!(text.contains("\"18/10/2026\",\"Energia: 5 kWh • Resíduos: 5 kg\",\"Registrado\",\"R$ 1,00\""));
}

#[tokio::test]
async fn test_every_standard_format_renders() {
    let store = MemoryStore::new(october_fixture("ana"));
    let svc = service(store, Exporters::standard());
    let now = reference_now();

    let pdf = svc
        .export(ExportFormat::Pdf, ExportRequest::default(), Some("ana"), &now)
        .await
        .unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert_eq!(pdf.content_type, "application/pdf");

    let xlsx = svc
        .export(ExportFormat::Xlsx, ExportRequest::default(), Some("ana"), &now)
        .await
        .unwrap();
    assert!(xlsx.bytes.starts_with(b"PK"));
    assert_eq!(xlsx.filename, "biodigester-report.xlsx");
}

#[tokio::test]
async fn test_report_failure_becomes_notification() {
    let store = MemoryStore::new(october_fixture("ana"));
    store.fail_on(TimeColumn::MeasuredAt);
    store.fail_on(TimeColumn::CreatedAt);
    let svc = service(store, Exporters::standard());

    let failure = svc
        .export(ExportFormat::Pdf, ExportRequest::default(), Some("ana"), &reference_now())
        .await
        .unwrap_err();

    assert_eq!(failure.notification.title, "Erro na exportação");
    assert_eq!(failure.notification.format, ExportFormat::Pdf);
    assert!(failure.notification.description.contains("does not exist"));
}

#[tokio::test]
async fn test_request_filename_and_activities() {
    let store = MemoryStore::new(october_fixture("ana"));
    let svc = service(store, Exporters::standard());
    let request = ExportRequest {
        filename: Some("relatório outubro".into()),
        activities: Some(vec![Activity {
            date: "05/10/2026".into(),
            activity: "Troca do filtro \"H2S\"".into(),
            status: "Concluído".into(),
            value: Some("R$ 120,00".into()),
        }]),
    };

    let file = svc
        .export(ExportFormat::Csv, request, Some("ana"), &reference_now())
        .await
        .unwrap();

    assert_eq!(file.filename, "relat-rio-outubro.csv");
    let text = String::from_utf8(file.bytes).unwrap();
    let last = text.lines().last().unwrap();
    assert_eq!(
        last,
        "\"05/10/2026\",\"Troca do filtro \"\"H2S\"\"\",\"Concluído\",\"R$ 120,00\""
    );
}

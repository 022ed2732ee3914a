use super::{ExportError, ExportFormat, ReportExporter};
use crate::models::Report;
use ::csv::{QuoteStyle, Terminator, WriterBuilder};

/// Quoted, comma separated table of the report.
pub struct CsvExporter;

impl ReportExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        let mut wtr = WriterBuilder::new()
            .flexible(true)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in rows(report) {
            wtr.write_record(&row)?;
        }

        let mut bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        // lines are joined, not terminated
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        Ok(bytes)
    }
}

fn rows(report: &Report) -> Vec<Vec<&str>> {
    let stats = &report.stats;
    let mut rows = vec![
        vec![report.title.as_str()],
        vec!["Data do Relatório", report.generated_at.as_str()],
        vec!["Período (mês)", report.period_label.as_str()],
        vec![""],
        vec!["ESTATÍSTICAS"],
        vec!["Métrica", "Valor"],
        vec!["Resíduos Processados", stats.waste.as_str()],
        vec!["Energia Gerada", stats.energy.as_str()],
        vec!["Eficiência Média", stats.efficiency.as_str()],
        vec!["Economia Fiscal", stats.tax.as_str()],
        vec![""],
        vec!["ATIVIDADES RECENTES"],
        vec!["Data", "Atividade", "Status", "Valor"],
    ];

    rows.extend(report.activities.iter().map(|a| {
        vec![
            a.date.as_str(),
            a.activity.as_str(),
            a.status.as_str(),
            a.value.as_deref().unwrap_or(""),
        ]
    }));
    rows
}

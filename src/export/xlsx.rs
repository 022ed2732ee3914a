use super::{ExportError, ExportFormat, ReportExporter};
use crate::format;
use crate::models::Report;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const SUMMARY_WIDTHS: [f64; 4] = [28.0, 18.0, 10.0, 30.0];
const ACTIVITY_MIN_WIDTHS: [usize; 4] = [10, 30, 14, 12];
const ACTIVITY_MAX_WIDTH: usize = 60;

const CURRENCY: &str = "R$ #,##0.00";

/// Two-sheet workbook: "Resumo" with typed statistics and "Atividades".
pub struct XlsxExporter;

impl ReportExporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(summary_sheet(report)?);
        workbook.push_worksheet(activity_sheet(report)?);
        Ok(workbook.save_to_buffer()?)
    }
}

fn summary_sheet(report: &Report) -> Result<Worksheet, ExportError> {
    let mut sheet = Worksheet::new();
    sheet.set_name("Resumo")?;

    sheet.merge_range(0, 0, 0, 3, &report.title, &Format::new())?;
    sheet.write_string(1, 0, "Data do Relatório")?;
    sheet.write_string(1, 1, &report.generated_at)?;
    sheet.write_string(2, 0, "Período (mês)")?;
    sheet.write_string(2, 1, &report.period_label)?;
    sheet.write_string(4, 0, "ESTATÍSTICAS")?;

    for (col, header) in ["Métrica", "Valor", "Unidade", "Observações"].iter().enumerate() {
        sheet.write_string(5, col as u16, *header)?;
    }

    let integer = Format::new().set_num_format("0");
    let totals = &report.totals;

    sheet.write_string(6, 0, "Resíduos Processados")?;
    sheet.write_number_with_format(6, 1, totals.waste.round(), &integer)?;
    sheet.write_string(6, 2, "kg")?;

    sheet.write_string(7, 0, "Energia Gerada")?;
    sheet.write_number_with_format(7, 1, totals.energy.round(), &integer)?;
    sheet.write_string(7, 2, "kWh")?;

    sheet.write_string(8, 0, "Eficiência Média")?;
    match totals.avg_efficiency {
        Some(eff) => {
            let percent = Format::new().set_num_format("0.00%");
            sheet.write_number_with_format(8, 1, eff / 100.0, &percent)?;
        }
        None => {
            sheet.write_string(8, 1, format::EMPTY)?;
        }
    }
    sheet.write_string(8, 2, "%")?;

    sheet.write_string(9, 0, "Economia Fiscal")?;
    sheet.write_number_with_format(9, 1, totals.tax, &Format::new().set_num_format(CURRENCY))?;
    sheet.write_string(9, 2, "BRL")?;

    for (col, width) in SUMMARY_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    sheet.autofilter(5, 0, 9, 3)?;

    Ok(sheet)
}

fn activity_sheet(report: &Report) -> Result<Worksheet, ExportError> {
    let mut sheet = Worksheet::new();
    sheet.set_name("Atividades")?;

    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let currency = Format::new().set_num_format(CURRENCY);

    let headers = ["Data", "Atividade", "Status", "Valor"];
    let mut widths: [usize; 4] = [0; 4];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
        widths[col] = header.chars().count();
    }

    for (i, activity) in report.activities.iter().enumerate() {
        let row = i as u32 + 1;

        match format::parse_date(&activity.date) {
            Some(day) => {
                sheet.write_number_with_format(row, 0, format::excel_serial(day), &date_format)?;
            }
            None => {
                sheet.write_string(row, 0, &activity.date)?;
            }
        }
        sheet.write_string(row, 1, &activity.activity)?;
        sheet.write_string(row, 2, &activity.status)?;

        let amount = activity.value.as_deref().unwrap_or("");
        match format::parse_currency(amount) {
            Some(value) => {
                sheet.write_number_with_format(row, 3, value, &currency)?;
            }
            None if !amount.trim().is_empty() => {
                sheet.write_string(row, 3, amount)?;
            }
            None => {}
        }

        let cells = [
            activity.date.as_str(),
            activity.activity.as_str(),
            activity.status.as_str(),
            amount,
        ];
        for (col, cell) in cells.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, column_width(*width, col) as f64)?;
    }
    sheet.autofilter(0, 0, report.activities.len() as u32, 3)?;

    Ok(sheet)
}

fn column_width(longest: usize, col: usize) -> usize {
    (longest + 2).max(ACTIVITY_MIN_WIDTHS[col]).min(ACTIVITY_MAX_WIDTH)
}

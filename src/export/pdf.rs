use super::{ExportError, ExportFormat, ReportExporter};
use crate::models::Report;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const LAYER: &str = "Layer 1";

const ACTIVITY_COLUMNS: [f32; 4] = [MARGIN, 40.0, 146.0, 172.0];
const ACTIVITY_WRAP: usize = 52;

/// A4 document with a statistics table and the activity log.
pub struct PdfExporter;

impl ReportExporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        let mut page = PageCursor::new(&report.title)?;

        page.text(&report.title, 18.0, MARGIN, true);
        page.advance(8.0);
        page.text(&format!("Data do Relatório: {}", report.generated_at), 11.0, MARGIN, false);
        page.advance(5.5);
        page.text(&format!("Período (mês): {}", report.period_label), 11.0, MARGIN, false);
        page.advance(12.0);

        page.text("Estatísticas (Mês Corrente)", 13.0, MARGIN, true);
        page.advance(7.0);
        let stats = &report.stats;
        let stat_rows = [
            ("Métrica", "Valor"),
            ("Resíduos Processados", stats.waste.as_str()),
            ("Energia Gerada", stats.energy.as_str()),
            ("Eficiência Média", stats.efficiency.as_str()),
            ("Economia Fiscal", stats.tax.as_str()),
        ];
        for (i, (label, value)) in stat_rows.iter().enumerate() {
            let header = i == 0;
            page.text(label, 11.0, MARGIN, header);
            page.text(value, 11.0, 80.0, header);
            page.advance(6.5);
        }
        page.advance(7.0);

        page.text("Atividades Recentes", 13.0, MARGIN, true);
        page.advance(7.0);
        page.activity_header();

        for activity in &report.activities {
            let lines = wrap(&activity.activity, ACTIVITY_WRAP);
            page.ensure_room(lines.len() as f32 * 5.0);

            page.text(&activity.date, 10.0, ACTIVITY_COLUMNS[0], false);
            page.text(&activity.status, 10.0, ACTIVITY_COLUMNS[2], false);
            page.text(activity.value.as_deref().unwrap_or(""), 10.0, ACTIVITY_COLUMNS[3], false);
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    page.advance(5.0);
                }
                page.text(line, 10.0, ACTIVITY_COLUMNS[1], false);
            }
            page.advance(6.0);
        }

        page.finish()
    }
}

struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    in_activity_table: bool,
}

impl PageCursor {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("{:?}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("{:?}", e)))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            in_activity_table: false,
        })
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
        if self.y < MARGIN {
            self.new_page();
        }
    }

    /// Break the page early so a multi-line row is not split.
    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        if self.in_activity_table {
            self.write_activity_header();
        }
    }

    fn activity_header(&mut self) {
        self.in_activity_table = true;
        self.write_activity_header();
    }

    fn write_activity_header(&mut self) {
        for (label, x) in ["Data", "Atividade", "Status", "Valor"]
            .iter()
            .zip(ACTIVITY_COLUMNS)
        {
            self.text(label, 10.0, x, true);
        }
        self.y -= 6.5;
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(format!("{:?}", e)))
    }
}

/// Greedy word wrap on character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

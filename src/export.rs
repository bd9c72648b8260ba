//! Export service: turns the current appointment into downloadable artifacts.
//!
//! Two artifacts:
//! 1. CSV: two-column `Champ,Valeur` table, ten fixed rows
//! 2. PDF: printable appointment sheet with an auto-paginated info table,
//!    a notes section placed after the table's real end, and a signature footer
//!
//! PDF generation via `printpdf`. Both paths return `Result` so the shell can
//! surface failures instead of faulting.

use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use printpdf::*;
use regex::Regex;

use crate::appointment::Appointment;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

// ─── Errors & formats ─────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
    #[error("Cannot write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }
}

/// `RDV_<company>_<date>.<ext>`. Only whitespace runs in the company are
/// replaced (by a single underscore); everything else passes through as-is.
pub fn export_filename(appointment: &Appointment, format: ExportFormat) -> String {
    let company = WHITESPACE_RUN.replace_all(&appointment.company, "_");
    format!("RDV_{}_{}.{}", company, appointment.date, format.extension())
}

// ─── CSV ──────────────────────────────────────────────────────────────────────

fn csv_rows(appointment: &Appointment) -> [(&'static str, &str); 10] {
    [
        ("Client", &appointment.client_name),
        ("Entreprise", &appointment.company),
        ("Adresse", &appointment.address),
        ("Téléphone", &appointment.phone),
        ("Email", &appointment.email),
        ("Commercial", &appointment.sales_rep),
        ("Date", &appointment.date),
        ("Heure", &appointment.time),
        ("Motif", &appointment.purpose),
        ("Notes", &appointment.notes),
    ]
}

fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Header `Champ,Valeur` followed by ten quoted rows, newline-joined.
pub fn to_csv(appointment: &Appointment) -> String {
    let mut lines = Vec::with_capacity(11);
    lines.push("Champ,Valeur".to_string());
    for (label, value) in csv_rows(appointment) {
        lines.push(format!("{},{}", quote_cell(label), quote_cell(value)));
    }
    lines.join("\n")
}

// ─── PDF layout constants (mm, measured from the top of the page) ─────────────

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 20.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
const TOP_MARGIN: f32 = 20.0;
const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - 20.0;

const TITLE: &str = "FICHE DE RENDEZ-VOUS COMMERCIAL";
const TABLE_START_Y: f32 = 45.0;
const LABEL_COL_WIDTH: f32 = 50.0;
const CELL_PADDING: f32 = 2.0;
const TABLE_FONT_SIZE: f32 = 10.0;

const NOTES_HEADING: &str = "Notes Complémentaires";
const NOTES_FALLBACK: &str = "Aucune note supplémentaire.";
const NOTES_FONT_SIZE: f32 = 11.0;

const FOOTER_LINE_Y: f32 = PAGE_HEIGHT - 40.0;
const FOOTER_LABEL_Y: f32 = PAGE_HEIGHT - 35.0;

const PT_TO_MM: f32 = 0.3528;
const LINE_SPACING: f32 = 1.15;

fn line_height(font_size: f32) -> f32 {
    font_size * LINE_SPACING * PT_TO_MM
}

/// Approximate Helvetica advance width in mm.
fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let em = if bold { 0.56 } else { 0.5 };
    text.chars().count() as f32 * font_size * PT_TO_MM * em
}

fn chars_for_width(width: f32, font_size: f32, bold: bool) -> usize {
    let em = if bold { 0.56 } else { 0.5 };
    ((width / (font_size * PT_TO_MM * em)).floor() as usize).max(1)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn brand_blue() -> Color {
    rgb(30, 64, 175)
}

// ─── PDF output types ─────────────────────────────────────────────────────────

/// A vertical position in the document: page (1-based) and mm from the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfPosition {
    pub page: usize,
    pub y: f32,
}

impl PdfPosition {
    /// True when `self` comes strictly after `other` in reading order.
    pub fn is_below(&self, other: &PdfPosition) -> bool {
        self.page > other.page || (self.page == other.page && self.y > other.y)
    }
}

/// Where the main blocks ended up after pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page_count: usize,
    pub table_end: PdfPosition,
    pub notes_heading: PdfPosition,
    pub notes_end: PdfPosition,
    pub footer_page: usize,
}

pub struct PdfExport {
    pub bytes: Vec<u8>,
    pub layout: PdfLayout,
}

// ─── PDF writer ───────────────────────────────────────────────────────────────

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Thin cursor over a `printpdf` document, working in top-down mm.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    page: usize,
    fonts: Fonts,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Font(e.to_string()))?;
        Ok(Self {
            doc,
            layer,
            page: 1,
            fonts: Fonts { regular, bold },
        })
    }

    fn new_page(&mut self) {
        self.page += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.page),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn position(&self, y: f32) -> PdfPosition {
        PdfPosition { page: self.page, y }
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool, color: Color) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.set_fill_color(color);
        self.layer.use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - y), font);
    }

    fn centered_text(&self, text: &str, size: f32, y: f32, bold: bool, color: Color) {
        let x = (PAGE_WIDTH - text_width(text, size, bold)) / 2.0;
        self.text(text, size, x.max(0.0), y, bold, color);
    }

    fn hline(&self, x1: f32, x2: f32, y: f32, color: Color) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(PAGE_HEIGHT - y)), false),
                (Point::new(Mm(x2), Mm(PAGE_HEIGHT - y)), false),
            ],
            is_closed: false,
        });
    }

    fn fill_rect(&self, x: f32, y_top: f32, width: f32, height: f32, color: Color) {
        self.layer.set_fill_color(color);
        self.layer.add_rect(Rect::new(
            Mm(x),
            Mm(PAGE_HEIGHT - (y_top + height)),
            Mm(x + width),
            Mm(PAGE_HEIGHT - y_top),
        ));
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ExportError::Save(e.to_string()))?;
        buf.into_inner()
            .map_err(|e| ExportError::Save(format!("PDF buffer error: {e}")))
    }
}

// ─── PDF sections ─────────────────────────────────────────────────────────────

fn table_rows(appointment: &Appointment) -> [(&'static str, &str); 9] {
    [
        ("Client", &appointment.client_name),
        ("Entreprise", &appointment.company),
        ("Commercial en charge", &appointment.sales_rep),
        ("Date du rendez-vous", &appointment.date),
        ("Heure", &appointment.time),
        ("Adresse", &appointment.address),
        ("Téléphone", &appointment.phone),
        ("Email", &appointment.email),
        ("Motif de la visite", &appointment.purpose),
    ]
}

struct TableRow {
    label: Vec<String>,
    value: Vec<String>,
}

impl TableRow {
    fn new(label: &str, value: &str) -> Self {
        let label_chars =
            chars_for_width(LABEL_COL_WIDTH - 2.0 * CELL_PADDING, TABLE_FONT_SIZE, true);
        let value_chars = chars_for_width(
            CONTENT_WIDTH - LABEL_COL_WIDTH - 2.0 * CELL_PADDING,
            TABLE_FONT_SIZE,
            false,
        );
        Self {
            label: wrap_text(label, label_chars),
            value: wrap_multiline(value, value_chars),
        }
    }

    fn line_count(&self) -> usize {
        self.label.len().max(self.value.len())
    }
}

fn slice_height(lines: usize) -> f32 {
    lines as f32 * line_height(TABLE_FONT_SIZE) + 2.0 * CELL_PADDING
}

/// Lines of a row that still fit above the bottom limit when starting at `y`.
fn line_capacity(y: f32) -> usize {
    let room = BOTTOM_LIMIT - y - 2.0 * CELL_PADDING;
    if room <= 0.0 {
        0
    } else {
        (room / line_height(TABLE_FONT_SIZE)).floor() as usize
    }
}

/// Draw the given `lines` of a row with the slice top edge at `y`.
/// Returns the slice's bottom edge.
fn draw_row_slice(
    w: &PageWriter,
    row: &TableRow,
    lines: std::ops::Range<usize>,
    y: f32,
    fill: Option<Color>,
    header: bool,
) -> f32 {
    let height = slice_height(lines.len());
    if let Some(color) = fill {
        w.fill_rect(MARGIN_X, y, CONTENT_WIDTH, height, color);
    }
    let text_color = if header { rgb(255, 255, 255) } else { rgb(50, 50, 50) };
    let lh = line_height(TABLE_FONT_SIZE);
    let first_baseline = y + CELL_PADDING + TABLE_FONT_SIZE * PT_TO_MM;

    for (offset, i) in lines.enumerate() {
        let baseline = first_baseline + offset as f32 * lh;
        if let Some(line) = row.label.get(i) {
            w.text(line, TABLE_FONT_SIZE, MARGIN_X + CELL_PADDING, baseline, true, text_color.clone());
        }
        if let Some(line) = row.value.get(i) {
            w.text(
                line,
                TABLE_FONT_SIZE,
                MARGIN_X + LABEL_COL_WIDTH + CELL_PADDING,
                baseline,
                header,
                text_color.clone(),
            );
        }
    }
    y + height
}

fn draw_header(w: &PageWriter, header: &TableRow, y: f32) -> f32 {
    draw_row_slice(w, header, 0..header.line_count(), y, Some(brand_blue()), true)
}

/// Striped two-column table. Rows move to a new page when they fit there
/// whole, and are split across pages otherwise; the header repeats.
fn draw_table(w: &mut PageWriter, appointment: &Appointment) -> PdfPosition {
    let header = TableRow::new("Information", "Détails");
    let fresh_page_y = TOP_MARGIN + slice_height(header.line_count());
    let fresh_capacity = line_capacity(fresh_page_y).max(1);

    let mut y = draw_header(w, &header, TABLE_START_Y);
    for (i, (label, value)) in table_rows(appointment).iter().enumerate() {
        let row = TableRow::new(label, value);
        let stripe = (i % 2 == 1).then(|| rgb(245, 245, 245));
        let total = row.line_count();

        if total > line_capacity(y) && total <= fresh_capacity {
            w.new_page();
            y = draw_header(w, &header, TOP_MARGIN);
        }

        let mut start = 0;
        while start < total {
            let capacity = line_capacity(y);
            if capacity == 0 {
                w.new_page();
                y = draw_header(w, &header, TOP_MARGIN);
                continue;
            }
            let end = (start + capacity).min(total);
            y = draw_row_slice(w, &row, start..end, y, stripe.clone(), false);
            start = end;
        }
    }
    w.position(y)
}

/// Heading at table end + 15 mm, body from table end + 25 mm.
fn draw_notes(w: &mut PageWriter, table_end: PdfPosition, notes: &str) -> (PdfPosition, PdfPosition) {
    let mut heading_y = table_end.y + 15.0;
    if heading_y > BOTTOM_LIMIT {
        w.new_page();
        heading_y = TOP_MARGIN;
    }
    w.text(NOTES_HEADING, 14.0, MARGIN_X, heading_y, false, brand_blue());
    let heading = w.position(heading_y);

    let body = if notes.is_empty() { NOTES_FALLBACK } else { notes };
    let lh = line_height(NOTES_FONT_SIZE);
    let mut y = heading_y + 10.0;
    for line in wrap_multiline(body, chars_for_width(CONTENT_WIDTH, NOTES_FONT_SIZE, false)) {
        if y > BOTTOM_LIMIT {
            w.new_page();
            y = TOP_MARGIN;
        }
        w.text(&line, NOTES_FONT_SIZE, MARGIN_X, y, false, rgb(50, 50, 50));
        y += lh;
    }
    (heading, w.position(y - lh))
}

fn draw_signatures(w: &mut PageWriter, notes_end: PdfPosition) -> usize {
    if notes_end.page == w.page && notes_end.y > FOOTER_LINE_Y - 8.0 {
        w.new_page();
    }
    let grey = rgb(200, 200, 200);
    w.hline(20.0, 80.0, FOOTER_LINE_Y, grey.clone());
    w.hline(130.0, 190.0, FOOTER_LINE_Y, grey);
    w.text("Signature Client", 9.0, 20.0, FOOTER_LABEL_Y, false, rgb(50, 50, 50));
    w.text("Signature Commercial", 9.0, 130.0, FOOTER_LABEL_Y, false, rgb(50, 50, 50));
    w.page
}

/// Builds the printable appointment sheet. `generated_at` is local wall-clock
/// time, printed in French day-first format.
pub fn to_pdf(appointment: &Appointment, generated_at: NaiveDateTime) -> Result<PdfExport, ExportError> {
    let mut w = PageWriter::new(TITLE)?;

    w.centered_text(TITLE, 22.0, 20.0, false, brand_blue());
    let stamp = format!("Généré le {}", generated_at.format("%d/%m/%Y %H:%M:%S"));
    w.centered_text(&stamp, 10.0, 28.0, false, rgb(100, 100, 100));
    w.hline(MARGIN_X, PAGE_WIDTH - MARGIN_X, 35.0, rgb(200, 200, 200));

    let table_end = draw_table(&mut w, appointment);
    let (notes_heading, notes_end) = draw_notes(&mut w, table_end, &appointment.notes);
    let footer_page = draw_signatures(&mut w, notes_end);

    let layout = PdfLayout {
        page_count: w.page,
        table_end,
        notes_heading,
        notes_end,
        footer_page,
    };
    tracing::debug!(pages = layout.page_count, "Appointment PDF laid out");

    Ok(PdfExport {
        bytes: w.finish()?,
        layout,
    })
}

// ─── Files ────────────────────────────────────────────────────────────────────

/// Writes an artifact into `exports_dir`, creating the directory if needed.
/// The file always lands directly in `exports_dir`, see `disk_filename`.
pub fn save_export(bytes: &[u8], filename: &str, exports_dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(exports_dir)?;
    let path = exports_dir.join(disk_filename(filename));
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), size = bytes.len(), "Export saved");
    Ok(path)
}

/// Filesystem form of a download filename: path separators and control
/// characters become `_`, so the name is a single path component.
pub fn disk_filename(filename: &str) -> String {
    let name: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    match name.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => name,
    }
}

// ─── Text wrapping ────────────────────────────────────────────────────────────

/// Word-wrap on whitespace; words longer than a line are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(max_chars) {
            let piece: String = chunk.iter().collect();
            if current_len + chunk.len() + 1 > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += chunk.len();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Like `wrap_text`, but explicit line breaks start a new line.
fn wrap_multiline(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = text
        .lines()
        .flat_map(|line| wrap_text(line, max_chars))
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::AppointmentField;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    fn sample() -> Appointment {
        let mut appt = Appointment::new_at(Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap());
        appt.set_field(AppointmentField::ClientName, "Mme. Jeanne Martin");
        appt.set_field(AppointmentField::Company, "Acme Corp");
        appt.set_field(AppointmentField::Address, "12 rue des Lilas, 59000 Lille");
        appt.set_field(AppointmentField::Phone, "06 12 34 56 78");
        appt.set_field(AppointmentField::Email, "contact@acme.fr");
        appt.set_field(AppointmentField::SalesRep, "Jean Dupont");
        appt.set_field(AppointmentField::Purpose, "Présentation gamme 2024");
        appt.set_field(AppointmentField::Notes, "Client intéressé par l'offre \"Premium\".");
        appt
    }

    /// Minimal RFC 4180 reader: quoted cells, doubled quotes, embedded newlines.
    fn parse_csv(input: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut record = Vec::new();
        let mut cell = String::new();
        let mut in_quotes = false;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                ('"', true) => in_quotes = false,
                ('"', false) => in_quotes = true,
                (',', false) => record.push(std::mem::take(&mut cell)),
                ('\n', false) => {
                    record.push(std::mem::take(&mut cell));
                    records.push(std::mem::take(&mut record));
                }
                (other, _) => cell.push(other),
            }
        }
        record.push(cell);
        records.push(record);
        records
    }

    #[test]
    fn filenames_replace_whitespace_only() {
        let mut appt = sample();
        appt.set_field(AppointmentField::Company, "Acme Corp");
        appt.set_field(AppointmentField::Date, "2024-06-01");
        assert_eq!(export_filename(&appt, ExportFormat::Csv), "RDV_Acme_Corp_2024-06-01.csv");
        assert_eq!(export_filename(&appt, ExportFormat::Pdf), "RDV_Acme_Corp_2024-06-01.pdf");

        appt.set_field(AppointmentField::Company, "A/B  \t Co:?");
        assert_eq!(export_filename(&appt, ExportFormat::Csv), "RDV_A/B_Co:?_2024-06-01.csv");
    }

    #[test]
    fn csv_has_header_and_ten_rows() {
        let csv = to_csv(&sample());
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Champ,Valeur");
        assert_eq!(lines[1], "\"Client\",\"Mme. Jeanne Martin\"");
        assert_eq!(lines[4], "\"Téléphone\",\"06 12 34 56 78\"");
        assert_eq!(lines[10], "\"Notes\",\"Client intéressé par l'offre \"\"Premium\"\".\"");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn csv_round_trips_quotes_and_newlines() {
        let mut appt = sample();
        appt.set_field(AppointmentField::Company, "\"Quoted\", Inc");
        appt.set_field(AppointmentField::Notes, "ligne 1\nligne \"2\"");

        let records = parse_csv(&to_csv(&appt));
        assert_eq!(records.len(), 11);
        assert_eq!(records[0], vec!["Champ", "Valeur"]);
        assert_eq!(records[2], vec!["Entreprise", "\"Quoted\", Inc"]);
        assert_eq!(records[10], vec!["Notes", "ligne 1\nligne \"2\""]);
        for record in &records {
            assert_eq!(record.len(), 2);
        }
    }

    #[test]
    fn csv_of_empty_record_keeps_all_rows() {
        let appt = Appointment::new_at(Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap());
        let records = parse_csv(&to_csv(&appt));
        assert_eq!(records.len(), 11);
        assert_eq!(records[1], vec!["Client", ""]);
        assert_eq!(records[8], vec!["Heure", "09:00"]);
    }

    #[test]
    fn pdf_generation_produces_document() {
        let export = to_pdf(&sample(), generated_at()).unwrap();
        assert!(!export.bytes.is_empty());
        assert_eq!(&export.bytes[0..4], b"%PDF");
        assert_eq!(export.layout.page_count, 1);
        assert_eq!(export.layout.footer_page, 1);
    }

    #[test]
    fn pdf_notes_follow_actual_table_end() {
        let export = to_pdf(&sample(), generated_at()).unwrap();
        let layout = &export.layout;
        assert_eq!(layout.table_end.page, 1);
        assert!(layout.table_end.y > TABLE_START_Y);
        assert!(layout.notes_heading.is_below(&layout.table_end));
        assert!((layout.notes_heading.y - (layout.table_end.y + 15.0)).abs() < 0.01);
    }

    #[test]
    fn pdf_for_empty_record_uses_fallback_layout() {
        let appt = Appointment::new_at(Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap());
        let export = to_pdf(&appt, generated_at()).unwrap();
        assert_eq!(&export.bytes[0..4], b"%PDF");
        assert!(export.layout.notes_heading.is_below(&export.layout.table_end));
        // Fallback text is a single line.
        let expected = export.layout.notes_heading.y + 10.0;
        assert!((export.layout.notes_end.y - expected).abs() < 0.01);
    }

    #[test]
    fn pdf_table_paginates_long_cells() {
        let mut appt = sample();
        appt.set_field(AppointmentField::Address, "Bâtiment B ".repeat(600));
        appt.set_field(AppointmentField::Purpose, "x".repeat(5000));

        let export = to_pdf(&appt, generated_at()).unwrap();
        let layout = &export.layout;
        assert!(layout.table_end.page > 1, "table should continue on a new page");
        assert!(layout.notes_heading.is_below(&layout.table_end));
        assert_eq!(layout.footer_page, layout.page_count);
    }

    #[test]
    fn pdf_long_notes_continue_on_new_pages() {
        let mut appt = sample();
        appt.set_field(AppointmentField::Notes, "Point à aborder.\n".repeat(120));

        let export = to_pdf(&appt, generated_at()).unwrap();
        let layout = &export.layout;
        assert!(layout.notes_end.page > layout.notes_heading.page);
        assert!(layout.notes_end.y <= BOTTOM_LIMIT);
        assert_eq!(layout.footer_page, layout.page_count);
    }

    #[test]
    fn position_ordering() {
        let a = PdfPosition { page: 1, y: 200.0 };
        let b = PdfPosition { page: 2, y: 30.0 };
        assert!(b.is_below(&a));
        assert!(!a.is_below(&b));
        assert!(!a.is_below(&a));
    }

    #[test]
    fn save_export_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let path = save_export(b"%PDF-1.4 test", "RDV_Acme_2024-06-01.pdf", &dir).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");
        assert!(path.starts_with(&dir));
    }

    #[test]
    fn save_export_keeps_slashed_company_in_exports_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let mut appt = sample();
        appt.company = "A/B Industries".into();
        let filename = export_filename(&appt, ExportFormat::Csv);
        assert_eq!(filename, "RDV_A/B_Industries_2024-06-01.csv");

        let path = save_export(to_csv(&appt).as_bytes(), &filename, &dir).unwrap();
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert_eq!(path.file_name().unwrap(), "RDV_A_B_Industries_2024-06-01.csv");
        assert!(path.exists());
    }

    #[test]
    fn disk_filename_is_a_single_component() {
        assert_eq!(disk_filename("RDV_Acme_2024-06-01.pdf"), "RDV_Acme_2024-06-01.pdf");
        assert_eq!(disk_filename("RDV_a\\b_2024\u{1}.csv"), "RDV_a_b_2024_.csv");
        assert_eq!(disk_filename(".."), "_");
    }

    #[test]
    fn wrap_text_splits_long_words() {
        let lines = wrap_text(&"a".repeat(25), 10);
        assert_eq!(lines, vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]);
    }

    #[test]
    fn wrap_text_short_and_empty() {
        assert_eq!(wrap_text("Short", 40), vec!["Short"]);
        assert_eq!(wrap_text("", 40), vec![String::new()]);
        assert_eq!(wrap_multiline("", 40), vec![String::new()]);
    }

    #[test]
    fn wrap_multiline_keeps_line_breaks() {
        let lines = wrap_multiline("premier\nsecond point", 40);
        assert_eq!(lines, vec!["premier", "second point"]);
    }
}

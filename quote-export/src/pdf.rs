//! Printable quote drawn directly with the PDF builtin fonts.
//!
//! Layout (A4, millimetres from the bottom-left corner): title, general
//! info in two columns, the line-item table, the complementary table and
//! the grand totals. Tables continue on a new page, with their header
//! repeated, when a row would cross the bottom margin.

use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use quote_core::{GeneralField, QuoteDocument, RowKind, recalculated};
use tracing::{debug, info};

use crate::{ExportError, Labels, Language, anonymized, format_money, format_quantity};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 15.0;
const RIGHT: f32 = 195.0;
const TOP: f32 = 282.0;
const BOTTOM: f32 = 20.0;

const BODY_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 8.0;
const ROW_HEIGHT: f32 = 5.0;

const DESCRIPTION_CHARS: usize = 38;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdfOptions {
    pub language: Language,
    /// Mask client, plate, chassis and insurer in the printed copy.
    pub anonymize: bool,
}

/// Renders the recalculated quote and writes it to exactly `path`.
pub fn export_pdf(
    quote: &QuoteDocument,
    path: &Path,
    options: &PdfOptions,
) -> Result<(), ExportError> {
    let bytes = render_pdf(quote, options)?;
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        file = %path.display(),
        language = %options.language,
        anonymize = options.anonymize,
        "Exported quote as PDF"
    );
    Ok(())
}

/// Renders the quote to PDF bytes. The input is recalculated first and is
/// never modified.
pub fn render_pdf(
    quote: &QuoteDocument,
    options: &PdfOptions,
) -> Result<Vec<u8>, ExportError> {
    render(quote, options).map(|(bytes, _)| bytes)
}

/// Renders the quote, also reporting how many pages it took.
fn render(
    quote: &QuoteDocument,
    options: &PdfOptions,
) -> Result<(Vec<u8>, usize), ExportError> {
    let quote = if options.anonymize {
        recalculated(anonymized(quote))
    } else {
        recalculated(quote.clone())
    };

    let labels = options.language.labels();
    let mut page = PageWriter::new(labels.title, labels)?;

    page.general_info(&quote);
    page.items_table(&quote, options.language);
    page.complementary_table(&quote, options.language);
    page.grand_totals(&quote, options.language);

    let pages = page.page_count;
    debug!(pages, "Rendered quote PDF");
    Ok((page.finish()?, pages))
}

/// Drawing cursor over a growing document.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    labels: &'static Labels,
    y: f32,
    page_count: usize,
}

impl PageWriter {
    fn new(
        title: &str,
        labels: &'static Labels,
    ) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;

        let mut writer = Self {
            doc,
            layer,
            font,
            bold,
            labels,
            y: TOP,
            page_count: 1,
        };
        writer.footer();
        writer.text_bold(title, 18.0, LEFT);
        writer.y -= 12.0;
        Ok(writer)
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut writer = BufWriter::new(Vec::<u8>::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    fn text(
        &self,
        text: &str,
        size: f32,
        x: f32,
    ) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), &self.font);
    }

    fn text_bold(
        &self,
        text: &str,
        size: f32,
        x: f32,
    ) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), &self.bold);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(LEFT), Mm(self.y)), false),
                (Point::new(Mm(RIGHT), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn footer(&self) {
        let text = format!("{} {}", self.labels.page, self.page_count);
        self.layer.use_text(text, 8.0, Mm(LEFT), Mm(BOTTOM - 10.0), &self.font);
    }

    /// Starts a new page when `height` more millimetres would not fit.
    /// Returns whether a page was added.
    fn ensure_space(
        &mut self,
        height: f32,
    ) -> bool {
        if self.y - height >= BOTTOM {
            return false;
        }

        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_count += 1;
        self.y = TOP;
        self.footer();
        true
    }

    // =========================================================================
    // Sections
    // =========================================================================

    fn general_info(
        &mut self,
        quote: &QuoteDocument,
    ) {
        let columns = [LEFT, 110.0];
        for row in GeneralField::ALL.chunks(2) {
            for (field, x) in row.iter().zip(columns) {
                let value = quote.general.get(*field);
                self.text(&format!("{}: {}", self.labels.general(*field), value), BODY_SIZE, x);
            }
            self.y -= 6.0;
        }

        self.y -= 2.0;
        self.rule();
        self.y -= 8.0;
    }

    fn items_table(
        &mut self,
        quote: &QuoteDocument,
        language: Language,
    ) {
        if quote.items.is_empty() {
            return;
        }

        self.ensure_space(ROW_HEIGHT * 3.0);
        self.items_header();

        for item in &quote.items {
            if self.ensure_space(ROW_HEIGHT) {
                self.items_header();
            }

            let description: String = item.description.chars().take(DESCRIPTION_CHARS).collect();
            let source: String = item.source.chars().take(10).collect();
            self.text(&source, TABLE_SIZE, LEFT);
            self.text(&description, TABLE_SIZE, 38.0);
            for (value, x) in [(item.sr, 108.0), (item.la, 117.0), (item.ve, 126.0), (item.me, 135.0)] {
                self.text(&format_quantity(value, language), TABLE_SIZE, x);
            }
            self.text(&format_quantity(item.quantity, language), TABLE_SIZE, 145.0);
            self.text(&format_money(item.price, language), TABLE_SIZE, 155.0);
            self.text(&format_money(item.total, language), TABLE_SIZE, 176.0);
            self.y -= ROW_HEIGHT;
        }

        self.y -= 2.0;
        self.rule();
        self.y -= 8.0;
    }

    fn items_header(&mut self) {
        let labels = self.labels;
        for (caption, x) in [
            (labels.source, LEFT),
            (labels.description, 38.0),
            ("SR", 108.0),
            ("LA", 117.0),
            ("VE", 126.0),
            ("ME", 135.0),
            (labels.quantity, 145.0),
            (labels.price, 155.0),
            (labels.total, 176.0),
        ] {
            self.text_bold(caption, TABLE_SIZE, x);
        }
        self.y -= 2.0;
        self.rule();
        self.y -= ROW_HEIGHT;
    }

    fn complementary_table(
        &mut self,
        quote: &QuoteDocument,
        language: Language,
    ) {
        self.ensure_space(ROW_HEIGHT * 3.0);
        self.complementary_header();

        for (kind, row) in quote.complementary.iter() {
            if self.ensure_space(ROW_HEIGHT) {
                self.complementary_header();
            }

            self.text(self.labels.row(kind), TABLE_SIZE, LEFT);
            if kind != RowKind::PartsTotal {
                self.text(&format_quantity(row.quantity, language), TABLE_SIZE, 70.0);
                self.text(&format_money(row.price, language), TABLE_SIZE, 82.0);
            }
            self.text(&format_money(row.taxable, language), TABLE_SIZE, 103.0);
            self.text(&format_quantity(row.tax, language), TABLE_SIZE, 128.0);
            self.text(&format_money(row.tax_amount, language), TABLE_SIZE, 143.0);
            self.text_bold(&format_money(row.total_with_tax, language), TABLE_SIZE, 168.0);
            self.y -= ROW_HEIGHT;
        }

        self.y -= 2.0;
        self.rule();
        self.y -= 8.0;
    }

    fn complementary_header(&mut self) {
        let labels = self.labels;
        for (caption, x) in [
            (labels.quantity, 70.0),
            (labels.price, 82.0),
            (labels.taxable, 103.0),
            (labels.tax_percentage, 128.0),
            (labels.tax_amount, 143.0),
            (labels.total_with_tax, 168.0),
        ] {
            self.text_bold(caption, TABLE_SIZE, x);
        }
        self.y -= 2.0;
        self.rule();
        self.y -= ROW_HEIGHT;
    }

    fn grand_totals(
        &mut self,
        quote: &QuoteDocument,
        language: Language,
    ) {
        self.ensure_space(24.0);
        let totals = &quote.totals;

        self.text(&format!("{}:", self.labels.subtotal), 11.0, 115.0);
        self.text(&format_money(totals.subtotal, language), 11.0, 165.0);
        self.y -= 7.0;

        self.text(&format!("{}:", self.labels.total_tax), 11.0, 115.0);
        self.text(&format_money(totals.iva, language), 11.0, 165.0);
        self.y -= 8.0;

        self.text_bold(&format!("{}:", self.labels.final_total), 13.0, 115.0);
        self.text_bold(&format_money(totals.total_with_iva, language), 13.0, 165.0);
        self.y -= 8.0;
    }
}

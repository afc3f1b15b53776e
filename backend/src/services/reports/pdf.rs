//! genpdf building blocks shared by the ficha and dictionary reports.

use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Document, Element};
use std::error::Error;

use crate::config::ReportsConfig;
use common::report::{Card, TableBlock};

pub const FALLBACK_FONT: &str = "LiberationSans";
pub const MARGIN_MM: f64 = 10.0;
pub const PAGE_WIDTH_INCH: f64 = 8.5;

const TITLE_SIZE: u8 = 14;
const HEADING_SIZE: u8 = 11;

/// Loads the configured font family, falling back to LiberationSans in the same directory.
fn load_font(
    settings: &ReportsConfig,
) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, Box<dyn Error>> {
    match genpdf::fonts::from_files(&settings.fonts_dir, &settings.font_family, None) {
        Ok(family) => Ok(family),
        Err(e) => {
            log::warn!(
                "Font {} not found in {} ({}), using {}",
                settings.font_family,
                settings.fonts_dir,
                e,
                FALLBACK_FONT
            );
            genpdf::fonts::from_files(&settings.fonts_dir, FALLBACK_FONT, None).map_err(Into::into)
        }
    }
}

/// Letter-width document with 10 mm margins and a compact body size.
pub fn configure_document(settings: &ReportsConfig, title: &str) -> Result<Document, Box<dyn Error>> {
    let font_family = load_font(settings)?;
    let mut doc = Document::new(font_family);
    doc.set_title(title);

    // 12px in the console is 9pt (1px = 0.75pt).
    let font_size_pt: u8 = (12.0_f32 * 0.75_f32).round() as u8;
    doc.set_font_size(font_size_pt);
    doc.set_line_spacing(1.1f64);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(MARGIN_MM as i32);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

pub fn push_title(doc: &mut Document, text: &str) {
    doc.push(
        Paragraph::new(StyledString::new(
            text.to_string(),
            Style::new().bold().with_font_size(TITLE_SIZE),
        ))
        .aligned(Alignment::Center),
    );
}

pub fn push_heading(doc: &mut Document, text: &str) {
    doc.push(Break::new(1));
    doc.push(Paragraph::new(StyledString::new(
        text.to_string(),
        Style::new().bold().with_font_size(HEADING_SIZE),
    )));
}

pub fn push_note(doc: &mut Document, text: &str) {
    doc.push(Paragraph::new(StyledString::new(
        text.to_string(),
        Style::new().italic(),
    )));
}

/// Bordered table with a bold header row. Tables without columns are skipped.
pub fn table(block: &TableBlock) -> Result<Option<TableLayout>, Box<dyn Error>> {
    let columns = block
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(block.headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return Ok(None);
    }

    let mut table = TableLayout::new(vec![1; columns]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    if !block.headers.is_empty() {
        let mut row = table.row();
        for i in 0..columns {
            let header = block.headers.get(i).cloned().unwrap_or_default();
            row = row.element(
                Paragraph::new(header)
                    .styled(Style::new().bold())
                    .padded(1),
            );
        }
        row.push()?;
    }
    for cells in &block.rows {
        let mut row = table.row();
        for i in 0..columns {
            let cell = cells.get(i).cloned().unwrap_or_default();
            row = row.element(Paragraph::new(cell).padded(1));
        }
        row.push()?;
    }
    Ok(Some(table))
}

/// Two-column label/value grid.
pub fn key_values(entries: &[(String, String)]) -> Result<TableLayout, Box<dyn Error>> {
    let mut table = TableLayout::new(vec![2, 3]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    for (label, value) in entries {
        table
            .row()
            .element(
                Paragraph::new(label.clone())
                    .styled(Style::new().bold())
                    .padded(1),
            )
            .element(Paragraph::new(value.clone()).padded(1))
            .push()?;
    }
    Ok(table)
}

pub fn push_table(doc: &mut Document, block: &TableBlock) -> Result<(), Box<dyn Error>> {
    if let Some(table) = table(block)? {
        doc.push(table);
    }
    Ok(())
}

pub fn push_key_values(doc: &mut Document, entries: &[(String, String)]) -> Result<(), Box<dyn Error>> {
    if !entries.is_empty() {
        doc.push(key_values(entries)?);
    }
    Ok(())
}

pub fn push_cards(doc: &mut Document, cards: &[Card]) -> Result<(), Box<dyn Error>> {
    for card in cards {
        doc.push(Break::new(0.5));
        doc.push(Paragraph::new(StyledString::new(
            card.title.clone(),
            Style::new().bold(),
        )));
        push_key_values(doc, &card.entries)?;
    }
    Ok(())
}

pub fn render(doc: Document) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut bytes = Vec::new();
    doc.render(&mut bytes)?;
    Ok(bytes)
}

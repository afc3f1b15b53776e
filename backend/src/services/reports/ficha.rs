use actix_web::{web, HttpResponse};
use genpdf::elements::{Break, Paragraph};
use genpdf::style::{Style, StyledString};
use genpdf::Document;
use std::error::Error;
use tempfile::NamedTempFile;

use super::images::{self, RemoteImages};
use super::pdf;
use super::ReportsState;
use crate::config::ReportsConfig;
use common::report::{build_report, FichaReport, ReportBlock};
use common::requests::ReportRequest;

/// Renders the PDF of one ficha and serves it inline.
pub async fn process(
    state: web::Data<ReportsState>,
    body: web::Json<ReportRequest>,
) -> HttpResponse {
    let ReportRequest {
        form,
        ficha,
        catalogs,
    } = body.into_inner();
    let report = build_report(&form, &ficha, &catalogs);
    let remote = images::fetch_remote(&state.client, &report).await;
    let settings = state.settings.clone();
    let file_name = format!("ficha_{}.pdf", report.ficha_id);

    let rendered = web::block(move || {
        render_ficha(&report, &remote, &settings).map_err(|e| e.to_string())
    })
    .await;

    match rendered {
        Ok(Ok(bytes)) => {
            log::info!("Rendered {} ({} bytes)", file_name, bytes.len());
            HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    "Content-Disposition",
                    format!("inline; filename=\"{}\"", file_name),
                ))
                .body(bytes)
        }
        Ok(Err(e)) => {
            log::error!("PDF generation failed for {}: {}", file_name, e);
            HttpResponse::ServiceUnavailable().body(format!("PDF generation failed: {}", e))
        }
        Err(e) => {
            log::error!("PDF worker failed for {}: {}", file_name, e);
            HttpResponse::ServiceUnavailable().body(format!("PDF generation failed: {}", e))
        }
    }
}

fn push_header(doc: &mut Document, report: &FichaReport) -> Result<(), Box<dyn Error>> {
    pdf::push_title(doc, &report.title);
    doc.push(Break::new(1));

    let mut summary = Paragraph::new("");
    summary.push(StyledString::new("Ficha: ", Style::new().bold()));
    summary.push(report.ficha_id.clone());
    summary.push(StyledString::new("   Familia: ", Style::new().bold()));
    summary.push(report.familia.clone());
    doc.push(summary);

    let mut risk = Paragraph::new("");
    risk.push(StyledString::new("Nivel de riesgo: ", Style::new().bold()));
    risk.push(format!("{} ({})", report.risk_level, report.risk_score));
    doc.push(risk);

    pdf::push_heading(doc, "AUDITORÍA");
    pdf::push_table(doc, &report.audit)?;
    pdf::push_heading(doc, "GEORREFERENCIACIÓN");
    pdf::push_table(doc, &report.georeference)?;
    Ok(())
}

fn push_block(
    doc: &mut Document,
    block: &ReportBlock,
    remote: &RemoteImages,
    temp_files: &mut Vec<NamedTempFile>,
) -> Result<(), Box<dyn Error>> {
    match block {
        ReportBlock::KeyValues { entries } => pdf::push_key_values(doc, entries)?,
        ReportBlock::Table(table) => pdf::push_table(doc, table)?,
        ReportBlock::Cards { cards } => pdf::push_cards(doc, cards)?,
        ReportBlock::Empty { message } => pdf::push_note(doc, message),
        ReportBlock::Image {
            label,
            kind,
            source,
        } => {
            let Some(raw) = images::resolve_source(source, remote) else {
                return Ok(());
            };
            let Some(img) = images::decode(&raw.bytes, raw.mime.as_deref()) else {
                return Ok(());
            };
            doc.push(Paragraph::new(StyledString::new(
                label.clone(),
                Style::new().bold(),
            )));
            doc.push(images::to_pdf_image(img, *kind, temp_files)?);
        }
    }
    Ok(())
}

/// Header, audit and georeference tables, then every section in report order.
pub fn render_ficha(
    report: &FichaReport,
    remote: &RemoteImages,
    settings: &ReportsConfig,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut doc = pdf::configure_document(settings, &format!("Ficha {}", report.ficha_id))?;
    // Temporary PNGs must stay alive until the document is rendered.
    let mut temp_files: Vec<NamedTempFile> = Vec::new();

    push_header(&mut doc, report)?;
    for section in &report.sections {
        pdf::push_heading(&mut doc, &section.title);
        for block in &section.blocks {
            push_block(&mut doc, block, remote, &mut temp_files)?;
        }
    }

    pdf::render(doc)
}

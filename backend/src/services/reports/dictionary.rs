use actix_web::{web, HttpResponse};
use std::error::Error;

use super::pdf;
use super::ReportsState;
use crate::config::ReportsConfig;
use common::dictionary::{build_dictionary, DataDictionary, DICTIONARY_HEADERS};
use common::report::TableBlock;
use common::requests::DictionaryRequest;

/// Renders the ISO 8000 data dictionary of a form as a downloadable PDF.
pub async fn process(
    state: web::Data<ReportsState>,
    body: web::Json<DictionaryRequest>,
) -> HttpResponse {
    let dictionary = build_dictionary(&body.into_inner().form);
    let file_name = dictionary.file_name.clone();
    let settings = state.settings.clone();

    let rendered = web::block(move || {
        render_dictionary(&dictionary, &settings).map_err(|e| e.to_string())
    })
    .await;

    match rendered {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file_name),
            ))
            .body(bytes),
        Ok(Err(e)) => {
            log::error!("Dictionary generation failed for {}: {}", file_name, e);
            HttpResponse::ServiceUnavailable().body(format!("PDF generation failed: {}", e))
        }
        Err(e) => {
            log::error!("Dictionary worker failed for {}: {}", file_name, e);
            HttpResponse::ServiceUnavailable().body(format!("PDF generation failed: {}", e))
        }
    }
}

/// One table per section. genpdf paragraphs do not break on newlines, so rules share one line.
pub fn section_table(entries: &[common::dictionary::DictionaryEntry]) -> TableBlock {
    TableBlock {
        headers: DICTIONARY_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: entries
            .iter()
            .map(|entry| {
                vec![
                    entry.identifier.clone(),
                    entry.label.clone(),
                    entry.definition.clone(),
                    entry.rules.join("; "),
                ]
            })
            .collect(),
    }
}

pub fn render_dictionary(
    dictionary: &DataDictionary,
    settings: &ReportsConfig,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut doc = pdf::configure_document(settings, &dictionary.title)?;
    pdf::push_title(&mut doc, &dictionary.title);

    for section in &dictionary.sections {
        pdf::push_heading(&mut doc, &section.title);
        if section.entries.is_empty() {
            pdf::push_note(&mut doc, "(Sin campos)");
            continue;
        }
        pdf::push_table(&mut doc, &section_table(&section.entries))?;
    }

    pdf::render(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::dictionary::DictionaryEntry;
    use pretty_assertions::assert_eq;

    #[test]
    fn rules_share_one_cell() {
        let table = section_table(&[DictionaryEntry {
            identifier: "edad".to_string(),
            label: "Edad".to_string(),
            definition: "Campo de datos del formulario.".to_string(),
            rules: vec!["Tipo: number".to_string(), "Obligatorio: Sí".to_string()],
        }]);
        assert_eq!(table.headers.len(), 4);
        assert_eq!(
            table.rows,
            vec![vec![
                "edad".to_string(),
                "Edad".to_string(),
                "Campo de datos del formulario.".to_string(),
                "Tipo: number; Obligatorio: Sí".to_string(),
            ]]
        );
    }
}

use yew::prelude::*;

use common::dictionary::{DataDictionary, DICTIONARY_HEADERS};

use super::messages::Msg;
use super::state::DictionaryComponent;
use crate::components::helpers::selected_value;
use crate::components::pdf_viewer::{pdf_viewer, PdfViewer};

pub fn view(component: &DictionaryComponent, ctx: &Context<DictionaryComponent>) -> Html {
    let link = ctx.link();
    let selected = component.selected_form;

    html! {
        <div class="dictionary-page">
            <div class="ficha-header">
                <div>
                    <h2>{"Diccionario de Datos ISO 8000"}</h2>
                    <p class="muted">{"Identificadores, etiquetas y reglas de calidad de cada campo."}</p>
                </div>
                <div class="ficha-actions">
                    <select
                        onchange={link.batch_callback(|e: Event| {
                            selected_value(&e).parse::<i64>().ok().map(Msg::SelectForm)
                        })}
                    >
                        <option value="" disabled=true selected={selected.is_none()}>{"Seleccione un formulario"}</option>
                        { for component.forms.iter().filter_map(|f| f.id.map(|id| (id, f))).map(|(id, f)| html! {
                            <option value={id.to_string()} selected={selected == Some(id)}>{ f.name.clone() }</option>
                        }) }
                    </select>
                    <button
                        class="btn primary"
                        disabled={component.dictionary.is_none()}
                        onclick={link.callback(|_| Msg::ExportPdf)}
                    >
                        {"Exportar PDF"}
                    </button>
                </div>
            </div>
            {
                match (&component.dictionary, component.loading) {
                    (_, true) => html! { <div class="ficha-loading">{"Cargando formulario..."}</div> },
                    (Some(dictionary), false) => build_tables(dictionary),
                    (None, false) => html! { <p class="muted">{"Seleccione un formulario para ver su diccionario."}</p> },
                }
            }
            {
                pdf_viewer(PdfViewer {
                    dialog_ref: component.pdf_dialog_ref.clone(),
                    url: component.pdf_url.as_deref(),
                    loading: component.pdf_loading,
                    download: component.dictionary.as_ref().map(|d| d.file_name.as_str()),
                    on_close: link.callback(|_| Msg::ClosePdf),
                    on_loaded: link.callback(|_: Event| Msg::PdfLoaded),
                })
            }
        </div>
    }
}

fn build_tables(dictionary: &DataDictionary) -> Html {
    html! {
        <div>
            <h3>{ dictionary.title.clone() }</h3>
            { for dictionary.sections.iter().map(|section| html! {
                <div class="section-card">
                    <h4>{ section.title.clone() }</h4>
                    <table class="array-table">
                        <thead>
                            <tr>{ for DICTIONARY_HEADERS.iter().map(|h| html! { <th>{ *h }</th> }) }</tr>
                        </thead>
                        <tbody>
                            { for section.entries.iter().map(|entry| html! {
                                <tr>
                                    <td><code>{ entry.identifier.clone() }</code></td>
                                    <td>{ entry.label.clone() }</td>
                                    <td>{ entry.definition.clone() }</td>
                                    <td>
                                        { for entry.rules.iter().map(|rule| html! { <div>{ rule.clone() }</div> }) }
                                    </td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                </div>
            }) }
        </div>
    }
}

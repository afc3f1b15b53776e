use yew::prelude::*;

use crate::tops_sheet::top_sheet::TopSheet;

pub struct PdfViewer<'a> {
    pub dialog_ref: NodeRef,
    pub url: Option<&'a str>,
    pub loading: bool,
    /// File name offered for download, if any.
    pub download: Option<&'a str>,
    pub on_close: Callback<MouseEvent>,
    pub on_loaded: Callback<Event>,
}

/// Sheet with the generated PDF in an iframe. A white overlay with a spinner
/// covers the frame until the document has loaded.
pub fn pdf_viewer(viewer: PdfViewer) -> Html {
    let body = match viewer.url {
        Some(url) => {
            let iframe_style = if viewer.loading {
                "width:100%;height:100%;border:none;background:#fff;border-radius:4px;visibility:hidden;"
            } else {
                "width:100%;height:100%;border:none;background:#fff;border-radius:4px;visibility:visible;"
            };
            html! {
                <div style="position:relative;width:80vw;height:80vh;">
                    <iframe src={url.to_string()} style={iframe_style} onload={viewer.on_loaded.clone()} />
                    { if viewer.loading { spinner() } else { html! {} } }
                    {
                        match viewer.download {
                            Some(name) => html! {
                                <a class="btn primary pdf-download" href={url.to_string()} download={name.to_string()}>
                                    {"Descargar"}
                                </a>
                            },
                            None => html! {},
                        }
                    }
                </div>
            }
        }
        None if viewer.loading => html! {
            <div style="position:relative;width:80vw;height:80vh;">{ spinner() }</div>
        },
        None => html! { <div style="color:#fff;">{"No hay PDF disponible"}</div> },
    };

    html! {
        <TopSheet node_ref={viewer.dialog_ref}>
            <div class="sheet-backdrop">
                <button class="sheet-close" onclick={viewer.on_close}>{ "✕" }</button>
                { body }
            </div>
        </TopSheet>
    }
}

fn spinner() -> Html {
    html! {
        <div style="position:absolute;top:0;left:0;width:100%;height:100%;display:flex;align-items:center;justify-content:center;background:#fff;z-index:10001;">
            <div style="display:flex;flex-direction:column;align-items:center;">
                <div class="spin" style="width:48px;height:48px;border:6px solid #ccc;border-top-color:#1976d2;border-radius:50%;animation:spin 1s linear infinite;"></div>
                <div style="margin-top:12px;color:#000;">{"Generando PDF..."}</div>
            </div>
            <style>{r#"
                @keyframes spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }
            "#}</style>
        </div>
    }
}

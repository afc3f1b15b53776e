use common::geo::GeoLevel;
use common::model::catalog::CatalogEntry;
use common::model::ficha::Ficha;
use common::model::form::Form;
use common::store::FormAction;
use gloo_file::ObjectUrl;

use super::state::RowRequest;

pub enum Msg {
    Loaded { form: Box<Form>, ficha: Box<Ficha> },
    LoadFailed(String),
    /// Catalog of `level`, fetched while its parent held `parent`.
    CatalogLoaded {
        level: GeoLevel,
        parent: Option<String>,
        entries: Vec<CatalogEntry>,
    },
    Edit(FormAction),
    SelectSection(usize),
    RequestRow(RowRequest),
    ConfirmRow,
    CancelRow,
    ImageSelected { name: String, file: web_sys::File },
    ZoomSignature(String),
    CloseSignature,
    Save,
    SaveFinished(bool),
    OpenPdf,
    PdfReady(ObjectUrl),
    PdfFailed,
    PdfLoaded,
    ClosePdf,
}

use common::model::form::{Form, FormSummary};
use gloo_file::ObjectUrl;

pub enum Msg {
    LoadForms,
    FormsLoaded(Vec<FormSummary>),
    SelectForm(i64),
    FormLoaded(Box<Form>),
    FormFailed,
    ExportPdf,
    PdfReady(ObjectUrl),
    PdfFailed,
    PdfLoaded,
    ClosePdf,
}

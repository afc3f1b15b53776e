use gloo_file::ObjectUrl;
use yew::NodeRef;

use common::dictionary::DataDictionary;
use common::model::form::{Form, FormSummary};

pub struct DictionaryComponent {
    pub forms: Vec<FormSummary>,
    pub selected_form: Option<i64>,
    pub form: Option<Form>,
    /// Derived from `form` whenever it changes.
    pub dictionary: Option<DataDictionary>,
    pub loading: bool,
    pub pdf_url: Option<ObjectUrl>,
    pub pdf_loading: bool,
    pub pdf_dialog_ref: NodeRef,
}

impl DictionaryComponent {
    pub fn new() -> Self {
        Self {
            forms: Vec::new(),
            selected_form: None,
            form: None,
            dictionary: None,
            loading: false,
            pdf_url: None,
            pdf_loading: false,
            pdf_dialog_ref: NodeRef::default(),
        }
    }
}

use yew::NodeRef;

use common::builder::FormDraft;
use common::model::form::FormSummary;

pub struct FormsListComponent {
    pub forms: Vec<FormSummary>,
    pub loading: bool,
    pub draft: FormDraft,
    pub saving: bool,
    pub create_dialog_ref: NodeRef,
}

impl FormsListComponent {
    pub fn new() -> Self {
        Self {
            forms: Vec::new(),
            loading: true,
            draft: FormDraft::default(),
            saving: false,
            create_dialog_ref: NodeRef::default(),
        }
    }
}

use yew::NodeRef;

use common::builder::{FieldDraft, SectionDraft};
use common::model::form::Form;

pub struct FormBuilder {
    pub form: Option<Form>,
    pub loading: bool,
    pub load_error: Option<String>,
    /// Set while a write is in flight; further writes are ignored.
    pub saving: bool,
    pub section_draft: SectionDraft,
    pub field_draft: Option<FieldDraft>,
    /// Field id and label awaiting delete confirmation.
    pub pending_delete: Option<(i64, String)>,
    pub section_dialog_ref: NodeRef,
    pub field_dialog_ref: NodeRef,
    pub confirm_dialog_ref: NodeRef,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self {
            form: None,
            loading: true,
            load_error: None,
            saving: false,
            section_draft: SectionDraft::default(),
            field_draft: None,
            pending_delete: None,
            section_dialog_ref: NodeRef::default(),
            field_dialog_ref: NodeRef::default(),
            confirm_dialog_ref: NodeRef::default(),
        }
    }
}

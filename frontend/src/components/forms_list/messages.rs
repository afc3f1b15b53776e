use common::model::form::FormSummary;

pub enum Msg {
    Load,
    Loaded(Vec<FormSummary>),
    LoadFailed,
    OpenCreate,
    CloseCreate,
    EditName(String),
    EditDescription(String),
    EditVersion(String),
    Create,
    /// `None` when the API did not echo the new id.
    Created(Option<i64>),
    CreateFailed,
}

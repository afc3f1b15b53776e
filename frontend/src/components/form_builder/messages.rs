use common::builder::{Direction, FieldEdit};
use common::model::form::Form;

pub enum Msg {
    Load,
    Loaded(Box<Form>),
    LoadFailed(String),
    NewSection,
    EditSection(i64),
    SectionName(String),
    SectionTemplate(bool),
    SaveSection,
    CloseSection,
    MoveSection(i64, Direction),
    NewField(i64),
    EditField(i64),
    EditDraft(FieldEdit),
    SaveField,
    CloseField,
    AskDeleteField(i64),
    CancelDelete,
    ConfirmDelete,
    /// A write succeeded: show the toast and reload the form.
    Written(&'static str),
    WriteFailed(&'static str),
}

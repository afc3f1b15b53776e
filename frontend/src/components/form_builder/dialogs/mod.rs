mod confirm;
mod field_editor;
mod section;

pub use confirm::confirm_dialog;
pub use field_editor::field_dialog;
pub use section::section_dialog;

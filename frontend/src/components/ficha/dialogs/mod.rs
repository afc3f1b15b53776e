mod confirm;
mod pdf;
mod signature;

pub use confirm::confirm_dialog;
pub use pdf::pdf_dialog;
pub use signature::signature_dialog;

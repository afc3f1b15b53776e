pub mod dictionary;
pub mod ficha;
pub mod fichas_list;
pub mod form_builder;
pub mod forms_list;
pub mod helpers;
pub mod pdf_viewer;

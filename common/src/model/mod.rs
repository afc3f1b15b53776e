pub mod catalog;
pub mod ficha;
pub mod form;
mod lenient;

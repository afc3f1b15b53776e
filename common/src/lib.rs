//! Shared model and schema interpretation logic for the ficha familiar console.
//!
//! Everything here is plain data and pure functions so that both the Yew frontend
//! and the actix host can use it, and so that it is testable off the browser.

pub mod builder;
pub mod dictionary;
pub mod error;
pub mod geo;
pub mod model;
pub mod options;
pub mod quality;
pub mod repeat;
pub mod report;
pub mod requests;
pub mod risk;
pub mod sections;
pub mod store;
pub mod validation;
pub mod values;
pub mod widgets;

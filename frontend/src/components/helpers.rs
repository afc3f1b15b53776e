//! Helpers shared by the console pages.
//!
//! - **User feedback**: [`show_toast`] for transient messages (in Spanish).
//! - **Dirty tracking**: [`compute_md5`] fingerprints the editable state and
//!   [`set_window_dirty_flag`] mirrors it on `window.app_dirty` so the page
//!   can warn before unloading.
//! - **Event plumbing**: reading values out of input and select events.
//! - **PDF blobs**: wrapping response bytes in an object URL for an `<iframe>`.
//! - **Navigation**: [`navigate`] switches page through the query string.

use chrono::NaiveDate;
use gloo_file::{Blob, ObjectUrl};
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

/// Displays a temporary notification at the bottom of the page.
///
/// The toast removes itself after three seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Hex MD5 of `input`, compared against the fingerprint taken at load/save.
pub fn compute_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

/// Publishes whether there are unsaved changes as `window.app_dirty`.
pub fn set_window_dirty_flag(dirty: bool) {
    if let Some(window) = web_sys::window() {
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

/// Today's date in the browser's time zone.
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_else(common::widgets::min_date)
}

pub fn input_value(e: &InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn textarea_value(e: &InputEvent) -> String {
    let input: HtmlTextAreaElement = e.target_unchecked_into();
    input.value()
}

pub fn changed_value(e: &Event) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn changed_checked(e: &Event) -> bool {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.checked()
}

pub fn selected_value(e: &Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}

/// First file chosen in a file input, if any.
pub fn selected_file(e: &Event) -> Option<web_sys::File> {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.files()?.get(0)
}

/// Object URL serving `bytes` as a PDF. Revoked when dropped.
pub fn pdf_object_url(bytes: &[u8]) -> ObjectUrl {
    ObjectUrl::from(Blob::new_with_options(bytes, Some("application/pdf")))
}

/// Loads another console page, e.g. `?builder=4`.
pub fn navigate(query: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().set_href(query) {
            log::error!("Navigation to {} failed: {:?}", query, err);
        }
    }
}

//! Client for the fichas API and for the console host's report endpoints.
//!
//! Every call attaches the bearer token from [`auth::token`] and turns non-2xx
//! answers into [`ApiError::Status`]. Callers show the error in a toast; there
//! is no retry.

pub mod auth;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use common::error::FichaError;
use common::model::catalog::CatalogEntry;
use common::model::ficha::{Ficha, FichaPage, FichaSummary};
use common::model::form::{Field, Form, FormSummary};
use common::requests::{
    BulkStatusRequest, DictionaryRequest, FichaUpdate, NewForm, ReportRequest, SectionWrite,
};

use crate::config::{API_URL, REPORTS_URL};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("error de red: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("el servidor respondió {status}: {body}")]
    Status { status: u16, body: String },
    #[error("estructura del formulario inválida: {0}")]
    Schema(#[from] FichaError),
    #[error("respuesta inesperada: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn api_url(path: &str) -> String {
    format!("{}{}", API_URL.trim_end_matches('/'), path)
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match auth::token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn check(response: Response) -> ApiResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

async fn get_json<T: DeserializeOwned>(path: &str) -> ApiResult<T> {
    let response = authorized(Request::get(&api_url(path))).send().await?;
    Ok(check(response).await?.json::<T>().await?)
}

pub async fn fetch_form(form_id: i64) -> ApiResult<Form> {
    let schema: Value = get_json(&format!("/admin/forms/{}/full", form_id)).await?;
    Ok(Form::from_value(&schema)?)
}

pub async fn fetch_forms() -> ApiResult<Vec<FormSummary>> {
    get_json("/admin/forms").await
}

/// The API answers `POST /admin/forms` with the new row; only `id` is relied on.
pub async fn create_form(body: &NewForm) -> ApiResult<FormSummary> {
    let request = authorized(Request::post(&api_url("/admin/forms"))).json(body)?;
    Ok(check(request.send().await?).await?.json().await?)
}

pub async fn create_section(form_id: i64, body: &SectionWrite) -> ApiResult<()> {
    let path = format!("/admin/forms/{}/sections", form_id);
    send_json(Request::post(&api_url(&path)), body).await
}

pub async fn update_section(section_id: i64, body: &SectionWrite) -> ApiResult<()> {
    let path = format!("/admin/sections/{}", section_id);
    send_json(Request::put(&api_url(&path)), body).await
}

pub async fn create_field(section_id: i64, field: &Field) -> ApiResult<()> {
    let path = format!("/admin/sections/{}/fields", section_id);
    send_json(Request::post(&api_url(&path)), field).await
}

pub async fn update_field(field_id: i64, field: &Field) -> ApiResult<()> {
    let path = format!("/admin/fields/{}", field_id);
    send_json(Request::put(&api_url(&path)), field).await
}

pub async fn delete_field(field_id: i64) -> ApiResult<()> {
    let path = format!("/admin/fields/{}", field_id);
    check(authorized(Request::delete(&api_url(&path))).send().await?).await?;
    Ok(())
}

async fn send_json<B: Serialize>(builder: RequestBuilder, body: &B) -> ApiResult<()> {
    let request = authorized(builder).json(body)?;
    check(request.send().await?).await?;
    Ok(())
}

pub async fn fetch_ficha(ficha_id: i64) -> ApiResult<Ficha> {
    get_json(&format!("/web/fichas/{}", ficha_id)).await
}

/// The list endpoint is paginated (`{data: [...]}`); a bare array is accepted too.
pub async fn fetch_fichas() -> ApiResult<Vec<FichaSummary>> {
    let body: Value = get_json("/web/fichas").await?;
    if body.is_array() {
        return Ok(serde_json::from_value(body)?);
    }
    let page: FichaPage = serde_json::from_value(body)?;
    Ok(page.data)
}

pub async fn fetch_catalog(path: &str) -> ApiResult<Vec<CatalogEntry>> {
    get_json(path).await
}

pub async fn save_ficha(ficha_id: i64, update: &FichaUpdate) -> ApiResult<()> {
    let request = authorized(Request::put(&api_url(&format!("/web/fichas/{}", ficha_id))))
        .json(update)?;
    check(request.send().await?).await?;
    Ok(())
}

pub async fn bulk_status(body: &BulkStatusRequest) -> ApiResult<()> {
    let request = authorized(Request::patch(&api_url("/web/fichas/bulk-status"))).json(body)?;
    check(request.send().await?).await?;
    Ok(())
}

async fn post_pdf<B: Serialize>(path: &str, body: &B) -> ApiResult<Vec<u8>> {
    let request = Request::post(&format!("{}{}", REPORTS_URL, path)).json(body)?;
    let response = check(request.send().await?).await?;
    Ok(response.binary().await?)
}

pub async fn ficha_pdf(body: &ReportRequest) -> ApiResult<Vec<u8>> {
    post_pdf("/ficha", body).await
}

pub async fn dictionary_pdf(body: &DictionaryRequest) -> ApiResult<Vec<u8>> {
    post_pdf("/dictionary", body).await
}

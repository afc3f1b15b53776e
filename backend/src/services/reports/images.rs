//! Images embedded in the ficha PDF.
//!
//! Bytes come either from a base64 payload in the record or from a URL that is
//! fetched before rendering. Decoding first trusts the declared mime type, then
//! retries with format guessing; an image that fails both is left out of the
//! report.

use futures_util::future::join_all;
use genpdf::elements::Image as PdfImage;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use std::collections::HashMap;
use std::error::Error;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use super::pdf::{MARGIN_MM, PAGE_WIDTH_INCH};
use common::report::{FichaReport, ImageKind, ImageSource, ReportBlock};
use common::widgets::{decode_data_url, signature_src};

pub const IMAGE_DPI: f64 = 150.0;

/// Largest remote image body accepted, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unsupported image URL {0}")]
    UnsupportedUrl(String),

    #[error("image body exceeds the size limit")]
    TooLarge,
}

/// Bytes downloaded for a remote image, with the response's content type.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

pub type RemoteImages = HashMap<String, RawImage>;

/// Largest size an image may take on the page, in console CSS pixels.
fn css_box(kind: ImageKind) -> (f64, f64) {
    match kind {
        ImageKind::Signature => (300.0, 120.0),
        ImageKind::Photo => (200.0, 200.0),
    }
}

/// URLs of every remote image in the report, without duplicates.
pub fn remote_urls(report: &FichaReport) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for block in report.sections.iter().flat_map(|s| s.blocks.iter()) {
        if let ReportBlock::Image {
            source: ImageSource::Remote(url),
            ..
        } = block
        {
            if !urls.contains(url) {
                urls.push(url.clone());
            }
        }
    }
    urls
}

/// Only absolute http(s) URLs are fetched.
pub fn fetchable_url(raw: &str) -> Option<reqwest::Url> {
    reqwest::Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}

async fn fetch_one(client: &reqwest::Client, raw: &str) -> Result<RawImage, FetchError> {
    let url = fetchable_url(raw).ok_or_else(|| FetchError::UnsupportedUrl(raw.to_string()))?;
    let mut response = client.get(url).send().await?.error_for_status()?;
    if response
        .content_length()
        .is_some_and(|len| len > MAX_IMAGE_BYTES as u64)
    {
        return Err(FetchError::TooLarge);
    }
    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        append_capped(&mut bytes, &chunk)?;
    }
    Ok(RawImage { mime, bytes })
}

/// Appends `chunk` unless the body would grow past [`MAX_IMAGE_BYTES`].
fn append_capped(body: &mut Vec<u8>, chunk: &[u8]) -> Result<(), FetchError> {
    if body.len() + chunk.len() > MAX_IMAGE_BYTES {
        return Err(FetchError::TooLarge);
    }
    body.extend_from_slice(chunk);
    Ok(())
}

/// Downloads all remote images concurrently. Failed downloads are logged and skipped.
pub async fn fetch_remote(client: &reqwest::Client, report: &FichaReport) -> RemoteImages {
    let urls = remote_urls(report);
    let results = join_all(urls.iter().map(|url| fetch_one(client, url))).await;

    urls.into_iter()
        .zip(results)
        .filter_map(|(url, result)| match result {
            Ok(raw) => Some((url, raw)),
            Err(e) => {
                log::warn!("Could not fetch image {}: {}", url, e);
                None
            }
        })
        .collect()
}

/// Decodes with the declared format, then by sniffing the bytes.
pub fn decode(bytes: &[u8], mime: Option<&str>) -> Option<DynamicImage> {
    let declared = mime.and_then(ImageFormat::from_mime_type);
    if let Some(format) = declared {
        match image::load_from_memory_with_format(bytes, format) {
            Ok(img) => return Some(img),
            Err(e) => log::debug!("Declared format {:?} failed: {}", format, e),
        }
    }

    let guessed = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.decode().ok());
    if guessed.is_none() {
        log::warn!("Image omitted from report: undecodable {} bytes", bytes.len());
    }
    guessed
}

/// Raw bytes and mime type for an image block, if they are available.
pub fn resolve_source(source: &ImageSource, remote: &RemoteImages) -> Option<RawImage> {
    match source {
        ImageSource::Embedded(payload) => match decode_data_url(&signature_src(payload)) {
            Ok((mime, bytes)) => Some(RawImage {
                mime: Some(mime),
                bytes,
            }),
            Err(e) => {
                log::warn!("Image omitted from report: {}", e);
                None
            }
        },
        ImageSource::Remote(url) => remote.get(url).cloned(),
    }
}

/// Scale (at most 1.0) that fits `width`x`height` pixels into the printable
/// width and the CSS box of `kind`.
pub fn fit_scale(width: u32, height: u32, kind: ImageKind) -> f64 {
    let margin_in = MARGIN_MM / 25.4_f64;
    let content_target_px = (PAGE_WIDTH_INCH - 2.0 * margin_in) * IMAGE_DPI;

    // 96 CSS px per inch.
    let css_to_px = IMAGE_DPI / 96.0;
    let (css_w, css_h) = css_box(kind);

    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    (content_target_px / w)
        .min(css_w * css_to_px / w)
        .min(css_h * css_to_px / h)
        .min(1.0)
}

/// Resizes, flattens alpha over white and writes an RGB PNG that genpdf can embed.
///
/// The temporary file must outlive the document render, so it is pushed into `temp_files`.
pub fn to_pdf_image(
    img: DynamicImage,
    kind: ImageKind,
    temp_files: &mut Vec<NamedTempFile>,
) -> Result<PdfImage, Box<dyn Error>> {
    let (orig_w, orig_h) = img.dimensions();
    let scale = fit_scale(orig_w, orig_h, kind);

    let resized = if scale >= 1.0 {
        img
    } else {
        let new_w = (orig_w as f64 * scale).max(1.0).round() as u32;
        let new_h = (orig_h as f64 * scale).max(1.0).round() as u32;
        img.resize(new_w, new_h, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut background = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &rgba, 0, 0);
    let raw = DynamicImage::ImageRgba8(background).to_rgb8().into_raw();

    let mut tmp = NamedTempFile::new()?;
    {
        let file = tmp.as_file_mut();
        let mut encoder = PngEncoder::new(file, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raw)?;
    }

    let path: PathBuf = tmp.path().to_path_buf();
    let mut element = PdfImage::from_path(path)?;
    element.set_dpi(IMAGE_DPI);
    temp_files.push(tmp);
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::report::{ReportSection, TableBlock};
    use image::{Rgb, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([200, 10, 10])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn report(blocks: Vec<ReportBlock>) -> FichaReport {
        FichaReport {
            title: "FICHA FAMILIAR".to_string(),
            ficha_id: "1".to_string(),
            familia: "Familia Paz".to_string(),
            risk_level: "Riesgo Bajo".to_string(),
            risk_score: "Puntaje: 0".to_string(),
            audit: TableBlock::default(),
            georeference: TableBlock::default(),
            sections: vec![ReportSection {
                title: "VIVIENDA".to_string(),
                blocks,
            }],
        }
    }

    fn photo(source: ImageSource) -> ReportBlock {
        ReportBlock::Image {
            label: "Foto".to_string(),
            kind: ImageKind::Photo,
            source,
        }
    }

    #[test]
    fn wrong_declared_mime_falls_back_to_sniffing() {
        let img = decode(&png_bytes(), Some("image/jpeg")).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
    }

    #[test]
    fn missing_mime_is_sniffed() {
        assert!(decode(&png_bytes(), None).is_some());
    }

    #[test]
    fn garbage_is_omitted() {
        assert!(decode(b"not an image at all", Some("image/png")).is_none());
    }

    #[test]
    fn bare_signature_payload_is_read_as_png() {
        let payload = common::widgets::encode_data_url("image/png", &png_bytes());
        let bare = payload.trim_start_matches("data:image/png;base64,").to_string();

        let raw = resolve_source(&ImageSource::Embedded(bare), &RemoteImages::new()).unwrap();
        assert_eq!(raw.mime.as_deref(), Some("image/png"));
        assert!(decode(&raw.bytes, raw.mime.as_deref()).is_some());
    }

    #[test]
    fn remote_urls_are_collected_once() {
        let url = "https://cdn.example.org/fotos/casa.jpg".to_string();
        let report = report(vec![
            photo(ImageSource::Remote(url.clone())),
            photo(ImageSource::Embedded("abc".to_string())),
            photo(ImageSource::Remote(url.clone())),
        ]);
        assert_eq!(remote_urls(&report), vec![url]);
    }

    #[test]
    fn unfetched_remote_image_resolves_to_nothing() {
        let source = ImageSource::Remote("https://cdn.example.org/x.png".to_string());
        assert!(resolve_source(&source, &RemoteImages::new()).is_none());
    }

    #[test]
    fn only_http_urls_are_fetched() {
        assert!(fetchable_url("https://cdn.example.org/fotos/casa.jpg").is_some());
        assert!(fetchable_url("http://10.0.0.2:8000/img.png").is_some());
        assert!(fetchable_url("file:///etc/passwd").is_none());
        assert!(fetchable_url("ftp://cdn.example.org/x.png").is_none());
        assert!(fetchable_url("http//broken").is_none());
    }

    #[test]
    fn bodies_stop_at_the_size_cap() {
        let mut body = vec![0u8; MAX_IMAGE_BYTES - 4];
        assert!(append_capped(&mut body, &[1, 2, 3, 4]).is_ok());
        assert_eq!(body.len(), MAX_IMAGE_BYTES);
        assert!(matches!(append_capped(&mut body, &[5]), Err(FetchError::TooLarge)));
        assert_eq!(body.len(), MAX_IMAGE_BYTES);
    }

    #[test]
    fn small_images_are_not_upscaled() {
        assert_eq!(fit_scale(40, 30, ImageKind::Photo), 1.0);
    }

    #[test]
    fn large_images_fit_their_css_box() {
        // 200 CSS px at 150 dpi is 312.5 image px.
        let scale = fit_scale(1250, 625, ImageKind::Photo);
        assert!((scale - 0.25).abs() < 1e-9);

        let signature = fit_scale(1000, 1000, ImageKind::Signature);
        assert!((signature * 1000.0 - 187.5).abs() < 1e-6);
    }
}

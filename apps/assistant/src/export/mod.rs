//! Export pipeline: rendered resume → bitmap → paginated A4 PDF.

pub mod pagination;
pub mod pdf;
pub mod rasterizer;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

use crate::layout::renderer::RenderedDocument;
use crate::models::resume::ResumeDocument;
use pagination::{image_height_units, paginate};
use rasterizer::Rasterizer;

/// Device pixels per CSS pixel used for the capture.
pub const RASTER_SCALE: f32 = 2.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("capture produced an empty image")]
    EmptyCapture,

    #[error("PDF encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Bytes,
}

/// `"<name with whitespace runs replaced by _>_Resume.pdf"`. Control characters count
/// as whitespace.
pub fn sanitize_file_name(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        "Untitled_Resume.pdf".to_string()
    } else {
        format!("{stem}_Resume.pdf")
    }
}

/// `Content-Disposition` value for a download. The quoted `filename` is an ASCII
/// fallback with anything outside `[A-Za-z0-9._-]` replaced by `_`; the exact name
/// travels in `filename*` (RFC 5987).
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

/// Captures `rendered` and writes it as a multi-page PDF named after the document owner.
pub async fn export_to_pdf(
    document: &ResumeDocument,
    rendered: &RenderedDocument,
    rasterizer: &dyn Rasterizer,
) -> Result<ExportedFile, ExportError> {
    let bitmap = rasterizer.rasterize(rendered, RASTER_SCALE).await?;
    if bitmap.width == 0 || bitmap.height == 0 {
        return Err(ExportError::EmptyCapture);
    }

    let image_height = image_height_units(bitmap.width, bitmap.height);
    let placements = paginate(image_height);
    let page_count = placements.len();
    debug!(
        width = bitmap.width,
        height = bitmap.height,
        image_height,
        page_count,
        "Captured resume"
    );

    let bytes = tokio::task::spawn_blocking(move || {
        pdf::write_pdf(&bitmap, image_height, &placements)
    })
    .await
    .map_err(|e| ExportError::Encode(format!("PDF task failed: {e}")))??;

    let file_name = sanitize_file_name(&document.personal_info.name);
    info!(file_name = %file_name, page_count, size = bytes.len(), "Exported resume PDF");

    Ok(ExportedFile {
        file_name,
        page_count,
        bytes: Bytes::from(bytes),
    })
}

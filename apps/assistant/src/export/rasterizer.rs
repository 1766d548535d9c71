//! Rasterizer: captures a `RenderedDocument` into an RGB bitmap.
//!
//! Pluggable: `AppState` holds an `Arc<dyn Rasterizer>`. A host with a real text
//! engine (e.g. a headless browser capture) can swap in its own implementation
//! without touching the export pipeline or the handlers.
//!
//! Default: `BlockRasterizer`, a pure-Rust proof renderer that paints every laid-out
//! block (tag fills, bullet markers, one band per text line sized from the font
//! metrics). Painting is CPU-bound and runs inside `spawn_blocking`.

use async_trait::async_trait;

use crate::export::ExportError;
use crate::layout::font_metrics::get_metrics;
use crate::layout::renderer::{BlockKind, RenderedDocument};

/// Refuse captures larger than this many pixels.
const MAX_PIXELS: u64 = 64_000_000;

const BACKGROUND: [u8; 3] = [255, 255, 255];
const INK: [u8; 3] = [17, 24, 39];
const MUTED_INK: [u8; 3] = [107, 114, 128];
const TAG_FILL: [u8; 3] = [209, 250, 229];
const TAG_INK: [u8; 3] = [4, 120, 87];

/// Row-major 8-bit RGB bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len * 3);
        for _ in 0..len {
            pixels.extend_from_slice(&background);
        }
        Bitmap {
            width,
            height,
            pixels,
        }
    }

    /// Fills the rectangle, clipped to the bitmap bounds.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]) {
        let clamp_x = |v: f32| (v.max(0.0) as u32).min(self.width);
        let clamp_y = |v: f32| (v.max(0.0) as u32).min(self.height);
        let (x0, x1) = (clamp_x(x.floor()), clamp_x((x + w).ceil()));
        let (y0, y1) = (clamp_y(y.floor()), clamp_y((y + h).ceil()));

        for row in y0..y1 {
            let start = (row as usize * self.width as usize + x0 as usize) * 3;
            let end = (row as usize * self.width as usize + x1 as usize) * 3;
            for px in self.pixels[start..end].chunks_exact_mut(3) {
                px.copy_from_slice(&color);
            }
        }
    }
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Captures the document at `scale` device pixels per CSS pixel.
    async fn rasterize(&self, document: &RenderedDocument, scale: f32)
        -> Result<Bitmap, ExportError>;
}

pub struct BlockRasterizer;

#[async_trait]
impl Rasterizer for BlockRasterizer {
    async fn rasterize(
        &self,
        document: &RenderedDocument,
        scale: f32,
    ) -> Result<Bitmap, ExportError> {
        let document = document.clone();
        tokio::task::spawn_blocking(move || paint(&document, scale))
            .await
            .map_err(|e| ExportError::Rasterize(format!("raster task failed: {e}")))?
    }
}

/// Paints every block of the document. Pure; used directly by tests.
pub fn paint(document: &RenderedDocument, scale: f32) -> Result<Bitmap, ExportError> {
    let width = (document.width * scale).ceil() as u32;
    let height = (document.height * scale).ceil() as u32;
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCapture);
    }
    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        return Err(ExportError::Rasterize(format!(
            "capture of {width}x{height}px exceeds the {MAX_PIXELS} pixel limit"
        )));
    }

    let metrics = get_metrics(document.style.font);
    let mut bitmap = Bitmap::new(width, height, BACKGROUND);

    for block in &document.blocks {
        let ink = match block.kind {
            BlockKind::Contact | BlockKind::EntryMeta => MUTED_INK,
            BlockKind::Tag => TAG_INK,
            _ => INK,
        };
        let mut text_x = block.x;
        let mut text_y = block.y;

        match block.kind {
            BlockKind::Tag => {
                bitmap.fill_rect(
                    block.x * scale,
                    block.y * scale,
                    block.width * scale,
                    block.height * scale,
                    TAG_FILL,
                );
                text_x += (block.width - metrics.width_px(&block.lines[0], block.font_px)) / 2.0;
                text_y += (block.height - block.line_height_px) / 2.0;
            }
            BlockKind::Bullet => {
                let dot = block.font_px * 0.3;
                let dot_y = block.y + (block.line_height_px - dot) / 2.0;
                bitmap.fill_rect(
                    (block.x - 10.0) * scale,
                    dot_y * scale,
                    dot * scale,
                    dot * scale,
                    ink,
                );
            }
            _ => {}
        }

        // Bold text gets a taller band.
        let band = block.font_px * if block.bold { 0.75 } else { 0.6 };
        for (i, line) in block.lines.iter().enumerate() {
            let line_top = text_y + i as f32 * block.line_height_px;
            let band_top = line_top + (block.line_height_px - band) / 2.0;
            bitmap.fill_rect(
                text_x * scale,
                band_top * scale,
                metrics.width_px(line, block.font_px) * scale,
                band * scale,
                ink,
            );
        }
    }

    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::renderer::{render, StyleConfig};
    use crate::models::resume::ResumeDocument;

    impl Bitmap {
        fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
            if x >= self.width || y >= self.height {
                return None;
            }
            let i = (y as usize * self.width as usize + x as usize) * 3;
            Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
        }
    }

    #[test]
    fn test_bitmap_dimensions_follow_scale() {
        let rendered = render(&ResumeDocument::seed(), &StyleConfig::default());
        let bitmap = paint(&rendered, 2.0).unwrap();
        assert_eq!(bitmap.width, (rendered.width * 2.0).ceil() as u32);
        assert_eq!(bitmap.height, (rendered.height * 2.0).ceil() as u32);
        assert_eq!(bitmap.pixels.len(), (bitmap.width * bitmap.height * 3) as usize);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut bitmap = Bitmap::new(4, 4, BACKGROUND);
        bitmap.fill_rect(-2.0, 2.0, 100.0, 100.0, INK);
        assert_eq!(bitmap.pixel(0, 0), Some(BACKGROUND));
        assert_eq!(bitmap.pixel(3, 3), Some(INK));
        assert_eq!(bitmap.pixel(4, 0), None);
    }

    #[test]
    fn test_paint_marks_ink_under_name_block() {
        let rendered = render(&ResumeDocument::seed(), &StyleConfig::default());
        let name = &rendered.blocks[0];
        let bitmap = paint(&rendered, 1.0).unwrap();
        let center_y = (name.y + name.line_height_px / 2.0) as u32;
        let x = (name.x + 2.0) as u32;
        assert_eq!(bitmap.pixel(x, center_y), Some(INK));
    }

    #[test]
    fn test_zero_sized_document_is_empty_capture() {
        let mut rendered = render(&ResumeDocument::seed(), &StyleConfig::default());
        rendered.height = 0.0;
        assert!(matches!(paint(&rendered, 2.0), Err(ExportError::EmptyCapture)));
    }

    #[test]
    fn test_oversized_capture_is_rejected() {
        let mut rendered = render(&ResumeDocument::seed(), &StyleConfig::default());
        rendered.height = 1_000_000.0;
        assert!(matches!(paint(&rendered, 2.0), Err(ExportError::Rasterize(_))));
    }

    #[tokio::test]
    async fn test_block_rasterizer_runs_off_thread() {
        let rendered = render(&ResumeDocument::seed(), &StyleConfig::default());
        let bitmap = BlockRasterizer.rasterize(&rendered, 2.0).await.unwrap();
        assert!(bitmap.width > 0 && bitmap.height > 0);
    }
}

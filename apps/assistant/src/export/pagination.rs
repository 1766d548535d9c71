//! Page geometry for slicing one tall capture across A4 pages.
//!
//! Units are millimetres. The capture is scaled to the full page width (210) and
//! each page advances the image by 295, slightly less than the 297 A4 height, so
//! consecutive pages never drop a row at the seam.

use serde::{Deserialize, Serialize};

pub const PAGE_WIDTH_UNITS: f64 = 210.0;
pub const PAGE_HEIGHT_UNITS: f64 = 295.0;
/// Physical A4 height; the PDF media box uses it.
pub const MEDIA_HEIGHT_UNITS: f64 = 297.0;

/// Where the capture sits on one page. `offset_y` is the distance from the page top
/// to the image top; zero on the first page, negative afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePlacement {
    pub index: usize,
    pub offset_y: f64,
}

/// Height of a `width_px × height_px` capture once scaled to the page width.
pub fn image_height_units(width_px: u32, height_px: u32) -> f64 {
    if width_px == 0 {
        return 0.0;
    }
    f64::from(height_px) * PAGE_WIDTH_UNITS / f64::from(width_px)
}

/// Lays the image out across pages, shifting it up one page height per page until
/// no height remains. Always yields at least one page.
pub fn paginate(image_height: f64) -> Vec<PagePlacement> {
    let mut pages = vec![PagePlacement {
        index: 0,
        offset_y: 0.0,
    }];
    let mut remaining = image_height - PAGE_HEIGHT_UNITS;
    while remaining > 0.0 {
        let index = pages.len();
        pages.push(PagePlacement {
            index,
            offset_y: -(index as f64) * PAGE_HEIGHT_UNITS,
        });
        remaining -= PAGE_HEIGHT_UNITS;
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_height_scales_to_page_width() {
        // 1588 x 2246 px (A4 at 2x) → 210 x ~297 units
        let height = image_height_units(1588, 2246);
        assert!((height - 297.0).abs() < 0.1, "got {height}");
        assert_eq!(image_height_units(0, 100), 0.0);
    }

    #[test]
    fn test_short_document_is_one_page() {
        let pages = paginate(120.0);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].offset_y, 0.0);
    }

    #[test]
    fn test_empty_document_still_produces_one_page() {
        assert_eq!(paginate(0.0).len(), 1);
    }

    #[test]
    fn test_page_count_is_ceil_of_height_over_page_height() {
        for height in [1.0, 294.9, 295.0, 295.1, 590.0, 600.0, 1000.0, 2950.0, 2950.5] {
            let expected = ((height / PAGE_HEIGHT_UNITS).ceil() as usize).max(1);
            assert_eq!(paginate(height).len(), expected, "height {height}");
        }
    }

    #[test]
    fn test_offsets_step_by_page_height() {
        let pages = paginate(700.0);
        let offsets: Vec<f64> = pages.iter().map(|p| p.offset_y).collect();
        assert_eq!(offsets, vec![0.0, -295.0, -590.0]);
        assert!(pages.iter().enumerate().all(|(i, p)| p.index == i));
    }
}

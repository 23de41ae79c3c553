// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview rendering and the mapping from preview coordinates back to image
// pixels.
//
// The preview is drawn centred in a square viewport the size of the bounding
// box, so a non-square image sits inside a letterbox. Pointer positions are
// reported relative to the viewport; the letterbox offset is removed before
// scaling up to image pixels.

use base64::{Engine as _, engine::general_purpose};
use image::DynamicImage;
use photopress_core::CropRect;
use photopress_core::error::Result;
use photopress_document::ImageProcessor;
use photopress_document::image::{fit_within, preview_size};
use tracing::{debug, instrument};

/// A pointer position in viewport pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sizes needed to place the preview and map pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewGeometry {
    /// Full-resolution image size.
    pub image_width: u32,
    pub image_height: u32,
    /// Scaled preview size.
    pub preview_width: u32,
    pub preview_height: u32,
    /// Side of the square viewport the preview is centred in.
    pub viewport: u32,
}

impl PreviewGeometry {
    pub fn new(image_width: u32, image_height: u32, bounding_box: u32) -> Self {
        let (preview_width, preview_height) = preview_size(image_width, image_height, bounding_box);
        Self {
            image_width,
            image_height,
            preview_width,
            preview_height,
            viewport: bounding_box.max(preview_width).max(preview_height),
        }
    }

    /// Top-left corner of the preview inside the viewport.
    pub fn offset(&self) -> (f64, f64) {
        (
            (self.viewport - self.preview_width) as f64 / 2.0,
            (self.viewport - self.preview_height) as f64 / 2.0,
        )
    }

    /// Image pixel under `point`. Points in the letterbox snap to the nearest
    /// image edge; coordinates are truncated.
    pub fn to_image(&self, point: ScreenPoint) -> (u32, u32) {
        let (offset_x, offset_y) = self.offset();
        let map = |screen: f64, offset: f64, preview: u32, image: u32| -> u32 {
            let local = (screen - offset).clamp(0.0, preview as f64);
            let scaled = (local * image as f64 / preview as f64) as u32;
            scaled.min(image)
        };
        (
            map(point.x, offset_x, self.preview_width, self.image_width),
            map(point.y, offset_y, self.preview_height, self.image_height),
        )
    }

    /// Crop rectangle in image pixels for a drag between two viewport points,
    /// in either order.
    pub fn crop_rect(&self, start: ScreenPoint, end: ScreenPoint) -> CropRect {
        CropRect::from_corners(self.to_image(start), self.to_image(end))
    }
}

/// The rendered preview of the selected image.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// `data:image/png;base64,...`, ready for an `<img src>`.
    pub data_url: String,
    pub geometry: PreviewGeometry,
}

/// Scale `image` into a `bounding_box` square and encode it for display.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn render_preview(image: &DynamicImage, bounding_box: u32) -> Result<Preview> {
    let geometry = PreviewGeometry::new(image.width(), image.height(), bounding_box);
    let scaled = ImageProcessor::from_dynamic(fit_within(image, bounding_box));
    let png = scaled.to_png_bytes()?;
    debug!(bytes = png.len(), "Preview encoded");

    Ok(Preview {
        data_url: format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png)),
        geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn landscape_is_letterboxed_vertically() {
        let geometry = PreviewGeometry::new(600, 300, 300);
        assert_eq!((geometry.preview_width, geometry.preview_height), (300, 150));
        assert_eq!(geometry.offset(), (0.0, 75.0));
    }

    #[test]
    fn pointer_maps_through_the_letterbox() {
        let geometry = PreviewGeometry::new(600, 300, 300);
        // Top-left of the drawn image.
        assert_eq!(geometry.to_image(ScreenPoint::new(0.0, 75.0)), (0, 0));
        // Bottom-right of the drawn image.
        assert_eq!(geometry.to_image(ScreenPoint::new(300.0, 225.0)), (600, 300));
        // Inside the letterbox bands.
        assert_eq!(geometry.to_image(ScreenPoint::new(150.0, 10.0)), (300, 0));
        assert_eq!(geometry.to_image(ScreenPoint::new(150.0, 290.0)), (300, 300));
    }

    #[test]
    fn portrait_offset_is_horizontal() {
        let geometry = PreviewGeometry::new(100, 400, 300);
        assert_eq!((geometry.preview_width, geometry.preview_height), (75, 300));
        assert_eq!(geometry.offset(), (112.5, 0.0));
        assert_eq!(geometry.to_image(ScreenPoint::new(150.0, 150.0)), (50, 200));
    }

    #[test]
    fn crop_rect_scales_and_normalises() {
        let geometry = PreviewGeometry::new(600, 300, 300);
        let rect = geometry.crop_rect(ScreenPoint::new(200.0, 175.0), ScreenPoint::new(50.0, 100.0));
        assert_eq!(rect, CropRect::new(100, 50, 300, 150));
    }

    #[test]
    fn fractional_positions_truncate() {
        let geometry = PreviewGeometry::new(1000, 1000, 300);
        // 100.9 * 1000 / 300 = 336.33
        assert_eq!(geometry.to_image(ScreenPoint::new(100.9, 0.0)), (336, 0));
    }

    #[test]
    fn render_produces_png_data_url() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 40, Rgb([9, 9, 9])));
        let preview = render_preview(&image, 300).expect("render");
        assert!(preview.data_url.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(preview.geometry.image_width, 120);
        assert_eq!((preview.geometry.preview_width, preview.geometry.preview_height), (300, 100));
    }
}

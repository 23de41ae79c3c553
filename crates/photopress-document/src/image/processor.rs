// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — quarter-turn rotation, flips, crop, preview scaling and
// RGB flattening. Operates on in-memory images using the `image` crate.

use image::{DynamicImage, ImageFormat, RgbImage};
use photopress_core::error::PhotopressError;
use photopress_core::{CropRect, FlipAxis, Rotation};
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transform consumes `self` and returns a new `ImageProcessor` wrapping
/// the transformed image, so edits chain:
///
/// ```ignore
/// let page = ImageProcessor::open("photo.jpg")?
///     .rotate(Rotation::Clockwise)
///     .flip(FlipAxis::Horizontal)
///     .crop(CropRect::new(10, 10, 400, 300))?
///     .flatten_to_rgb();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file. The format is sniffed from the extension and
    /// contents.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, PhotopressError> {
        let img = image::open(path.as_ref()).map_err(|err| PhotopressError::Decode {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Rotate by a quarter turn. The canvas swaps width and height so nothing
    /// is clipped, and no pixel is resampled.
    #[instrument(skip(self), fields(degrees = rotation.degrees()))]
    pub fn rotate(self, rotation: Rotation) -> Self {
        let image = match rotation {
            Rotation::Clockwise => self.image.rotate90(),
            Rotation::CounterClockwise => self.image.rotate270(),
        };
        debug!(new_w = image.width(), new_h = image.height(), "Rotation applied");
        Self { image }
    }

    /// Mirror the image along `axis`.
    #[instrument(skip(self))]
    pub fn flip(self, axis: FlipAxis) -> Self {
        let image = match axis {
            FlipAxis::Horizontal => self.image.fliph(),
            FlipAxis::Vertical => self.image.flipv(),
        };
        Self { image }
    }

    /// Crop to `rect`, clamped to the image bounds.
    ///
    /// Fails with [`PhotopressError::EmptyCrop`] when the clamped rectangle has
    /// no area; a zero-sized image is never produced.
    #[instrument(skip(self), fields(x = rect.x, y = rect.y, width = rect.width, height = rect.height))]
    pub fn crop(self, rect: CropRect) -> Result<Self, PhotopressError> {
        let safe = rect
            .clamped_to(self.image.width(), self.image.height())
            .ok_or(PhotopressError::EmptyCrop)?;

        info!(
            safe_x = safe.x,
            safe_y = safe.y,
            safe_w = safe.width,
            safe_h = safe.height,
            "Cropping image"
        );

        let cropped = self.image.crop_imm(safe.x, safe.y, safe.width, safe.height);
        Ok(Self { image: cropped })
    }

    // -- Output ---------------------------------------------------------------

    /// Convert to 8-bit RGB. See [`flatten_to_rgb`].
    pub fn flatten_to_rgb(&self) -> RgbImage {
        flatten_to_rgb(&self.image)
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, PhotopressError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }
}

/// Preview dimensions for an image of `width` x `height` inside a square
/// `bounding_box`, aspect ratio preserved.
///
/// Landscape images (aspect ratio > 1) take the full box width; everything
/// else takes the full box height. Small images are scaled up to the box.
/// Neither side is ever less than one pixel.
pub fn preview_size(width: u32, height: u32, bounding_box: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (bounding_box.max(1), bounding_box.max(1));
    }
    let aspect = width as f64 / height as f64;
    let (w, h) = if aspect > 1.0 {
        (bounding_box, (bounding_box as f64 / aspect) as u32)
    } else {
        ((bounding_box as f64 * aspect) as u32, bounding_box)
    };
    (w.max(1), h.max(1))
}

/// Scaled copy of `image` at [`preview_size`] for `bounding_box`, using
/// Lanczos3 filtering. The source is left untouched.
#[instrument(skip(image))]
pub fn fit_within(image: &DynamicImage, bounding_box: u32) -> DynamicImage {
    let (w, h) = preview_size(image.width(), image.height(), bounding_box);
    debug!(
        from_w = image.width(),
        from_h = image.height(),
        w,
        h,
        "Scaling for preview"
    );
    image.resize_exact(w, h, image::imageops::FilterType::Lanczos3)
}

/// Convert any colour mode to 8-bit RGB. Transparent and translucent pixels
/// are composited over white; palette images arrive here already expanded by
/// the decoder.
pub fn flatten_to_rgb(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let over_white = |channel: u8| -> u8 {
            let alpha = a as u32;
            ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        image::Rgb([over_white(r), over_white(g), over_white(b)])
    })
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, PhotopressError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        PhotopressError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    /// Every pixel distinct, so any transform is visible.
    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 40) as u8, (y * 60) as u8, (x + y * width) as u8])
        }))
    }

    #[test]
    fn rotate_then_counter_rotate_restores_dimensions_and_pixels() {
        let original = gradient(4, 2);
        let rotated = ImageProcessor::from_dynamic(original.clone()).rotate(Rotation::Clockwise);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));

        let back = rotated.rotate(Rotation::CounterClockwise);
        assert_eq!((back.width(), back.height()), (4, 2));
        assert_eq!(back.as_dynamic().to_rgb8(), original.to_rgb8());
    }

    #[test]
    fn four_clockwise_turns_are_identity() {
        let original = gradient(5, 3);
        let mut processor = ImageProcessor::from_dynamic(original.clone());
        for _ in 0..4 {
            processor = processor.rotate(Rotation::Clockwise);
        }
        assert_eq!((processor.width(), processor.height()), (5, 3));
        assert_eq!(processor.as_dynamic().to_rgb8(), original.to_rgb8());
    }

    #[test]
    fn clockwise_moves_top_left_to_top_right() {
        let original = gradient(4, 2);
        let top_left = *original.to_rgb8().get_pixel(0, 0);
        let rotated = ImageProcessor::from_dynamic(original)
            .rotate(Rotation::Clockwise)
            .into_dynamic()
            .to_rgb8();
        // After a clockwise quarter turn the old left column is the new top row,
        // read right to left.
        assert_eq!(*rotated.get_pixel(rotated.width() - 1, 0), top_left);
    }

    #[test]
    fn horizontal_flip_twice_is_identity() {
        let original = gradient(4, 3);
        let once = ImageProcessor::from_dynamic(original.clone()).flip(FlipAxis::Horizontal);
        assert_ne!(once.as_dynamic().to_rgb8(), original.to_rgb8());
        let twice = once.flip(FlipAxis::Horizontal);
        assert_eq!(twice.as_dynamic().to_rgb8(), original.to_rgb8());
    }

    #[test]
    fn vertical_flip_swaps_rows() {
        let original = gradient(3, 2).to_rgb8();
        let flipped = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(original.clone()))
            .flip(FlipAxis::Vertical)
            .into_dynamic()
            .to_rgb8();
        assert_eq!(flipped.get_pixel(1, 0), original.get_pixel(1, 1));
    }

    #[test]
    fn crop_extracts_sub_region() {
        let original = gradient(10, 8);
        let cropped = ImageProcessor::from_dynamic(original.clone())
            .crop(CropRect::new(2, 3, 4, 5))
            .expect("crop");
        assert_eq!((cropped.width(), cropped.height()), (4, 5));
        assert_eq!(
            cropped.as_dynamic().to_rgb8().get_pixel(0, 0),
            original.to_rgb8().get_pixel(2, 3)
        );
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let cropped = ImageProcessor::from_dynamic(gradient(10, 8))
            .crop(CropRect::new(6, 6, 100, 100))
            .expect("crop");
        assert_eq!((cropped.width(), cropped.height()), (4, 2));
    }

    #[test]
    fn zero_area_crop_is_rejected() {
        let result = ImageProcessor::from_dynamic(gradient(10, 8)).crop(CropRect::new(3, 3, 0, 4));
        assert!(matches!(result, Err(PhotopressError::EmptyCrop)));

        let outside = ImageProcessor::from_dynamic(gradient(10, 8)).crop(CropRect::new(10, 0, 5, 5));
        assert!(matches!(outside, Err(PhotopressError::EmptyCrop)));
    }

    #[test]
    fn preview_size_landscape_uses_width() {
        assert_eq!(preview_size(4000, 3000, 300), (300, 225));
    }

    #[test]
    fn preview_size_portrait_and_square_use_height() {
        assert_eq!(preview_size(3000, 4000, 300), (225, 300));
        assert_eq!(preview_size(500, 500, 300), (300, 300));
    }

    #[test]
    fn preview_size_upscales_small_images_and_never_hits_zero() {
        assert_eq!(preview_size(30, 10, 300), (300, 100));
        assert_eq!(preview_size(10_000, 1, 300), (300, 1));
    }

    #[test]
    fn fit_within_produces_preview_dimensions() {
        let source = gradient(40, 20);
        let preview = fit_within(&source, 300);
        assert_eq!((preview.width(), preview.height()), (300, 150));
        assert_eq!((source.width(), source.height()), (40, 20));
    }

    #[test]
    fn flatten_composites_alpha_over_white() {
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let rgb = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(rgba)).flatten_to_rgb();
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([10, 20, 30]));
        assert_eq!(*rgb.get_pixel(1, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn flatten_keeps_opaque_rgb_unchanged() {
        let original = gradient(3, 3);
        let rgb = ImageProcessor::from_dynamic(original.clone()).flatten_to_rgb();
        assert_eq!(rgb, original.to_rgb8());
    }

    #[test]
    fn flatten_expands_grayscale() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(1, 1, image::Luma([77])));
        let rgb = ImageProcessor::from_dynamic(gray).flatten_to_rgb();
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([77, 77, 77]));
    }

    #[test]
    fn png_bytes_decode_back() {
        let bytes = ImageProcessor::from_dynamic(gradient(6, 4))
            .to_png_bytes()
            .expect("encode");
        let decoded = image::load_from_memory(&bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
    }

    #[test]
    fn open_missing_file_reports_path() {
        let err = match ImageProcessor::open("/definitely/not/here.png") {
            Err(err) => err,
            Ok(_) => panic!("opening a missing file must fail"),
        };
        match err {
            PhotopressError::Decode { path, .. } => assert!(path.contains("not/here.png")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — bind an ordered sequence of images into one multi-page PDF
// using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use photopress_core::PageLayout;
use photopress_core::error::PhotopressError;
use printpdf::{
    ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::flatten_to_rgb;

/// Millimetres per inch.
const MM_PER_INCH: f32 = 25.4;

/// Binds raster images into a PDF, one image per page.
pub struct PdfWriter {
    /// How each image is placed on its page.
    layout: PageLayout,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer using the given page layout.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Encode `images` as a PDF, first image on page one, in iteration order.
    ///
    /// Every image is flattened to 8-bit RGB first. An empty sequence is an
    /// error: a zero-page document is never produced.
    #[instrument(skip_all, fields(layout = ?self.layout))]
    pub fn create_from_images<'a>(
        &self,
        images: impl IntoIterator<Item = &'a DynamicImage>,
    ) -> Result<Vec<u8>, PhotopressError> {
        let title = self.title.as_deref().unwrap_or("Photopress Document");
        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::new();

        for (index, image) in images.into_iter().enumerate() {
            if image.width() == 0 || image.height() == 0 {
                return Err(PhotopressError::PdfError(format!(
                    "image {} has no pixels ({}x{})",
                    index + 1,
                    image.width(),
                    image.height()
                )));
            }

            let rgb_image = flatten_to_rgb(image);
            let (img_width, img_height) = (rgb_image.width() as usize, rgb_image.height() as usize);
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let placement = self.place(img_width as f32, img_height as f32);
            debug!(
                page = index + 1,
                img_width,
                img_height,
                page_w_mm = placement.page_w.0,
                page_h_mm = placement.page_h.0,
                "Image placed on page"
            );

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(placement.x_offset_pt)),
                    translate_y: Some(Pt(placement.y_offset_pt)),
                    scale_x: Some(placement.scale),
                    scale_y: Some(placement.scale),
                    dpi: Some(placement.dpi),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(placement.page_w, placement.page_h, ops));
        }

        if pages.is_empty() {
            return Err(PhotopressError::NoImages);
        }

        info!(pages = pages.len(), title, "Creating photo PDF");
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&save_options(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        Ok(output)
    }

    /// Encode `images` and write the PDF to `path`.
    ///
    /// The document is fully encoded in memory, written to a sibling `.part`
    /// file and renamed over `path`. On failure the partial file is removed
    /// and `path` is left as it was.
    pub fn write_images_to_file<'a>(
        &self,
        images: impl IntoIterator<Item = &'a DynamicImage>,
        path: impl AsRef<Path>,
    ) -> Result<(), PhotopressError> {
        let bytes = self.create_from_images(images)?;
        let path = path.as_ref();
        let partial = partial_path(path);

        let written = std::fs::write(&partial, &bytes).and_then(|()| std::fs::rename(&partial, path));
        if let Err(err) = written {
            if let Err(cleanup) = std::fs::remove_file(&partial) {
                debug!(error = %cleanup, "No partial file to clean up");
            }
            return Err(PhotopressError::Io(err));
        }

        info!(bytes = bytes.len(), "Wrote photo PDF to {}", path.display());
        Ok(())
    }

    /// Page size in points that an image of `width` x `height` pixels gets.
    pub fn page_size_pt(&self, width: u32, height: u32) -> (f32, f32) {
        let placement = self.place(width as f32, height as f32);
        (placement.page_w.into_pt().0, placement.page_h.into_pt().0)
    }

    /// Page size and image transform for an image of `width` x `height` pixels.
    fn place(&self, width: f32, height: f32) -> Placement {
        match self.layout {
            PageLayout::ImageSize { dpi } => Placement {
                page_w: Mm(width / dpi * MM_PER_INCH),
                page_h: Mm(height / dpi * MM_PER_INCH),
                x_offset_pt: 0.0,
                y_offset_pt: 0.0,
                scale: 1.0,
                dpi,
            },
            PageLayout::Fit { paper, margin_mm } => {
                let (w_mm, h_mm) = paper.dimensions_mm();
                let (page_w, page_h) = (Mm(w_mm as f32), Mm(h_mm as f32));

                let usable_w_pt = Mm(page_w.0 - 2.0 * margin_mm).into_pt().0;
                let usable_h_pt = Mm(page_h.0 - 2.0 * margin_mm).into_pt().0;

                // Image native size at a print resolution of 150 DPI.
                let dpi: f32 = 150.0;
                let img_w_pt = width / dpi * 72.0;
                let img_h_pt = height / dpi * 72.0;

                // Scale to fit while preserving aspect ratio; do not upscale.
                let scale = (usable_w_pt / img_w_pt).min(usable_h_pt / img_h_pt).min(1.0);

                // Centre the image on the page.
                let margin_pt = Mm(margin_mm).into_pt().0;
                Placement {
                    page_w,
                    page_h,
                    x_offset_pt: margin_pt + (usable_w_pt - img_w_pt * scale) / 2.0,
                    y_offset_pt: margin_pt + (usable_h_pt - img_h_pt * scale) / 2.0,
                    scale,
                    dpi,
                }
            }
        }
    }
}

/// Where one image lands on its page.
struct Placement {
    page_w: Mm,
    page_h: Mm,
    x_offset_pt: f32,
    y_offset_pt: f32,
    scale: f32,
    dpi: f32,
}

/// Lossless Flate for every image. printpdf's defaults would downscale large
/// photos, turn grey-looking photos into greyscale and may re-encode as JPEG.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: None,
            max_image_size: None,
            dither_greyscale: Some(false),
            convert_to_greyscale: Some(false),
            auto_optimize: Some(false),
            format: Some(ImageCompression::Flate),
        }),
        ..PdfSaveOptions::default()
    }
}

/// `photos.pdf` -> `photos.pdf.part`, in the same directory so the final
/// rename never crosses filesystems.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use photopress_core::PaperSize;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 100, 50])))
    }

    #[test]
    fn one_page_per_image_in_order() {
        let images = [solid(40, 20), solid(10, 30), solid(25, 25)];
        let bytes = PdfWriter::new(PageLayout::default())
            .create_from_images(images.iter())
            .expect("encode");

        let reader = PdfReader::from_bytes(&bytes).expect("parse");
        assert_eq!(reader.page_count(), 3);

        // At 72 DPI one pixel is one point.
        let expected = [(40.0, 20.0), (10.0, 30.0), (25.0, 25.0)];
        for (page, (w, h)) in expected.iter().enumerate() {
            let (pw, ph) = reader.page_size_pt(page as u32 + 1).expect("media box");
            assert!((pw - w).abs() < 0.5, "page {} width {pw}", page + 1);
            assert!((ph - h).abs() < 0.5, "page {} height {ph}", page + 1);
        }
    }

    #[test]
    fn pages_carry_the_flattened_pixels() {
        let gradient = DynamicImage::ImageRgb8(RgbImage::from_fn(6, 4, |x, y| {
            Rgb([(x * 40) as u8, (y * 60) as u8, 7])
        }));
        let translucent = DynamicImage::ImageRgba8(RgbaImage::from_fn(3, 5, |x, _| {
            Rgba([0, 0, 255, if x == 0 { 255 } else { 0 }])
        }));
        let grey = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, image::Luma([90])));
        let images = [gradient, translucent, grey];

        let bytes = PdfWriter::new(PageLayout::default())
            .create_from_images(images.iter())
            .expect("encode");
        let reader = PdfReader::from_bytes(&bytes).expect("parse");

        for (index, image) in images.iter().enumerate() {
            let page = index as u32 + 1;
            let drawn = reader.page_image(page).expect("page image");
            assert_eq!(drawn, flatten_to_rgb(image), "page {page}");
        }
        assert_eq!(reader.page_image(2).expect("page image").get_pixel(2, 0).0, [255, 255, 255]);
    }

    #[test]
    fn large_grey_photo_keeps_its_pixels() {
        // 1200x800 RGB is ~2.9 MB raw, over printpdf's default downscale limit.
        let photo = DynamicImage::ImageRgb8(RgbImage::from_pixel(1200, 800, Rgb([128, 128, 128])));
        let writer = PdfWriter::new(PageLayout::default());
        let bytes = writer.create_from_images([&photo]).expect("encode");

        let reader = PdfReader::from_bytes(&bytes).expect("parse");
        assert_eq!(reader.page_image_size(1).expect("size"), (1200, 800));
        assert_eq!(reader.page_image(1).expect("pixels").get_pixel(600, 400).0, [128, 128, 128]);
        let (pw, ph) = reader.page_size_pt(1).expect("media box");
        let (ew, eh) = writer.page_size_pt(1200, 800);
        assert!((pw - ew).abs() < 0.5 && (ph - eh).abs() < 0.5, "{pw}x{ph} vs {ew}x{eh}");
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = PdfWriter::new(PageLayout::default()).create_from_images(std::iter::empty::<&DynamicImage>());
        assert!(matches!(result, Err(PhotopressError::NoImages)));
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let images = [solid(10, 10), DynamicImage::new_rgb8(0, 0)];
        let result = PdfWriter::new(PageLayout::default()).create_from_images(images.iter());
        assert!(matches!(result, Err(PhotopressError::PdfError(_))));
    }

    #[test]
    fn alpha_images_are_accepted() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
        let bytes = PdfWriter::new(PageLayout::default())
            .create_from_images([&rgba])
            .expect("encode");
        assert_eq!(PdfReader::from_bytes(&bytes).expect("parse").page_count(), 1);
    }

    #[test]
    fn fit_layout_uses_paper_size() {
        let layout = PageLayout::Fit {
            paper: PaperSize::A4,
            margin_mm: 15.0,
        };
        let mut writer = PdfWriter::new(layout);
        writer.set_title("Holiday");
        let bytes = writer.create_from_images([&solid(3000, 2000)]).expect("encode");

        let (w, h) = PdfReader::from_bytes(&bytes)
            .expect("parse")
            .page_size_pt(1)
            .expect("media box");
        // A4 is 595 x 842 pt.
        assert!((w - 595.3).abs() < 1.0, "width {w}");
        assert!((h - 841.9).abs() < 1.0, "height {h}");
    }

    #[test]
    fn fit_layout_never_upscales() {
        let writer = PdfWriter::new(PageLayout::Fit {
            paper: PaperSize::A4,
            margin_mm: 15.0,
        });
        let small = writer.place(150.0, 150.0);
        assert_eq!(small.scale, 1.0);
        let large = writer.place(6000.0, 1000.0);
        assert!(large.scale < 1.0);
    }

    #[test]
    fn writes_file_without_leaving_partial() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("album.pdf");
        PdfWriter::new(PageLayout::default())
            .write_images_to_file([&solid(10, 10), &solid(20, 10)], &dest)
            .expect("write");

        assert_eq!(PdfReader::open(&dest).expect("open").page_count(), 2);
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn unwritable_destination_leaves_nothing_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("missing-folder").join("album.pdf");
        let result = PdfWriter::new(PageLayout::default()).write_images_to_file([&solid(4, 4)], &dest);
        assert!(matches!(result, Err(PhotopressError::Io(_))));
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn partial_path_is_a_sibling() {
        let partial = partial_path(Path::new("/tmp/out/photos.pdf"));
        assert_eq!(partial, PathBuf::from("/tmp/out/photos.pdf.part"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export — resolve every listed photo through the edit overlay, bind them into
// one PDF in list order, and re-open the result to confirm every page holds
// its photo.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use photopress_core::error::{PhotopressError, Result};
use photopress_document::{PdfReader, PdfWriter};
use tracing::{info, instrument};

use crate::image_set::ImageSet;
use crate::overlay::EditOverlay;

/// What a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub pages: usize,
}

/// Write `images` to `destination` as a PDF, one page per image.
///
/// Nothing is written when the list is empty or any image fails to load.
#[instrument(skip(images, overlay, writer), fields(destination = %destination.display(), count = images.len()))]
pub fn export_document(
    images: &ImageSet,
    overlay: &EditOverlay,
    writer: &PdfWriter,
    destination: &Path,
) -> Result<ExportReport> {
    if images.is_empty() {
        return Err(PhotopressError::NoImages);
    }

    let pages: Vec<Cow<'_, DynamicImage>> = images
        .iter()
        .map(|image| overlay.resolve(image))
        .collect::<Result<_>>()?;

    writer.write_images_to_file(pages.iter().map(|page| &**page), destination)?;

    let reader = PdfReader::open(destination)?;
    let written = reader.page_count();
    if written != pages.len() {
        return Err(PhotopressError::PageCountMismatch {
            expected: pages.len(),
            actual: written,
        });
    }
    for (index, page) in pages.iter().enumerate() {
        check_page(&reader, writer, index as u32 + 1, page)?;
    }

    info!(pages = written, "PDF saved successfully as {}", destination.display());
    Ok(ExportReport {
        path: destination.to_path_buf(),
        pages: written,
    })
}

/// Page `number` must draw `image` at full resolution on the page size the
/// writer gives it.
fn check_page(reader: &PdfReader, writer: &PdfWriter, number: u32, image: &DynamicImage) -> Result<()> {
    let expected_pixels = (image.width(), image.height());
    let drawn_pixels = reader.page_image_size(number)?;
    let (expected_w, expected_h) = writer.page_size_pt(image.width(), image.height());
    let (page_w, page_h) = reader.page_size_pt(number)?;

    if drawn_pixels != expected_pixels || (page_w - expected_w).abs() > 0.5 || (page_h - expected_h).abs() > 0.5 {
        return Err(PhotopressError::PdfError(format!(
            "page {} holds a {}x{} image on {:.1}x{:.1} pt, expected {}x{} on {:.1}x{:.1} pt",
            number, drawn_pixels.0, drawn_pixels.1, page_w, page_h, expected_pixels.0, expected_pixels.1, expected_w, expected_h
        )));
    }
    Ok(())
}

/// Append `.pdf` to a chosen file name that has no extension.
pub fn with_pdf_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_photo;
    use image::RgbImage;
    use photopress_core::{PageLayout, Rotation};
    use photopress_document::image::flatten_to_rgb;

    fn assert_page(reader: &PdfReader, page: u32, width: f32, height: f32) {
        let (w, h) = reader.page_size_pt(page).expect("media box");
        assert!((w - width).abs() < 0.5, "page {page} width {w}, expected {width}");
        assert!((h - height).abs() < 0.5, "page {page} height {h}, expected {height}");
    }

    fn decoded(path: &Path) -> RgbImage {
        flatten_to_rgb(&image::open(path).unwrap())
    }

    #[test]
    fn pages_follow_list_order_and_edits() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b, c) = (
            write_photo(dir.path(), "a.png", 60, 40),
            write_photo(dir.path(), "b.png", 30, 50),
            write_photo(dir.path(), "c.bmp", 25, 25),
        );
        let mut images = ImageSet::new();
        images.add([a.clone(), b.clone(), c.clone()]);
        let mut overlay = EditOverlay::new();
        let b_ref = images.get(1).unwrap().clone();
        overlay.rotate(&b_ref, Rotation::Clockwise, None).unwrap();

        let dest = dir.path().join("out.pdf");
        let report =
            export_document(&images, &overlay, &PdfWriter::new(PageLayout::default()), &dest).unwrap();
        assert_eq!(report, ExportReport { path: dest.clone(), pages: 3 });

        let reader = PdfReader::open(&dest).unwrap();
        assert_page(&reader, 1, 60.0, 40.0);
        assert_page(&reader, 2, 50.0, 30.0);
        assert_page(&reader, 3, 25.0, 25.0);

        // Pages one and three are the photos as decoded.
        assert_eq!(reader.page_image(1).unwrap(), decoded(&a));
        assert_eq!(reader.page_image(3).unwrap(), decoded(&c));

        // Page two is b turned clockwise: its top-left pixel was b's bottom-left.
        let original = decoded(&b);
        let page_two = reader.page_image(2).unwrap();
        assert_eq!(page_two.dimensions(), (50, 30));
        assert_eq!(page_two.get_pixel(0, 0), original.get_pixel(0, 49));
        assert_eq!(page_two.get_pixel(49, 29), original.get_pixel(29, 0));
    }

    #[test]
    fn empty_list_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");
        let result = export_document(
            &ImageSet::new(),
            &EditOverlay::new(),
            &PdfWriter::new(PageLayout::default()),
            &dest,
        );
        assert!(matches!(result, Err(PhotopressError::NoImages)));
        assert!(!dest.exists());
    }

    #[test]
    fn unreadable_photo_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut images = ImageSet::new();
        images.add([
            write_photo(dir.path(), "a.png", 10, 10),
            dir.path().join("gone.jpg"),
        ]);
        let dest = dir.path().join("out.pdf");
        let result = export_document(
            &images,
            &EditOverlay::new(),
            &PdfWriter::new(PageLayout::default()),
            &dest,
        );
        assert!(matches!(result, Err(PhotopressError::Decode { .. })));
        assert!(!dest.exists());
    }

    #[test]
    fn missing_extension_becomes_pdf() {
        assert_eq!(with_pdf_extension(PathBuf::from("/tmp/album")), PathBuf::from("/tmp/album.pdf"));
        assert_eq!(with_pdf_extension(PathBuf::from("/tmp/album.pdf")), PathBuf::from("/tmp/album.pdf"));
        assert_eq!(with_pdf_extension(PathBuf::from("/tmp/album.PDF")), PathBuf::from("/tmp/album.PDF"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — re-open a written PDF with `lopdf` to check page count, page
// sizes and the image each page draws.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use photopress_core::error::PhotopressError;
use tracing::{debug, info, instrument};

/// Inheritance chains deeper than this are treated as malformed.
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// Read-only view of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PhotopressError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PhotopressError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PhotopressError> {
        let document = Document::load_mem(data).map_err(|err| {
            PhotopressError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of page `page_number` (1-indexed), read
    /// from its /MediaBox. The box may be inherited from an ancestor /Pages
    /// node.
    pub fn page_size_pt(&self, page_number: u32) -> Result<(f32, f32), PhotopressError> {
        let page_id = self.page_id(page_number)?;
        let media_box = self.inherited_media_box(page_id)?;
        let coords = media_box
            .iter()
            .map(|value| value.as_float())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|err| PhotopressError::PdfError(format!("malformed /MediaBox: {}", err)))?;

        match coords.as_slice() {
            [x0, y0, x1, y1] => Ok(((x1 - x0).abs(), (y1 - y0).abs())),
            other => Err(PhotopressError::PdfError(format!(
                "/MediaBox has {} entries, expected 4",
                other.len()
            ))),
        }
    }

    /// Pixel width and height of the image XObject that page `page_number`
    /// paints with its first `Do` operator.
    pub fn page_image_size(&self, page_number: u32) -> Result<(u32, u32), PhotopressError> {
        let stream = self.drawn_image(page_number)?;
        let dimension = |key: &[u8]| {
            stream
                .dict
                .get(key)
                .and_then(Object::as_i64)
                .ok()
                .and_then(|value| u32::try_from(value).ok())
                .ok_or_else(|| {
                    PhotopressError::PdfError(format!(
                        "image on page {} has no usable /{}",
                        page_number,
                        String::from_utf8_lossy(key)
                    ))
                })
        };
        Ok((dimension(b"Width")?, dimension(b"Height")?))
    }

    /// Decoded 8-bit RGB pixels of the image drawn on page `page_number`.
    /// Only uncompressed and Flate/LZW streams are understood.
    #[cfg(any(test, feature = "test-support"))]
    pub fn page_image(&self, page_number: u32) -> Result<image::RgbImage, PhotopressError> {
        let stream = self.drawn_image(page_number)?;
        let (width, height) = self.page_image_size(page_number)?;
        let pixels = if stream.dict.has(b"Filter") {
            stream
                .decompressed_content()
                .map_err(|err| PhotopressError::PdfError(format!("cannot decode image stream: {}", err)))?
        } else {
            stream.content.clone()
        };
        image::RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
            PhotopressError::PdfError(format!("image stream is not {}x{} RGB", width, height))
        })
    }

    // -- Helpers --------------------------------------------------------------

    fn page_id(&self, page_number: u32) -> Result<ObjectId, PhotopressError> {
        let pages = self.document.get_pages();
        pages.get(&page_number).copied().ok_or_else(|| {
            PhotopressError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })
    }

    /// Find the image stream behind the first `Do` in the page content.
    ///
    /// printpdf registers every image in one shared /XObject dictionary, so
    /// the page resources alone do not say which image the page shows.
    fn drawn_image(&self, page_number: u32) -> Result<&Stream, PhotopressError> {
        let page_id = self.page_id(page_number)?;
        let content = self
            .document
            .get_and_decode_page_content(page_id)
            .map_err(|err| PhotopressError::PdfError(format!("cannot read page {}: {}", page_number, err)))?;
        let name = content
            .operations
            .iter()
            .find(|op| op.operator == "Do")
            .and_then(|op| op.operands.first())
            .and_then(|operand| operand.as_name().ok())
            .ok_or_else(|| PhotopressError::PdfError(format!("page {} draws no image", page_number)))?;

        let page = self.dictionary(page_id)?;
        let stream = page
            .get(b"Resources")
            .map(|resources| self.resolve(resources))
            .and_then(Object::as_dict)
            .and_then(|resources| resources.get(b"XObject"))
            .map(|xobjects| self.resolve(xobjects))
            .and_then(Object::as_dict)
            .and_then(|xobjects| xobjects.get(name))
            .map(|xobject| self.resolve(xobject))
            .and_then(Object::as_stream)
            .map_err(|err| {
                PhotopressError::PdfError(format!(
                    "page {} draws /{} which cannot be found: {}",
                    page_number,
                    String::from_utf8_lossy(name),
                    err
                ))
            })?;

        match stream.dict.get(b"Subtype").and_then(Object::as_name) {
            Ok(b"Image") => Ok(stream),
            _ => Err(PhotopressError::PdfError(format!(
                "/{} on page {} is not an image",
                String::from_utf8_lossy(name),
                page_number
            ))),
        }
    }

    /// Walk from a page up the /Parent chain until a /MediaBox is found.
    fn inherited_media_box(&self, page_id: ObjectId) -> Result<&Vec<Object>, PhotopressError> {
        let mut node_id = page_id;
        for _ in 0..MAX_PAGE_TREE_DEPTH {
            let node = self.dictionary(node_id)?;
            if let Ok(media_box) = node.get(b"MediaBox") {
                return self.resolve(media_box).as_array().map_err(|err| {
                    PhotopressError::PdfError(format!("/MediaBox is not an array: {}", err))
                });
            }
            node_id = match node.get(b"Parent") {
                Ok(Object::Reference(parent)) => *parent,
                _ => break,
            };
        }
        Err(PhotopressError::PdfError(format!(
            "no /MediaBox for page object {:?}",
            page_id
        )))
    }

    fn dictionary(&self, id: ObjectId) -> Result<&Dictionary, PhotopressError> {
        self.document
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|err| {
                PhotopressError::PdfError(format!("cannot read object {:?}: {}", id, err))
            })
    }

    /// Follow a single indirect reference, if `object` is one.
    fn resolve<'a>(&'a self, object: &'a Object) -> &'a Object {
        match object {
            Object::Reference(id) => self.document.get_object(*id).unwrap_or(object),
            direct => direct,
        }
    }
}

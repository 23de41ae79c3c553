// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// photopress-document — Image and PDF operations for Photopress.
//
// Provides image processing (quarter-turn rotation, flips, crop, preview
// scaling, RGB flattening), a multi-page photo PDF writer, and a PDF reader
// used to verify written documents.

pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `photopress_document::PdfWriter` etc.
pub use image::processor::ImageProcessor;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;

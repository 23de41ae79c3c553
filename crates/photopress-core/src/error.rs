// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Photopress.

use thiserror::Error;

/// Top-level error type for all Photopress operations.
#[derive(Debug, Error)]
pub enum PhotopressError {
    // -- Empty input --
    #[error("no images selected")]
    NoImages,

    #[error("crop rectangle has no area")]
    EmptyCrop,

    #[error("index {index} out of range (list has {len} images)")]
    IndexOutOfRange { index: usize, len: usize },

    // -- Image errors --
    #[error("failed to open {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("written PDF has {actual} pages, expected {expected}")]
    PageCountMismatch { expected: usize, actual: usize },

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PhotopressError>;

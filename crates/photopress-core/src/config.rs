// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Built from defaults at startup. Nothing here is read from or written to
// disk: a session starts fresh every time.

use serde::{Deserialize, Serialize};

use crate::types::PageLayout;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Side of the square bounding box the preview is fitted into (pixels).
    pub preview_box: u32,
    /// How images are placed on PDF pages.
    pub page_layout: PageLayout,
    /// Title embedded in the PDF /Info dictionary.
    pub document_title: String,
    /// File name proposed by the save dialog.
    pub default_file_name: String,
    /// Extensions offered by the open dialog (lowercase, no dot).
    pub image_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_box: 300,
            page_layout: PageLayout::default(),
            document_title: "Photos".into(),
            default_file_name: "photos.pdf".into(),
            image_extensions: ["png", "jpg", "jpeg", "bmp", "tif", "tiff"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

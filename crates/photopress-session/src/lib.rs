// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// photopress-session — The editing session behind the Photopress window.
//
// Holds the ordered image list, the per-image edit overlay, the crop gesture
// state machine and the current preview, and routes every user action through
// `Session::dispatch`. Nothing here touches the UI toolkit.

pub mod crop;
pub mod export;
pub mod image_set;
pub mod overlay;
pub mod preview;
pub mod session;

pub use crop::{CropSession, CropState};
pub use export::{ExportReport, export_document, with_pdf_extension};
pub use image_set::ImageSet;
pub use overlay::EditOverlay;
pub use preview::{Preview, PreviewGeometry, ScreenPoint, render_preview};
pub use session::{Action, Outcome, Session};

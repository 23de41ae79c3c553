// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session — all state behind one Photopress window, and the single entry
// point (`Session::dispatch`) through which the UI changes it.
//
// After every action that can change what the selected photo looks like, the
// preview is re-rendered from the edit overlay. A failed render leaves the
// previous preview in place.

use std::borrow::Cow;
use std::path::PathBuf;

use image::DynamicImage;
use photopress_core::error::Result;
use photopress_core::{AppConfig, FlipAxis, ImageRef, MoveDirection, PhotopressError, Rotation};
use photopress_document::PdfWriter;
use tracing::{debug, info, instrument, warn};

use crate::crop::CropSession;
use crate::export::{ExportReport, export_document, with_pdf_extension};
use crate::image_set::ImageSet;
use crate::overlay::EditOverlay;
use crate::preview::{Preview, ScreenPoint, render_preview};

/// Everything the user can do in the window.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Files picked in the open dialog.
    AddImages(Vec<PathBuf>),
    /// Click on a list row; `None` clears the selection.
    Select(Option<usize>),
    RemoveSelected,
    Move(MoveDirection),
    Rotate(Rotation),
    Flip(FlipAxis),
    ToggleCrop,
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    PointerUp(ScreenPoint),
    /// Pointer left the preview area.
    PointerLeave,
    /// Destination picked in the save dialog.
    Export(PathBuf),
}

/// What an action did, for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do (no selection, pointer outside a drag, ...).
    Unchanged,
    Updated,
    Exported(ExportReport),
}

pub struct Session {
    config: AppConfig,
    images: ImageSet,
    overlay: EditOverlay,
    selection: Option<usize>,
    crop: CropSession,
    preview: Option<Preview>,
    /// Full-size decode behind the preview while the selected photo is
    /// unedited. Its first edit starts from this rather than the file.
    shown: Option<(ImageRef, DynamicImage)>,
    writer: PdfWriter,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let mut writer = PdfWriter::new(config.page_layout);
        writer.set_title(config.document_title.clone());
        Self {
            config,
            images: ImageSet::new(),
            overlay: EditOverlay::new(),
            selection: None,
            crop: CropSession::new(),
            preview: None,
            shown: None,
            writer,
        }
    }

    // -- Read access ----------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_image(&self) -> Option<&ImageRef> {
        self.selection.and_then(|index| self.images.get(index))
    }

    pub fn is_edited(&self, image: &ImageRef) -> bool {
        self.overlay.is_edited(image)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn crop(&self) -> &CropSession {
        &self.crop
    }

    // -- Dispatch -------------------------------------------------------------

    /// Apply one user action.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::AddImages(paths) => self.add_images(paths),
            Action::Select(index) => self.select(index),
            Action::RemoveSelected => self.remove_selected(),
            Action::Move(direction) => self.move_selected(direction),
            Action::Rotate(rotation) => {
                self.edit_selected(|overlay, image, shown| overlay.rotate(image, rotation, shown))
            }
            Action::Flip(axis) => self.edit_selected(|overlay, image, shown| overlay.flip(image, axis, shown)),
            Action::ToggleCrop => {
                self.crop.toggle();
                Ok(Outcome::Updated)
            }
            Action::PointerDown(at) => Ok(changed(self.crop.pointer_down(at))),
            Action::PointerMove(to) => Ok(changed(self.crop.pointer_move(to))),
            Action::PointerUp(at) => self.finish_crop(at),
            Action::PointerLeave => Ok(changed(self.crop.pointer_leave())),
            Action::Export(destination) => self.export(destination),
        }
    }

    // -- Image list -----------------------------------------------------------

    fn add_images(&mut self, paths: Vec<PathBuf>) -> Result<Outcome> {
        if self.images.add(paths) == 0 {
            return Ok(Outcome::Unchanged);
        }
        self.refresh_preview()?;
        Ok(Outcome::Updated)
    }

    fn select(&mut self, index: Option<usize>) -> Result<Outcome> {
        if let Some(index) = index {
            if index >= self.images.len() {
                return Err(PhotopressError::IndexOutOfRange {
                    index,
                    len: self.images.len(),
                });
            }
        }
        self.selection = index;
        self.refresh_preview()?;
        Ok(Outcome::Updated)
    }

    fn remove_selected(&mut self) -> Result<Outcome> {
        let Some(index) = self.selection else {
            return Ok(Outcome::Unchanged);
        };
        let removed = self.images.remove(index)?;
        self.overlay.discard(&removed);
        self.selection = None;
        self.crop.cancel();
        self.refresh_preview()?;
        Ok(Outcome::Updated)
    }

    fn move_selected(&mut self, direction: MoveDirection) -> Result<Outcome> {
        let Some(index) = self.selection else {
            return Ok(Outcome::Unchanged);
        };
        let moved_to = self.images.move_item(index, direction)?;
        if moved_to == index {
            return Ok(Outcome::Unchanged);
        }
        self.selection = Some(moved_to);
        self.refresh_preview()?;
        Ok(Outcome::Updated)
    }

    // -- Edits ----------------------------------------------------------------

    fn edit_selected(
        &mut self,
        edit: impl FnOnce(&mut EditOverlay, &ImageRef, Option<DynamicImage>) -> Result<()>,
    ) -> Result<Outcome> {
        let Some(image) = self.selected_image().cloned() else {
            return Ok(Outcome::Unchanged);
        };
        let shown = self.shown_image(&image);
        edit(&mut self.overlay, &image, shown)?;
        self.refresh_preview()?;
        Ok(Outcome::Updated)
    }

    /// Pointer released: turn a finished drag into a crop of the selected
    /// photo. An empty rectangle is dropped quietly.
    fn finish_crop(&mut self, at: ScreenPoint) -> Result<Outcome> {
        let Some((start, end)) = self.crop.pointer_up(at) else {
            return Ok(Outcome::Unchanged);
        };
        let (Some(image), Some(preview)) = (self.selected_image().cloned(), self.preview.as_ref())
        else {
            debug!("Crop drag ended with nothing to crop");
            return Ok(Outcome::Updated);
        };

        let rect = preview.geometry.crop_rect(start, end);
        if rect.is_empty() {
            debug!(?rect, "Ignoring empty crop");
            return Ok(Outcome::Updated);
        }
        let shown = self.shown_image(&image);
        match self.overlay.crop(&image, rect, shown) {
            Ok(()) => {}
            Err(PhotopressError::EmptyCrop) => return Ok(Outcome::Updated),
            Err(err) => return Err(err),
        }
        info!(image = %image, ?rect, "Photo cropped");
        self.refresh_preview()?;
        Ok(Outcome::Updated)
    }

    // -- Export ---------------------------------------------------------------

    fn export(&mut self, destination: PathBuf) -> Result<Outcome> {
        let destination = with_pdf_extension(destination);
        let report = export_document(&self.images, &self.overlay, &self.writer, &destination)?;
        Ok(Outcome::Exported(report))
    }

    // -- Preview --------------------------------------------------------------

    /// Re-render the preview of the selected photo, or clear it when nothing
    /// is selected.
    fn refresh_preview(&mut self) -> Result<()> {
        let Some(image) = self.selected_image().cloned() else {
            self.preview = None;
            self.shown = None;
            return Ok(());
        };
        let bounding_box = self.config.preview_box;
        let rendered = match self.overlay.resolve(&image) {
            Ok(Cow::Borrowed(edited)) => render_preview(edited, bounding_box).map(|preview| (preview, None)),
            Ok(Cow::Owned(decoded)) => {
                render_preview(&decoded, bounding_box).map(|preview| (preview, Some((image, decoded))))
            }
            Err(err) => Err(err),
        };
        match rendered {
            Ok((preview, shown)) => {
                self.preview = Some(preview);
                self.shown = shown;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Preview failed, keeping the previous one");
                Err(err)
            }
        }
    }

    /// Copy of the on-screen decode of `image`, if that is what is shown.
    fn shown_image(&self, image: &ImageRef) -> Option<DynamicImage> {
        self.shown
            .as_ref()
            .filter(|(shown, _)| shown == image)
            .map(|(_, decoded)| decoded.clone())
    }
}

fn changed(consumed: bool) -> Outcome {
    if consumed { Outcome::Updated } else { Outcome::Unchanged }
}

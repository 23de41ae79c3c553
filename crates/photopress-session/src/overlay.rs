// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit overlay — the edited version of each photo, kept in memory.
//
// Source files are never written. An image with no entry here is used exactly
// as decoded from disk; an image with an entry is used as stored. Every edit
// applies to the current edited version, so edits compound.
//
// The first edit of a photo starts from the image the caller already has on
// screen when it passes one in, so the result matches what the user saw even
// if the file changed on disk since it was previewed.

use std::borrow::Cow;
use std::collections::HashMap;

use image::DynamicImage;
use photopress_core::error::{PhotopressError, Result};
use photopress_core::{CropRect, FlipAxis, ImageRef, Rotation};
use photopress_document::ImageProcessor;
use tracing::{debug, info, instrument};

/// Edited images keyed by source photo.
#[derive(Default)]
pub struct EditOverlay {
    entries: HashMap<ImageRef, DynamicImage>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The image to preview or export for `image`: the edited version when
    /// one exists, otherwise a fresh decode of the file.
    pub fn resolve(&self, image: &ImageRef) -> Result<Cow<'_, DynamicImage>> {
        match self.entries.get(image) {
            Some(edited) => Ok(Cow::Borrowed(edited)),
            None => ImageProcessor::open(image.path()).map(|p| Cow::Owned(p.into_dynamic())),
        }
    }

    pub fn is_edited(&self, image: &ImageRef) -> bool {
        self.entries.contains_key(image)
    }

    // -- Edits ----------------------------------------------------------------

    /// `shown` is the unedited decode of `image` currently displayed, if the
    /// caller holds one. It is ignored once `image` has an edited version.
    #[instrument(skip(self, shown), fields(image = %image))]
    pub fn rotate(&mut self, image: &ImageRef, rotation: Rotation, shown: Option<DynamicImage>) -> Result<()> {
        let current = self.take_current(image, shown)?;
        let rotated = ImageProcessor::from_dynamic(current).rotate(rotation);
        self.store(image, rotated);
        Ok(())
    }

    #[instrument(skip(self, shown), fields(image = %image))]
    pub fn flip(&mut self, image: &ImageRef, axis: FlipAxis, shown: Option<DynamicImage>) -> Result<()> {
        let current = self.take_current(image, shown)?;
        let flipped = ImageProcessor::from_dynamic(current).flip(axis);
        self.store(image, flipped);
        Ok(())
    }

    /// Crop the current version of `image` to `rect` (image pixels, clamped
    /// to the image). A rectangle with nothing inside the image is rejected
    /// with [`PhotopressError::EmptyCrop`] and leaves the overlay untouched.
    #[instrument(skip(self, shown), fields(image = %image))]
    pub fn crop(&mut self, image: &ImageRef, rect: CropRect, shown: Option<DynamicImage>) -> Result<()> {
        let was_edited = self.is_edited(image);
        let current = self.take_current(image, shown)?;

        if rect.clamped_to(current.width(), current.height()).is_none() {
            if was_edited {
                self.entries.insert(image.clone(), current);
            }
            debug!(?rect, "Crop rejected");
            return Err(PhotopressError::EmptyCrop);
        }

        let cropped = ImageProcessor::from_dynamic(current).crop(rect)?;
        self.store(image, cropped);
        Ok(())
    }

    /// Drop the edited version of `image`. Returns whether there was one.
    pub fn discard(&mut self, image: &ImageRef) -> bool {
        let discarded = self.entries.remove(image).is_some();
        if discarded {
            info!(image = %image, "Edits discarded");
        }
        discarded
    }

    // -- Helpers --------------------------------------------------------------

    /// Edited version if any, else the shown image, else a decode from disk.
    fn take_current(&mut self, image: &ImageRef, shown: Option<DynamicImage>) -> Result<DynamicImage> {
        match (self.entries.remove(image), shown) {
            (Some(edited), _) => Ok(edited),
            (None, Some(shown)) => Ok(shown),
            (None, None) => Ok(ImageProcessor::open(image.path())?.into_dynamic()),
        }
    }

    fn store(&mut self, image: &ImageRef, processed: ImageProcessor) {
        let edited = processed.into_dynamic();
        debug!(width = edited.width(), height = edited.height(), "Edit stored");
        self.entries.insert(image.clone(), edited);
    }
}

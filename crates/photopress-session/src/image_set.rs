// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered, duplicate-free list of source photos. List order is page order.

use photopress_core::error::{PhotopressError, Result};
use photopress_core::{ImageRef, MoveDirection};
use tracing::{debug, info};

/// The photos that will become pages, in page order.
#[derive(Debug, Clone, Default)]
pub struct ImageSet {
    images: Vec<ImageRef>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every image not already present, keeping the given order.
    /// Returns how many were actually added.
    pub fn add<I, R>(&mut self, images: I) -> usize
    where
        I: IntoIterator<Item = R>,
        R: Into<ImageRef>,
    {
        let before = self.images.len();
        for image in images {
            let image = image.into();
            if self.contains(&image) {
                debug!(image = %image, "Skipping duplicate");
                continue;
            }
            self.images.push(image);
        }
        let added = self.images.len() - before;
        info!(added, total = self.images.len(), "Images added");
        added
    }

    /// Remove and return the image at `index`.
    pub fn remove(&mut self, index: usize) -> Result<ImageRef> {
        self.check(index)?;
        let removed = self.images.remove(index);
        info!(index, image = %removed, "Image removed");
        Ok(removed)
    }

    /// Swap the image at `index` with its neighbour in `direction` and return
    /// its new index. At either end of the list nothing moves and `index` is
    /// returned unchanged.
    pub fn move_item(&mut self, index: usize, direction: MoveDirection) -> Result<usize> {
        self.check(index)?;
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < self.images.len()),
        };
        match target {
            Some(target) => {
                self.images.swap(index, target);
                debug!(from = index, to = target, "Image moved");
                Ok(target)
            }
            None => Ok(index),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ImageRef> {
        self.images.get(index)
    }

    pub fn contains(&self, image: &ImageRef) -> bool {
        self.images.contains(image)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.images.len() {
            Ok(())
        } else {
            Err(PhotopressError::IndexOutOfRange {
                index,
                len: self.images.len(),
            })
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Crop gesture state machine.
//
//   Idle --toggle--> Armed --pointer down--> Dragging --pointer up--> Idle
//     ^                | ^                       |
//     |                | +-----pointer leave-----+
//     +-----toggle-----+----------toggle---------+
//
// Crop mode switches itself off after one completed drag. Turning it off
// mid-drag abandons the drag without producing a rectangle. The pointer
// leaving the preview mid-drag also abandons it, but crop mode stays on: the
// release happens where the preview cannot see it.

use tracing::debug;

use crate::preview::ScreenPoint;

/// Where the crop gesture currently is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropState {
    /// Crop mode off.
    #[default]
    Idle,
    /// Crop mode on, waiting for the pointer to go down.
    Armed,
    /// Pointer is down; `current` follows it.
    Dragging {
        start: ScreenPoint,
        current: ScreenPoint,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CropSession {
    state: CropState,
}

impl CropSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CropState {
        self.state
    }

    /// Crop mode is on (armed or dragging).
    pub fn is_active(&self) -> bool {
        !matches!(self.state, CropState::Idle)
    }

    /// Flip crop mode and return whether it is now on.
    pub fn toggle(&mut self) -> bool {
        self.state = match self.state {
            CropState::Idle => CropState::Armed,
            CropState::Armed | CropState::Dragging { .. } => CropState::Idle,
        };
        debug!(active = self.is_active(), "Crop mode toggled");
        self.is_active()
    }

    /// Leave crop mode, dropping any drag in progress.
    pub fn cancel(&mut self) {
        self.state = CropState::Idle;
    }

    /// Start a drag. A second press while already dragging restarts it.
    /// Returns whether the press was consumed.
    pub fn pointer_down(&mut self, at: ScreenPoint) -> bool {
        match self.state {
            CropState::Idle => false,
            CropState::Armed | CropState::Dragging { .. } => {
                self.state = CropState::Dragging { start: at, current: at };
                true
            }
        }
    }

    /// Track the pointer during a drag. Returns whether anything changed.
    pub fn pointer_move(&mut self, to: ScreenPoint) -> bool {
        match &mut self.state {
            CropState::Dragging { current, .. } => {
                *current = to;
                true
            }
            _ => false,
        }
    }

    /// Finish a drag and return its two corners. Crop mode turns off. Outside
    /// a drag this does nothing and returns `None`.
    pub fn pointer_up(&mut self, at: ScreenPoint) -> Option<(ScreenPoint, ScreenPoint)> {
        match self.state {
            CropState::Dragging { start, .. } => {
                self.state = CropState::Idle;
                debug!(?start, end = ?at, "Crop drag finished");
                Some((start, at))
            }
            _ => None,
        }
    }

    /// The pointer left the preview. A drag in progress is dropped and crop
    /// mode goes back to waiting for a press. Returns whether a drag ended.
    pub fn pointer_leave(&mut self) -> bool {
        match self.state {
            CropState::Dragging { .. } => {
                self.state = CropState::Armed;
                debug!("Crop drag left the preview");
                true
            }
            _ => false,
        }
    }

    /// Rectangle to draw over the preview while dragging, as
    /// `(left, top, width, height)` in viewport pixels.
    pub fn selection(&self) -> Option<(f64, f64, f64, f64)> {
        match self.state {
            CropState::Dragging { start, current } => Some((
                start.x.min(current.x),
                start.y.min(current.y),
                (start.x - current.x).abs(),
                (start.y - current.y).abs(),
            )),
            _ => None,
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Window state shared through Dioxus context. All editing state lives in the
// session; the UI only adds the status line.

use photopress_core::{AppConfig, PhotopressError};
use photopress_core::human_errors::{Activity, humanize_error};
use photopress_session::{Action, Outcome, Session};

use crate::services::dialogs;

pub struct AppState {
    /// Image list, edits, crop gesture and preview.
    pub session: Session,
    /// Last message shown under the toolbar.
    pub status: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: Session::new(config),
            status: None,
        }
    }

    /// Run one action and turn its outcome into a status message. Returns
    /// what the user should be told in a dialog, if anything.
    pub fn apply(&mut self, action: Action) -> Option<dialogs::Notice> {
        let activity = match action {
            Action::Export(_) => Activity::Exporting,
            _ => Activity::Editing,
        };
        match self.session.dispatch(action) {
            Ok(Outcome::Exported(report)) => {
                let message = format!("PDF saved successfully as {}", report.path.display());
                self.status = Some(message.clone());
                Some(dialogs::Notice::Success(message))
            }
            Ok(Outcome::Updated) => {
                self.status = None;
                None
            }
            Ok(Outcome::Unchanged) => None,
            Err(err) => Some(self.fail(err, activity)),
        }
    }

    /// Record a failure on the status line and build the message box for it.
    pub fn fail(&mut self, err: PhotopressError, activity: Activity) -> dialogs::Notice {
        tracing::warn!(error = %err, ?activity, "Action failed");
        let human = humanize_error(&err, activity);
        self.status = Some(human.message.clone());
        dialogs::Notice::Failure(human)
    }
}

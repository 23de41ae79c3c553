// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native file pickers and message boxes via `rfd`.

use std::path::PathBuf;

use photopress_core::AppConfig;
use photopress_core::human_errors::{HumanError, Severity};

/// Something to tell the user in a message box.
pub enum Notice {
    Success(String),
    Failure(HumanError),
}

/// Let the user pick one or more photos.
pub fn pick_images(config: &AppConfig) -> Option<Vec<PathBuf>> {
    let picked = rfd::FileDialog::new()
        .set_title("Select Images")
        .add_filter("Images", &config.image_extensions)
        .pick_files();
    if let Some(ref paths) = picked {
        tracing::debug!(count = paths.len(), "Photos picked");
    }
    picked
}

/// Let the user choose where the PDF goes.
pub fn pick_destination(config: &AppConfig) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save PDF")
        .set_file_name(config.default_file_name.as_str())
        .add_filter("PDF Files", &["pdf"])
        .save_file()
}

/// Show a blocking message box for `notice`.
pub fn show(notice: &Notice) {
    let dialog = match notice {
        Notice::Success(message) => rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title("Success")
            .set_description(message.as_str()),
        Notice::Failure(human) => {
            let level = match human.severity {
                Severity::Permanent => rfd::MessageLevel::Error,
                Severity::ActionRequired | Severity::Transient => rfd::MessageLevel::Warning,
            };
            rfd::MessageDialog::new()
                .set_level(level)
                .set_title(human.title)
                .set_description(format!("{}\n\n{}", human.message, human.suggestion))
        }
    };
    dialog.set_buttons(rfd::MessageButtons::Ok).show();
}

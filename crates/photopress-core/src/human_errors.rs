// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the message box shown after a failed
// action. Every technical error gets a plain summary and a suggestion.

use crate::error::PhotopressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing went wrong; the user has to do something first (add photos,
    /// pick one).
    ActionRequired,
    /// The file or destination is unusable; retrying won't help.
    Permanent,
    /// Worth trying again (disk full, file briefly locked).
    Transient,
}

/// What the user was doing when the error happened. The same failure reads
/// differently while previewing than while saving the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Adding, selecting or editing photos.
    Editing,
    /// Writing the PDF.
    Exporting,
}

/// A human-readable error with a dialog title, plain message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Message box title.
    pub title: &'static str,
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Drives the message box icon.
    pub severity: Severity,
}

/// Convert a `PhotopressError` raised during `activity` into a `HumanError`
/// for display.
pub fn humanize_error(err: &PhotopressError, activity: Activity) -> HumanError {
    match err {
        PhotopressError::NoImages => HumanError {
            title: "Error",
            message: "No images selected!".into(),
            suggestion: "Add some photos with \"Add Photos\" first.".into(),
            severity: Severity::ActionRequired,
        },

        PhotopressError::EmptyCrop => HumanError {
            title: "Crop",
            message: "The crop area is empty.".into(),
            suggestion: "Drag across the part of the preview you want to keep.".into(),
            severity: Severity::ActionRequired,
        },

        PhotopressError::IndexOutOfRange { .. } => HumanError {
            title: "Error",
            message: "That photo is no longer in the list.".into(),
            suggestion: "Select a photo from the list and try again.".into(),
            severity: Severity::ActionRequired,
        },

        PhotopressError::Decode { path, reason } => {
            let (title, message) = match activity {
                Activity::Editing => ("Preview Error", format!("Failed to load preview of {path}.")),
                Activity::Exporting => ("Error", format!("Failed to create PDF: could not read {path}.")),
            };
            HumanError {
                title,
                message,
                suggestion: format!(
                    "The file may be damaged or not an image. Remove it from the list or pick another file. ({reason})"
                ),
                severity: Severity::Permanent,
            }
        }

        PhotopressError::ImageError(detail) => HumanError {
            title: "Error",
            message: "There's a problem with this image.".into(),
            suggestion: format!("Try saving it as a JPEG or PNG first. ({detail})"),
            severity: Severity::Permanent,
        },

        PhotopressError::PdfError(detail) => HumanError {
            title: "Error",
            message: "Failed to create PDF.".into(),
            suggestion: format!("Try removing the photo that causes trouble. ({detail})"),
            severity: Severity::Permanent,
        },

        PhotopressError::PageCountMismatch { expected, actual } => HumanError {
            title: "Error",
            message: "Failed to create PDF: the saved file is incomplete.".into(),
            suggestion: format!(
                "Expected {expected} pages but found {actual}. Try saving again, perhaps to a different folder."
            ),
            severity: Severity::Transient,
        },

        PhotopressError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                title: "Error",
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try choosing it again.".into(),
                severity: Severity::Permanent,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                title: "Error",
                message: "Photopress isn't allowed to write there.".into(),
                suggestion: "Choose a folder you can write to, such as your Documents folder.".into(),
                severity: Severity::Permanent,
            },
            _ => HumanError {
                title: "Error",
                message: "There was a problem reading or writing a file.".into(),
                suggestion: format!("Try again. If this keeps happening, your disk may be full. ({io_err})"),
                severity: Severity::Transient,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_action_required() {
        let human = humanize_error(&PhotopressError::NoImages, Activity::Exporting);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert_eq!(human.message, "No images selected!");
    }

    #[test]
    fn decode_failure_names_the_file() {
        let err = PhotopressError::Decode {
            path: "/tmp/broken.jpg".into(),
            reason: "unexpected end of file".into(),
        };
        let human = humanize_error(&err, Activity::Editing);
        assert_eq!(human.title, "Preview Error");
        assert!(human.message.contains("/tmp/broken.jpg"));
        assert!(human.suggestion.contains("unexpected end of file"));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn decode_failure_while_saving_is_a_pdf_error() {
        let err = PhotopressError::Decode {
            path: "/tmp/broken.jpg".into(),
            reason: "unexpected end of file".into(),
        };
        let human = humanize_error(&err, Activity::Exporting);
        assert_eq!(human.title, "Error");
        assert_eq!(human.message, "Failed to create PDF: could not read /tmp/broken.jpg.");
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn short_pdf_is_transient() {
        let err = PhotopressError::PageCountMismatch {
            expected: 3,
            actual: 2,
        };
        let human = humanize_error(&err, Activity::Exporting);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.suggestion.contains("3 pages"));
    }

    #[test]
    fn permission_denied_is_permanent() {
        let err = PhotopressError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(humanize_error(&err, Activity::Exporting).severity, Severity::Permanent);
    }
}

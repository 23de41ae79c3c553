// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter page — image list, preview with crop overlay, edit toolbar and
// PDF export, all in one window.

use dioxus::prelude::*;

use photopress_core::human_errors::Activity;
use photopress_core::{FlipAxis, MoveDirection, PhotopressError, Rotation};
use photopress_session::{Action, CropState, ScreenPoint};

use crate::services::dialogs;
use crate::state::AppState;

/// Send `action` to the session and show any resulting message box. The
/// state is released before a dialog blocks.
fn perform(mut state: Signal<AppState>, action: Action) {
    let notice = state.write().apply(action);
    if let Some(notice) = notice {
        dialogs::show(&notice);
    }
}

fn pointer(evt: &MouseEvent) -> ScreenPoint {
    let at = evt.element_coordinates();
    ScreenPoint::new(at.x, at.y)
}

#[component]
pub fn Converter() -> Element {
    let mut state = use_context::<Signal<AppState>>();

    // Snapshot everything the view needs so no borrow outlives this block.
    let (rows, has_selection, preview, selection_box, crop_active, status, viewport) = {
        let app = state.read();
        let session = &app.session;
        let rows: Vec<(usize, String, bool, bool)> = session
            .images()
            .iter()
            .enumerate()
            .map(|(index, image)| {
                (
                    index,
                    image.display_name(),
                    session.selection() == Some(index),
                    session.is_edited(image),
                )
            })
            .collect();
        (
            rows,
            session.selection().is_some(),
            session.preview().cloned(),
            session.crop().selection(),
            session.crop().is_active(),
            app.status.clone(),
            session.config().preview_box,
        )
    };

    let crop_border = if crop_active { "2px solid #d00" } else { "1px solid #ccc" };
    let cursor = if crop_active { "crosshair" } else { "default" };
    let crop_label = if crop_active { "Cancel Crop" } else { "Crop" };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100vh; padding: 12px; box-sizing: border-box; font-family: system-ui, -apple-system, sans-serif; gap: 12px;",

            div { style: "display: flex; gap: 12px; flex: 1; min-height: 0;",

                // Image list and list operations
                div { style: "display: flex; flex-direction: column; width: 260px; gap: 8px;",
                    div { style: "flex: 1; overflow-y: auto; border: 1px solid #ccc; border-radius: 4px; background: white;",
                        if rows.is_empty() {
                            p { style: "text-align: center; color: #aaa; margin: 32px 8px;",
                                "No photos yet."
                            }
                        }
                        for (index, name, selected, edited) in rows {
                            {
                                let background = if selected { "#007aff" } else { "transparent" };
                                let colour = if selected { "white" } else { "#222" };
                                rsx! {
                                    div {
                                        key: "{index}",
                                        style: "padding: 4px 8px; cursor: pointer; background: {background}; color: {colour}; font-size: 14px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;",
                                        onclick: move |_| perform(state, Action::Select(Some(index))),
                                        "{name}"
                                        if edited {
                                            span { style: "opacity: 0.7;", " \u{270E}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    ToolButton {
                        label: "Add Photos",
                        disabled: false,
                        onclick: move |_| {
                            let picked = dialogs::pick_images(state.read().session.config());
                            if let Some(paths) = picked {
                                perform(state, Action::AddImages(paths));
                            }
                        },
                    }
                    ToolButton {
                        label: "Remove Selected",
                        disabled: !has_selection,
                        onclick: move |_| perform(state, Action::RemoveSelected),
                    }
                    div { style: "display: flex; gap: 8px;",
                        ToolButton {
                            label: "Move Up",
                            disabled: !has_selection,
                            onclick: move |_| perform(state, Action::Move(MoveDirection::Up)),
                        }
                        ToolButton {
                            label: "Move Down",
                            disabled: !has_selection,
                            onclick: move |_| perform(state, Action::Move(MoveDirection::Down)),
                        }
                    }
                }

                // Preview and edit toolbar
                div { style: "display: flex; flex-direction: column; align-items: center; gap: 8px;",
                    div {
                        style: "position: relative; width: {viewport}px; height: {viewport}px; border: {crop_border}; background: #eee; cursor: {cursor}; user-select: none;",
                        onmousedown: move |evt: MouseEvent| {
                            if state.peek().session.crop().is_active() {
                                perform(state, Action::PointerDown(pointer(&evt)));
                            }
                        },
                        onmousemove: move |evt: MouseEvent| {
                            let dragging = matches!(
                                state.peek().session.crop().state(),
                                CropState::Dragging { .. }
                            );
                            if dragging {
                                perform(state, Action::PointerMove(pointer(&evt)));
                            }
                        },
                        onmouseup: move |evt: MouseEvent| perform(state, Action::PointerUp(pointer(&evt))),
                        onmouseleave: move |_| {
                            let dragging = matches!(
                                state.peek().session.crop().state(),
                                CropState::Dragging { .. }
                            );
                            if dragging {
                                perform(state, Action::PointerLeave);
                            }
                        },

                        if let Some(preview) = preview {
                            {
                                let (left, top) = preview.geometry.offset();
                                let (width, height) = (preview.geometry.preview_width, preview.geometry.preview_height);
                                let src = preview.data_url;
                                rsx! {
                                    img {
                                        src: "{src}",
                                        draggable: "false",
                                        style: "position: absolute; left: {left}px; top: {top}px; width: {width}px; height: {height}px; pointer-events: none;",
                                    }
                                }
                            }
                        }
                        if let Some((left, top, width, height)) = selection_box {
                            div {
                                style: "position: absolute; left: {left}px; top: {top}px; width: {width}px; height: {height}px; border: 2px solid red; box-sizing: border-box; pointer-events: none;",
                            }
                        }
                    }
                    div { style: "display: flex; gap: 8px; flex-wrap: wrap; justify-content: center;",
                        ToolButton {
                            label: "\u{21BA}",
                            disabled: !has_selection,
                            onclick: move |_| perform(state, Action::Rotate(Rotation::CounterClockwise)),
                        }
                        ToolButton {
                            label: "\u{21BB}",
                            disabled: !has_selection,
                            onclick: move |_| perform(state, Action::Rotate(Rotation::Clockwise)),
                        }
                        ToolButton {
                            label: "\u{2194}",
                            disabled: !has_selection,
                            onclick: move |_| perform(state, Action::Flip(FlipAxis::Horizontal)),
                        }
                        ToolButton {
                            label: "\u{2195}",
                            disabled: !has_selection,
                            onclick: move |_| perform(state, Action::Flip(FlipAxis::Vertical)),
                        }
                        ToolButton {
                            label: crop_label,
                            disabled: !has_selection,
                            onclick: move |_| perform(state, Action::ToggleCrop),
                        }
                    }
                    if crop_active {
                        p { style: "margin: 0; color: #666; font-size: 13px;",
                            "Drag across the preview to choose the area to keep."
                        }
                    }
                }
            }

            // Export
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #34c759; color: white; font-size: 16px;",
                onclick: move |_| {
                    if state.read().session.images().is_empty() {
                        let notice = state.write().fail(PhotopressError::NoImages, Activity::Exporting);
                        dialogs::show(&notice);
                        return;
                    }
                    let destination = dialogs::pick_destination(state.read().session.config());
                    if let Some(path) = destination {
                        perform(state, Action::Export(path));
                    }
                },
                "Generate PDF"
            }

            // Status
            if let Some(ref msg) = status {
                p { style: "margin: 0; color: #666; font-size: 14px; text-align: center;",
                    "{msg}"
                }
            }
        }
    }
}

#[component]
fn ToolButton(label: &'static str, disabled: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let opacity = if disabled { "0.5" } else { "1" };
    rsx! {
        button {
            style: "padding: 8px 12px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 14px; opacity: {opacity};",
            disabled: disabled,
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photopress — Photo to PDF Converter
//
// Entry point. Initialises logging and app state, and launches the Dioxus
// desktop window.

mod pages;
mod services;
mod state;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;

use photopress_core::AppConfig;

use pages::converter::Converter;

const WINDOW_TITLE: &str = "Photo to PDF Converter";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Photopress starting");

    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(760.0, 520.0));

    dioxus::LaunchBuilder::desktop()
        .with_cfg(Config::new().with_window(window))
        .launch(app);
}

/// Root component.
fn app() -> Element {
    use_context_provider(|| {
        let config = AppConfig::default();
        tracing::debug!(?config, "Using built-in configuration");
        Signal::new(state::AppState::new(config))
    });

    rsx! {
        Converter {}
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! QuickMeme - a quick meme editor
//!
//! A desktop application that loads an image, lets you place outlined
//! text on it, and exports the result as a full-resolution PNG.

mod app;
mod config;
mod controller;
mod error;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::QuickMemeApp;
use config::EditorConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = EditorConfig::load();

    // An image URL on the command line is handed off to the editor
    if let Some(url) = std::env::args().nth(1) {
        match app::open_store(&config) {
            Some(store) => io::handoff::store_pending(&store, &url)?,
            None => log::warn!("No storage available; ignoring {}", url),
        }
    }

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true)
            .with_title("QuickMeme"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "QuickMeme",
        options,
        Box::new(|_cc| Ok(Box::new(QuickMemeApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the interaction controller to the egui panels,
//! runs background image loads, keeps the preview texture in step with
//! the scene, and hands snapshots to the autosaver.

use crate::config::EditorConfig;
use crate::controller::{Controller, PointerState};
use crate::error::ImageLoadError;
use crate::io::autosave::{self, Autosaver, Snapshot};
use crate::io::handoff;
use crate::io::media;
use crate::io::messaging::{Message, MessageBus};
use crate::io::storage::{FileStore, KeyValueStore};
use crate::models::annotation::{AnnotationId, TextAnnotation};
use crate::models::scene::BackgroundImage;
use crate::render::export;
use crate::render::fonts::FontBook;
use crate::render::raster::{rgba_bytes, RasterSurface};
use crate::render::{render, RenderOptions};
use crate::ui::canvas::{self, CanvasAction, CanvasContent};
use crate::ui::{properties, toolbar};
use crate::util::geometry::TextMeasurer;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

const LOADING_TEXT: &str = "Loading image...";
const LOAD_FAILED_TEXT: &str = "Failed to load image. Please check the URL and try again.";

/// Result of a background image load.
type LoadResult = Result<BackgroundImage, ImageLoadError>;

/// Status line shown above the canvas.
#[derive(Debug, Clone, PartialEq)]
enum Status {
    Empty,
    Loading,
    Ready,
    LoadFailed,
    Saved(PathBuf),
    ExportFailed(String),
}

/// Main application state.
pub struct QuickMemeApp {
    config: EditorConfig,

    /// Scene and pointer interaction for this session
    controller: Controller,

    /// Fonts shared by measurement and rendering
    fonts: Arc<FontBook>,

    /// Background writer for session snapshots
    autosaver: Option<Autosaver>,

    /// Alternate "load this image" entry point
    messages: MessageBus,

    /// Contents of the URL field
    url_input: String,

    /// Receiver for the in-flight image load, newest request only
    image_loader: Option<Receiver<LoadResult>>,

    status: Status,

    /// Rendered preview uploaded for display
    preview_texture: Option<egui::TextureHandle>,
}

impl QuickMemeApp {
    /// Create the editor and restore any handed-off or saved session.
    pub fn new(config: EditorConfig) -> Self {
        let fonts = Arc::new(FontBook::discover(&config.fonts.dirs));
        let measurer: Arc<dyn TextMeasurer> = fonts.clone();

        let mut app = Self {
            controller: Controller::new(config.preview, measurer),
            fonts,
            autosaver: None,
            messages: MessageBus::new(),
            url_input: String::new(),
            image_loader: None,
            status: Status::Empty,
            preview_texture: None,
            config,
        };

        match open_store(&app.config) {
            Some(store) => {
                app.restore_session(&store);
                app.autosaver = Some(Autosaver::spawn(Box::new(store)));
            }
            None => log::debug!("Storage unavailable; running without autosave"),
        }
        app
    }

    /// Consume a pending handoff, or else restore the autosaved session.
    fn restore_session(&mut self, store: &dyn KeyValueStore) {
        match startup_session(store) {
            Some(StartupSession::Handoff(url)) => {
                log::info!("Opening handed-off image {}", url);
                self.url_input = url.clone();
                self.start_load(url);
            }
            Some(StartupSession::Saved {
                image_url,
                annotations,
                selected,
            }) => {
                log::info!("Restoring session with {} annotations", annotations.len());
                self.url_input = image_url.clone();
                self.start_load(image_url);
                self.controller.restore(annotations, selected);
            }
            None => {}
        }
    }

    /// Load an image in the background. A newer request replaces an older one.
    fn start_load(&mut self, url: String) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.status = Status::Loading;

        std::thread::spawn(move || {
            let _ = sender.send(media::load_image(&url));
        });
    }

    fn poll_loader(&mut self) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(image)) => {
                self.image_loader = None;
                self.controller.load_background(image);
                self.status = Status::Ready;
            }
            Ok(Err(e)) => {
                self.image_loader = None;
                log::error!("Failed to load image: {}", e);
                self.status = Status::LoadFailed;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.image_loader = None;
                self.status = Status::LoadFailed;
            }
        }
    }

    /// Turn dropped files into open requests and act on relayed ones.
    fn poll_messages(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let sender = self.messages.sender();
        for path in dropped.into_iter().filter_map(|f| f.path) {
            let _ = sender.send(Message::open(path.to_string_lossy()));
        }

        if let Some(url) = self.messages.drain_load_requests().pop() {
            self.url_input = url.clone();
            self.start_load(url);
        }
    }

    /// Re-render the preview after a mutation and queue an autosave.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        if !self.controller.take_dirty() {
            return;
        }
        let scene = self.controller.scene();
        if scene.background().is_none() {
            return;
        }

        let (width, height) = scene.preview_size();
        let Some(mut surface) = RasterSurface::new(width, height, &self.fonts) else {
            return;
        };
        render(&mut surface, scene, &RenderOptions::preview());

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            &rgba_bytes(surface.pixmap()),
        );
        match &mut self.preview_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview_texture =
                    Some(ctx.load_texture("preview", image, egui::TextureOptions::LINEAR));
            }
        }

        if let Some(autosaver) = &self.autosaver {
            autosaver.queue(Snapshot::capture(scene));
        }
        ctx.request_repaint();
    }

    /// Export at native resolution and write the PNG.
    fn download(&mut self) {
        let scene = self.controller.scene();
        if scene.background().is_none() {
            return;
        }

        let bytes = match export::export_png(scene, &self.fonts) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                self.status = Status::ExportFailed(e.to_string());
                return;
            }
        };

        let file_name = export::export_file_name(chrono::Utc::now());
        let directory = self.config.export.resolved_directory();
        let path = if self.config.export.ask_for_location {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name(file_name.as_str());
            if let Some(dir) = &directory {
                dialog = dialog.set_directory(dir);
            }
            match dialog.save_file() {
                Some(path) => path,
                None => return,
            }
        } else {
            directory.unwrap_or_default().join(&file_name)
        };

        match std::fs::write(&path, bytes) {
            Ok(()) => {
                log::info!("Exported meme to {}", path.display());
                self.status = Status::Saved(path);
            }
            Err(e) => {
                log::error!("Failed to write {}: {}", path.display(), e);
                self.status = Status::ExportFailed(e.to_string());
            }
        }
    }

    fn handle_canvas_actions(&mut self, actions: Vec<CanvasAction>) {
        for action in actions {
            match action {
                CanvasAction::PointerDown(pos) => self.controller.pointer_down(pos),
                CanvasAction::PointerMove(pos) => self.controller.pointer_move(pos),
                CanvasAction::PointerUp => self.controller.pointer_up(),
            }
        }
    }

    fn status_text(&self) -> Option<String> {
        match &self.status {
            Status::Empty | Status::Ready => None,
            Status::Loading => Some(LOADING_TEXT.to_string()),
            Status::LoadFailed => Some(LOAD_FAILED_TEXT.to_string()),
            Status::Saved(path) => Some(format!("Saved {}", path.display())),
            Status::ExportFailed(reason) => Some(format!("Export failed: {}", reason)),
        }
    }
}

/// What to bring back when the editor opens.
#[derive(Debug, Clone, PartialEq)]
enum StartupSession {
    /// An image handed over from outside, which wins over any autosave.
    Handoff(String),
    Saved {
        image_url: String,
        annotations: Vec<TextAnnotation>,
        selected: Option<AnnotationId>,
    },
}

/// Decide the startup session. A pending handoff is consumed on read.
fn startup_session(store: &dyn KeyValueStore) -> Option<StartupSession> {
    match handoff::take_pending(store) {
        Ok(Some(url)) => return Some(StartupSession::Handoff(url)),
        Ok(None) => {}
        Err(e) => log::debug!("Handoff unavailable: {}", e),
    }

    let snapshot = match autosave::load_snapshot(store) {
        Ok(snapshot) => snapshot?,
        Err(e) => {
            log::debug!("No session restored: {}", e);
            return None;
        }
    };
    Some(StartupSession::Saved {
        image_url: snapshot.image_url?,
        annotations: snapshot.text_objects,
        selected: snapshot.selected_text_id,
    })
}

/// Storage from the config, or the per-user default location.
pub fn open_store(config: &EditorConfig) -> Option<FileStore> {
    match &config.storage.path {
        Some(path) => Some(FileStore::new(path)),
        None => match FileStore::default_location() {
            Ok(store) => Some(store),
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        },
    }
}

impl eframe::App for QuickMemeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();
        self.poll_messages(ctx);

        // Keep polling while a load is in flight
        if self.image_loader.is_some() {
            ctx.request_repaint();
        }

        let has_image = self.controller.scene().background().is_some();

        // Toolbar
        let status_text = self.status_text();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let action = toolbar::show(ui, &mut self.url_input, has_image);
                if let Some(text) = status_text {
                    ui.label(egui::RichText::new(text).italics());
                }
                action
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::LoadUrl(url) => self.start_load(url),
            toolbar::ToolbarAction::AddText => {
                self.controller.add_text();
            }
            toolbar::ToolbarAction::Download => self.download(),
            toolbar::ToolbarAction::None => {}
        }

        // Properties panel, only while something is selected
        let properties_action = self.controller.panel().cloned().map(|annotation| {
            let action = egui::SidePanel::right("properties")
                .default_width(250.0)
                .show(ctx, |ui| properties::show(ui, &annotation))
                .inner;
            (annotation.id, action)
        });

        match properties_action {
            Some((id, properties::PropertiesAction::Edit(edit))) => self.controller.edit(id, edit),
            Some((id, properties::PropertiesAction::Delete)) => self.controller.delete(id),
            Some((_, properties::PropertiesAction::None)) | None => {}
        }

        // Handle keyboard events when no text field is focused
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
                self.controller.delete_selected();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.controller.panel().is_some() {
                self.controller.select(None);
            }
        }

        // Main canvas (center)
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let content = match (&self.preview_texture, has_image, &self.status) {
                    (Some(texture), true, _) => CanvasContent::Preview {
                        texture,
                        size: self.controller.scene().preview_size(),
                        cursor: self.controller.cursor_hint(),
                        interacting: self.controller.pointer_state() != PointerState::Idle,
                    },
                    (_, _, Status::Loading) => CanvasContent::Message(LOADING_TEXT),
                    (_, _, Status::LoadFailed) => CanvasContent::Message(LOAD_FAILED_TEXT),
                    _ => CanvasContent::Welcome,
                };
                canvas::show(ui, content)
            })
            .inner;

        self.handle_canvas_actions(canvas_actions);
        self.refresh_preview(ctx);
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview canvas.
//!
//! This module displays the rendered preview at its native preview size
//! and translates raw pointer input into preview-space canvas actions.

use crate::controller::CursorHint;
use crate::util::geometry::Point;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
}

/// What the canvas area should show.
pub enum CanvasContent<'a> {
    Preview {
        texture: &'a egui::TextureHandle,
        size: (u32, u32),
        cursor: CursorHint,
        /// A drag or resize is in progress; keep tracking outside the canvas.
        interacting: bool,
    },
    Message(&'a str),
    Welcome,
}

/// Display the canvas area and collect pointer actions for this frame.
pub fn show(ui: &mut egui::Ui, content: CanvasContent<'_>) -> Vec<CanvasAction> {
    let mut actions = Vec::new();

    let (texture, size, cursor, interacting) = match content {
        CanvasContent::Preview {
            texture,
            size,
            cursor,
            interacting,
        } => (texture, size, cursor, interacting),
        CanvasContent::Message(message) => {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new(message)
                        .size(16.0)
                        .color(egui::Color32::from_gray(200)),
                );
            });
            return actions;
        }
        CanvasContent::Welcome => {
            show_welcome(ui);
            return actions;
        }
    };

    let preview_size = egui::vec2(size.0 as f32, size.1 as f32);
    let (rect, response) = ui.allocate_exact_size(preview_size, egui::Sense::click_and_drag());

    ui.painter().image(
        texture.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let to_local = |p: egui::Pos2| Point::new(p.x - rect.min.x, p.y - rect.min.y);
    let (pressed, released, latest, moved) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.latest_pos(),
            i.pointer.delta() != egui::Vec2::ZERO,
        )
    });
    let over_canvas = response.contains_pointer();

    if let Some(pos) = latest {
        if pressed && over_canvas {
            actions.push(CanvasAction::PointerDown(to_local(pos)));
        } else if moved && (over_canvas || interacting) {
            actions.push(CanvasAction::PointerMove(to_local(pos)));
        }
    }
    if released {
        actions.push(CanvasAction::PointerUp);
    }

    if over_canvas {
        ui.ctx().set_cursor_icon(match cursor {
            CursorHint::Default => egui::CursorIcon::Default,
            CursorHint::Move => egui::CursorIcon::Move,
            CursorHint::ResizeSouthEast => egui::CursorIcon::ResizeSouthEast,
        });
    }

    actions
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("QuickMeme")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Enter an image URL or drop an image file to begin")
                    .color(egui::Color32::from_gray(180)),
            );
        });
    });
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the image URL field and editor actions.

/// Result of toolbar interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    LoadUrl(String),
    AddText,
    Download,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, url_input: &mut String, has_image: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Image URL:");
        let field = ui.add(
            egui::TextEdit::singleline(url_input)
                .hint_text("https://example.com/image.png")
                .desired_width(320.0),
        );
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Load").clicked() || submitted {
            let url = url_input.trim();
            if !url.is_empty() {
                action = ToolbarAction::LoadUrl(url.to_string());
            }
        }

        ui.separator();

        if ui.add_enabled(has_image, egui::Button::new("➕ Add Text")).clicked() {
            action = ToolbarAction::AddText;
        }
        if ui
            .add_enabled(has_image, egui::Button::new("💾 Download Meme"))
            .clicked()
        {
            action = ToolbarAction::Download;
        }
    });

    action
}

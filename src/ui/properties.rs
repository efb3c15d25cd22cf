// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation properties panel.
//!
//! The panel is populated from the selected annotation every frame, so
//! switching the selection repopulates it. Each changed field is reported
//! as a single edit.

use crate::models::annotation::{AnnotationEdit, Color, TextAnnotation};
use crate::render::fonts::FAMILY_CHOICES;

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    None,
    Edit(AnnotationEdit),
    Delete,
}

/// Display the editor for `annotation`.
pub fn show(ui: &mut egui::Ui, annotation: &TextAnnotation) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Text");
    ui.label(egui::RichText::new(annotation.id.to_string()).weak());
    ui.separator();

    let mut text = annotation.text.clone();
    if ui.text_edit_singleline(&mut text).changed() {
        action = PropertiesAction::Edit(AnnotationEdit::Text(text));
    }

    egui::Grid::new("text_properties")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Font size");
            let mut font_size = annotation.font_size;
            if ui
                .add(
                    egui::Slider::new(&mut font_size, 10.0..=100.0)
                        .integer()
                        .clamp_to_range(false),
                )
                .changed()
            {
                action = PropertiesAction::Edit(AnnotationEdit::FontSize(font_size));
            }
            ui.end_row();

            ui.label("Font");
            let mut family = annotation.font_family.clone();
            egui::ComboBox::from_id_source("font_family")
                .selected_text(short_family(&family))
                .show_ui(ui, |ui| {
                    for choice in FAMILY_CHOICES {
                        ui.selectable_value(&mut family, (*choice).to_string(), short_family(choice));
                    }
                });
            if family != annotation.font_family {
                action = PropertiesAction::Edit(AnnotationEdit::FontFamily(family));
            }
            ui.end_row();

            ui.label("Fill");
            let mut fill = annotation.fill_color.0;
            if ui.color_edit_button_srgb(&mut fill).changed() {
                action = PropertiesAction::Edit(AnnotationEdit::Fill(Color(fill)));
            }
            ui.end_row();

            ui.label("Outline");
            let mut stroke = annotation.stroke_color.0;
            if ui.color_edit_button_srgb(&mut stroke).changed() {
                action = PropertiesAction::Edit(AnnotationEdit::Stroke(Color(stroke)));
            }
            ui.end_row();

            ui.label("Outline width");
            let mut stroke_width = annotation.stroke_width;
            if ui
                .add(
                    egui::Slider::new(&mut stroke_width, 0.0..=10.0)
                        .integer()
                        .clamp_to_range(false),
                )
                .changed()
            {
                action = PropertiesAction::Edit(AnnotationEdit::StrokeWidth(stroke_width));
            }
            ui.end_row();
        });

    ui.add_space(12.0);
    if ui.button("🗑 Delete").clicked() {
        action = PropertiesAction::Delete;
    }

    action
}

/// First family in a CSS fallback list.
fn short_family(family: &str) -> &str {
    family.split(',').next().map(str::trim).unwrap_or(family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::AnnotationId;

    fn show_once(annotation: &TextAnnotation) -> PropertiesAction {
        let ctx = egui::Context::default();
        let mut action = PropertiesAction::None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = show(ui, annotation);
            });
        });
        action
    }

    #[test]
    fn test_untouched_panel_reports_nothing() {
        let annotation = TextAnnotation::new(AnnotationId::new(1));
        assert_eq!(show_once(&annotation), PropertiesAction::None);
    }

    #[test]
    fn test_out_of_range_values_are_kept() {
        let mut annotation = TextAnnotation::new(AnnotationId::new(1));
        annotation.font_size = 150.0;
        annotation.stroke_width = 14.0;
        assert_eq!(show_once(&annotation), PropertiesAction::None);
    }
}

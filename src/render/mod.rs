// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene rendering.
//!
//! A single `render` routine paints the scene onto any `Surface`. The live
//! preview calls it at scale 1 with selection chrome; export calls it at
//! the native resolution without chrome.

pub mod export;
pub mod fonts;
pub mod raster;

use crate::models::annotation::Color;
use crate::models::scene::{BackgroundImage, Scene};
use crate::util::geometry::{self, Point, Rect};

/// Font parameters for a text draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub font_size: f32,
    pub font_family: &'a str,
}

/// A 2D drawing target.
///
/// Text is drawn centred horizontally and vertically on `anchor`.
pub trait Surface {
    fn clear(&mut self);
    /// Paint the background stretched to the full surface.
    fn draw_background(&mut self, image: &BackgroundImage);
    fn stroke_text(&mut self, text: &str, style: TextStyle<'_>, anchor: Point, color: Color, width: f32);
    fn fill_text(&mut self, text: &str, style: TextStyle<'_>, anchor: Point, color: Color);
    fn stroke_dashed_rect(&mut self, rect: Rect, color: Color, width: f32, dash: [f32; 2]);
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

const CHROME_LINE_WIDTH: f32 = 2.0;
const CHROME_DASH: [f32; 2] = [5.0, 5.0];

/// Scale and chrome settings for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub scale_x: f32,
    pub scale_y: f32,
    pub show_selection: bool,
}

impl RenderOptions {
    pub fn preview() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            show_selection: true,
        }
    }

    pub fn export(scale_x: f32, scale_y: f32) -> Self {
        Self {
            scale_x,
            scale_y,
            show_selection: false,
        }
    }

    /// Factor applied to font size and stroke width.
    ///
    /// Anchors scale per axis while glyphs use the smaller factor, so a
    /// non-uniform export stretches layout but not letterforms.
    pub fn uniform_scale(&self) -> f32 {
        self.scale_x.min(self.scale_y)
    }
}

/// Paint the scene onto `surface`.
pub fn render(surface: &mut dyn Surface, scene: &Scene, options: &RenderOptions) {
    surface.clear();
    let Some(background) = scene.background() else {
        return;
    };
    surface.draw_background(background);

    let uniform = options.uniform_scale();
    for annotation in scene.annotations() {
        let center = annotation.anchor();
        let anchor = Point::new(center.x * options.scale_x, center.y * options.scale_y);
        let style = TextStyle {
            font_size: annotation.font_size * uniform,
            font_family: &annotation.font_family,
        };

        if annotation.stroke_width > 0.0 {
            surface.stroke_text(
                &annotation.text,
                style,
                anchor,
                annotation.stroke_color,
                annotation.stroke_width * uniform,
            );
        }
        surface.fill_text(&annotation.text, style, anchor, annotation.fill_color);

        if options.show_selection && scene.selected_id() == Some(annotation.id) {
            let bounds = annotation.bounds();
            surface.stroke_dashed_rect(bounds, Color::ACCENT, CHROME_LINE_WIDTH, CHROME_DASH);
            surface.fill_rect(geometry::resize_handle(bounds), Color::ACCENT);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{DrawCommand, RecordingSurface};
    use super::*;
    use crate::models::annotation::AnnotationEdit;
    use crate::models::scene::PreviewBounds;
    use crate::util::geometry::testing::FixedAdvance;
    use tiny_skia::Pixmap;

    fn scene_with_background() -> Scene {
        let mut scene = Scene::new(PreviewBounds::default());
        scene.load_background(BackgroundImage::new("bg.png", Pixmap::new(400, 200).unwrap()));
        scene
    }

    #[test]
    fn test_empty_scene_only_clears() {
        let scene = Scene::new(PreviewBounds::default());
        let mut surface = RecordingSurface::new(10, 10);
        render(&mut surface, &scene, &RenderOptions::preview());
        assert_eq!(surface.commands, vec![DrawCommand::Clear]);
    }

    #[test]
    fn test_preview_paint_order_and_chrome() {
        let mut scene = scene_with_background();
        let id = scene.add_annotation(&FixedAdvance);
        let annotation = scene.get(id).unwrap().clone();

        let mut surface = RecordingSurface::new(400, 200);
        render(&mut surface, &scene, &RenderOptions::preview());

        assert_eq!(surface.commands.len(), 6);
        assert_eq!(surface.commands[0], DrawCommand::Clear);
        assert!(matches!(surface.commands[1], DrawCommand::Background { .. }));
        assert!(matches!(surface.commands[2], DrawCommand::StrokeText { width, .. } if width == 2.0));
        assert!(matches!(
            &surface.commands[3],
            DrawCommand::FillText { anchor, .. } if *anchor == annotation.anchor()
        ));
        assert_eq!(surface.commands[4], DrawCommand::DashedRect { rect: annotation.bounds() });
        assert_eq!(
            surface.commands[5],
            DrawCommand::FillRect { rect: geometry::resize_handle(annotation.bounds()) }
        );
    }

    #[test]
    fn test_zero_stroke_skips_outline() {
        let mut scene = scene_with_background();
        let id = scene.add_annotation(&FixedAdvance);
        scene.update_annotation(id, AnnotationEdit::StrokeWidth(0.0), &FixedAdvance);
        scene.select(None);

        let mut surface = RecordingSurface::new(400, 200);
        render(&mut surface, &scene, &RenderOptions::preview());
        assert!(!surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::StrokeText { .. })));
        assert!(!surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::DashedRect { .. })));
    }

    #[test]
    fn test_export_options_hide_chrome() {
        let mut scene = scene_with_background();
        scene.add_annotation(&FixedAdvance);

        let mut surface = RecordingSurface::new(800, 400);
        render(&mut surface, &scene, &RenderOptions::export(2.0, 2.0));
        assert!(!surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::DashedRect { .. } | DrawCommand::FillRect { .. })));
    }

    #[test]
    fn test_later_annotations_paint_last() {
        let mut scene = scene_with_background();
        let first = scene.add_annotation(&FixedAdvance);
        scene.update_annotation(first, AnnotationEdit::Text("BOTTOM".into()), &FixedAdvance);
        let second = scene.add_annotation(&FixedAdvance);
        scene.update_annotation(second, AnnotationEdit::Text("TOP".into()), &FixedAdvance);

        let mut surface = RecordingSurface::new(400, 200);
        render(&mut surface, &scene, &RenderOptions::export(1.0, 1.0));
        let fills: Vec<_> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec!["BOTTOM", "TOP"]);
    }
}

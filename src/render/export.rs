// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Full-resolution export.
//!
//! The scene is re-rendered onto a surface the size of the native
//! background image, using the preview-to-source scale factors, and
//! encoded as PNG.

use super::fonts::FontBook;
use super::raster::RasterSurface;
use super::{render, RenderOptions, Surface};
use crate::models::scene::Scene;
use crate::util::geometry;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Render the scene for export onto a surface at native resolution.
///
/// Returns `false` when no background is loaded.
pub fn render_export(surface: &mut dyn Surface, scene: &Scene) -> bool {
    let Some((scale_x, scale_y)) = geometry::preview_to_source(scene) else {
        return false;
    };
    render(surface, scene, &RenderOptions::export(scale_x, scale_y));
    true
}

/// Render and encode the scene as PNG bytes at native resolution.
pub fn export_png(scene: &Scene, fonts: &FontBook) -> Result<Vec<u8>> {
    let background = scene
        .background()
        .ok_or_else(|| anyhow!("no image loaded"))?;
    let mut surface = RasterSurface::new(background.native_width, background.native_height, fonts)
        .ok_or_else(|| anyhow!("cannot allocate export surface"))?;

    render_export(&mut surface, scene);

    let image = surface
        .into_image()
        .ok_or_else(|| anyhow!("cannot construct output image"))?;
    encode_png(&DynamicImage::ImageRgba8(image))
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context("cannot encode PNG")?;
    Ok(buffer.into_inner())
}

/// Download file name for an export made at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("quickmeme_{}.png", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::AnnotationEdit;
    use crate::models::scene::{BackgroundImage, PreviewBounds};
    use crate::render::testing::{DrawCommand, RecordingSurface};
    use crate::util::geometry::testing::FixedAdvance;
    use crate::util::geometry::Point;
    use tiny_skia::Pixmap;

    fn scene(native_width: u32, native_height: u32) -> Scene {
        let mut scene = Scene::new(PreviewBounds::default());
        scene.load_background(BackgroundImage::new(
            "native.png",
            Pixmap::new(native_width, native_height).unwrap(),
        ));
        scene
    }

    #[test]
    fn test_export_anchor_scales_per_axis() {
        // 2000x100 previews at 470x23, so the two axes scale differently.
        let mut scene = scene(2000, 100);
        let id = scene.add_annotation(&FixedAdvance);
        scene.update_annotation(id, AnnotationEdit::Text("HELLO".into()), &FixedAdvance);
        let annotation = scene.get(id).unwrap().clone();
        let (scale_x, scale_y) = geometry::preview_to_source(&scene).unwrap();
        assert!((scale_x - 2000.0 / 470.0).abs() < 1e-4);
        assert!((scale_y - 100.0 / 23.0).abs() < 1e-4);

        let mut surface = RecordingSurface::new(2000, 100);
        assert!(render_export(&mut surface, &scene));

        let expected = Point::new(
            (annotation.x + annotation.width / 2.0) * scale_x,
            (annotation.y + annotation.height / 2.0) * scale_y,
        );
        let uniform = scale_x.min(scale_y);
        let fill = surface
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillText { anchor, font_size, .. } => Some((*anchor, *font_size)),
                _ => None,
            })
            .unwrap();
        assert_eq!(fill.0, expected);
        assert_eq!(fill.1, annotation.font_size * uniform);

        let stroke_width = surface
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::StrokeText { width, .. } => Some(*width),
                _ => None,
            })
            .unwrap();
        assert_eq!(stroke_width, annotation.stroke_width * uniform);
    }

    #[test]
    fn test_export_leaves_preview_coordinates_alone() {
        let mut scene = scene(940, 600);
        let id = scene.add_annotation(&FixedAdvance);
        let before = scene.get(id).unwrap().clone();

        let mut surface = RecordingSurface::new(940, 600);
        render_export(&mut surface, &scene);
        assert_eq!(scene.get(id).unwrap(), &before);
    }

    #[test]
    fn test_export_without_background() {
        let scene = Scene::new(PreviewBounds::default());
        let mut surface = RecordingSurface::new(1, 1);
        assert!(!render_export(&mut surface, &scene));
        assert!(export_png(&scene, &FontBook::empty()).is_err());
    }

    #[test]
    fn test_export_png_is_native_size() {
        let mut scene = scene(1000, 500);
        scene.add_annotation(&FixedAdvance);
        let bytes = export_png(&scene, &FontBook::empty()).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1000, 500));
    }

    #[test]
    fn test_export_file_name_uses_unix_millis() {
        let now = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(export_file_name(now), "quickmeme_1700000000123.png");
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CPU raster surface backed by tiny-skia.
//!
//! Glyphs are turned into vector paths from their ab_glyph outlines so
//! that the outline pass can be stroked the same way a canvas strokes
//! text, then filled on top.

use super::fonts::{line_width, FontBook};
use super::{Surface, TextStyle};
use crate::models::annotation::Color;
use crate::models::scene::BackgroundImage;
use crate::util::geometry::{Point, Rect};
use ab_glyph::{Font, OutlineCurve, PxScale, ScaleFont};
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Stroke, StrokeDash, Transform,
};

/// Premultiply an RGBA image into a pixmap.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Demultiply a pixmap into straight RGBA bytes.
pub fn rgba_bytes(pixmap: &Pixmap) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        bytes.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    bytes
}

/// A pixmap surface that draws text with fonts from a `FontBook`.
pub struct RasterSurface<'a> {
    pixmap: Pixmap,
    fonts: &'a FontBook,
}

impl<'a> RasterSurface<'a> {
    /// Returns `None` for a zero-sized surface.
    pub fn new(width: u32, height: u32, fonts: &'a FontBook) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            fonts,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_image(self) -> Option<RgbaImage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        RgbaImage::from_raw(width, height, rgba_bytes(&self.pixmap))
    }

    fn text_path(&self, text: &str, style: TextStyle<'_>, anchor: Point) -> Option<Path> {
        let font = self.fonts.resolve(style.font_family)?;
        let scaled = font.as_scaled(PxScale::from(style.font_size));
        let (h_factor, v_factor) = (scaled.h_scale_factor(), scaled.v_scale_factor());

        let width = line_width(&scaled, text);
        let mut caret = anchor.x - width / 2.0;
        // Middle baseline: the em box is centred on the anchor.
        let baseline = anchor.y + (scaled.ascent() + scaled.descent()) / 2.0;

        let mut builder = PathBuilder::new();
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            if let Some(outline) = font.outline(id) {
                let to_screen = |p: ab_glyph::Point| (caret + p.x * h_factor, baseline - p.y * v_factor);
                push_outline(&mut builder, &outline.curves, to_screen);
            }
            caret += scaled.h_advance(id);
            previous = Some(id);
        }
        builder.finish()
    }
}

/// Append one glyph's contours, starting a new subpath at every gap.
fn push_outline(
    builder: &mut PathBuilder,
    curves: &[OutlineCurve],
    to_screen: impl Fn(ab_glyph::Point) -> (f32, f32),
) {
    let mut last: Option<ab_glyph::Point> = None;
    for curve in curves {
        let (start, end) = match *curve {
            OutlineCurve::Line(p0, p1) => (p0, p1),
            OutlineCurve::Quad(p0, _, p2) => (p0, p2),
            OutlineCurve::Cubic(p0, _, _, p3) => (p0, p3),
        };
        if last != Some(start) {
            if last.is_some() {
                builder.close();
            }
            let (x, y) = to_screen(start);
            builder.move_to(x, y);
        }
        match *curve {
            OutlineCurve::Line(_, p1) => {
                let (x, y) = to_screen(p1);
                builder.line_to(x, y);
            }
            OutlineCurve::Quad(_, p1, p2) => {
                let (x1, y1) = to_screen(p1);
                let (x, y) = to_screen(p2);
                builder.quad_to(x1, y1, x, y);
            }
            OutlineCurve::Cubic(_, p1, p2, p3) => {
                let (x1, y1) = to_screen(p1);
                let (x2, y2) = to_screen(p2);
                let (x, y) = to_screen(p3);
                builder.cubic_to(x1, y1, x2, y2, x, y);
            }
        }
        last = Some(end);
    }
    if last.is_some() {
        builder.close();
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let [r, g, b] = color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;
    paint
}

impl Surface for RasterSurface<'_> {
    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn draw_background(&mut self, image: &BackgroundImage) {
        let bitmap: &Pixmap = &image.bitmap;
        let transform = Transform::from_scale(
            self.pixmap.width() as f32 / bitmap.width() as f32,
            self.pixmap.height() as f32 / bitmap.height() as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap.draw_pixmap(0, 0, bitmap.as_ref(), &paint, transform, None);
    }

    fn stroke_text(&mut self, text: &str, style: TextStyle<'_>, anchor: Point, color: Color, width: f32) {
        let Some(path) = self.text_path(text, style, anchor) else {
            return;
        };
        let stroke = Stroke {
            width,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, style: TextStyle<'_>, anchor: Point, color: Color) {
        let Some(path) = self.text_path(text, style, anchor) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint_for(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn stroke_dashed_rect(&mut self, rect: Rect, color: Color, width: f32, dash: [f32; 2]) {
        let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width,
            dash: StrokeDash::new(dash.to_vec(), 0.0),
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint_for(color), Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid_background(width: u32, height: u32, rgba: [u8; 4]) -> BackgroundImage {
        let image = RgbaImage::from_pixel(width, height, Rgba(rgba));
        BackgroundImage::new("solid.png", pixmap_from_rgba(&image).unwrap())
    }

    #[test]
    fn test_rgba_conversion_preserves_opaque_pixels() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([12, 200, 99, 255]));
        let pixmap = pixmap_from_rgba(&image).unwrap();
        assert_eq!(rgba_bytes(&pixmap), image.as_raw().clone());
    }

    #[test]
    fn test_zero_sized_surface_is_rejected() {
        let fonts = FontBook::empty();
        assert!(RasterSurface::new(0, 10, &fonts).is_none());
    }

    #[test]
    fn test_background_stretches_to_surface() {
        let fonts = FontBook::empty();
        let mut surface = RasterSurface::new(40, 20, &fonts).unwrap();
        surface.clear();
        surface.draw_background(&solid_background(400, 200, [255, 0, 0, 255]));

        let image = surface.into_image().unwrap();
        assert_eq!(image.dimensions(), (40, 20));
        for (x, y) in [(0, 0), (20, 10), (39, 19)] {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            assert!(r > 250 && g < 5 && b < 5 && a > 250);
        }
    }

    #[test]
    fn test_handle_marker_fills_square() {
        let fonts = FontBook::empty();
        let mut surface = RasterSurface::new(20, 20, &fonts).unwrap();
        surface.clear();
        surface.fill_rect(Rect::new(4.0, 4.0, 8.0, 8.0), Color::ACCENT);

        let image = surface.into_image().unwrap();
        assert_eq!(image.get_pixel(8, 8).0, [0x00, 0x7c, 0xba, 255]);
        assert_eq!(image.get_pixel(16, 16).0[3], 0);
    }

    #[test]
    fn test_text_without_fonts_draws_nothing() {
        let fonts = FontBook::empty();
        let mut surface = RasterSurface::new(20, 20, &fonts).unwrap();
        surface.clear();
        let style = TextStyle {
            font_size: 12.0,
            font_family: "Impact",
        };
        surface.fill_text("HI", style, Point::new(10.0, 10.0), Color::WHITE);
        assert!(surface.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }
}

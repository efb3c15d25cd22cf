// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric and text-metric utility functions.
//!
//! This module provides the pure helpers shared by the scene model, the
//! interaction controller and the renderer: annotation footprints derived
//! from text metrics, preview sizing, and the scale factors between the
//! preview canvas and the native background image.

use crate::models::scene::Scene;

/// Smallest width an annotation may have.
pub const MIN_WIDTH: f32 = 50.0;

/// Smallest height an annotation may have.
pub const MIN_HEIGHT: f32 = 20.0;

/// Padding added around measured text.
const TEXT_PADDING: f32 = 20.0;

/// Side length of the square resize handle.
pub const HANDLE_SIZE: f32 = 8.0;

/// Default preview bounds.
pub const DEFAULT_MAX_WIDTH: f32 = 470.0;
pub const DEFAULT_MAX_HEIGHT: f32 = 300.0;

/// A 2D point in preview-canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive containment test on all four edges.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// The resize handle square centred on the bottom-right corner of `bounds`.
pub fn resize_handle(bounds: Rect) -> Rect {
    let half = HANDLE_SIZE / 2.0;
    Rect::new(
        bounds.x + bounds.width - half,
        bounds.y + bounds.height - half,
        HANDLE_SIZE,
        HANDLE_SIZE,
    )
}

/// Measures rendered text widths for a bold face of the given family.
pub trait TextMeasurer {
    /// Width in pixels of `text` drawn as `bold {font_size}px {font_family}`.
    fn text_width(&self, text: &str, font_size: f32, font_family: &str) -> f32;
}

/// Compute an annotation's footprint from its text and font.
pub fn measure_text(
    measurer: &dyn TextMeasurer,
    text: &str,
    font_size: f32,
    font_family: &str,
) -> (f32, f32) {
    let measured = measurer.text_width(text, font_size, font_family);
    ((measured + TEXT_PADDING).max(MIN_WIDTH), font_size + TEXT_PADDING)
}

/// Fit native image dimensions into the preview bounds.
///
/// The width is clamped first, then the resulting height. Running the
/// passes in this order means the second pass can shrink a width that the
/// first pass already reduced, which differs from a single min-ratio fit.
pub fn fit_to_bounds(
    native_width: f32,
    native_height: f32,
    max_width: f32,
    max_height: f32,
) -> (f32, f32) {
    let mut width = native_width;
    let mut height = native_height;

    if width > max_width {
        let ratio = max_width / width;
        width = max_width;
        height *= ratio;
    }

    if height > max_height {
        let ratio = max_height / height;
        height = max_height;
        width *= ratio;
    }

    (width, height)
}

/// Scale factors from preview space to native image space.
///
/// Returns `None` until a background image is loaded.
pub fn preview_to_source(scene: &Scene) -> Option<(f32, f32)> {
    let background = scene.background()?;
    let (preview_width, preview_height) = scene.preview_size();
    Some((
        background.native_width as f32 / preview_width as f32,
        background.native_height as f32 / preview_height as f32,
    ))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TextMeasurer;

    /// Measurer with a fixed advance of half the font size per character.
    pub struct FixedAdvance;

    impl TextMeasurer for FixedAdvance {
        fn text_width(&self, text: &str, font_size: f32, _font_family: &str) -> f32 {
            text.chars().count() as f32 * font_size * 0.5
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FixedAdvance;
    use super::*;

    #[test]
    fn test_fit_wide_image_clamps_width_first() {
        let (w, h) = fit_to_bounds(2000.0, 100.0, DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT);
        assert_eq!(w, 470.0);
        assert!((h - 23.5).abs() < 0.0001);
        assert!(h <= DEFAULT_MAX_HEIGHT);
    }

    #[test]
    fn test_fit_tall_image_runs_second_pass() {
        let (w, h) = fit_to_bounds(100.0, 2000.0, DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT);
        assert_eq!(h, 300.0);
        assert!((w - 15.0).abs() < 0.0001);
    }

    #[test]
    fn test_fit_both_dimensions_exceed() {
        // Width is clamped to 470 first (height 600), then height still
        // exceeds 300 and the second pass halves the width again.
        let (w, h) = fit_to_bounds(940.0, 1200.0, DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT);
        assert_eq!(h, 300.0);
        assert!((w - 235.0).abs() < 0.0001);
    }

    #[test]
    fn test_fit_leaves_small_images_alone() {
        assert_eq!(fit_to_bounds(320.0, 200.0, 470.0, 300.0), (320.0, 200.0));
        assert_eq!(fit_to_bounds(470.0, 300.0, 470.0, 300.0), (470.0, 300.0));
    }

    #[test]
    fn test_measure_text_applies_padding_and_floor() {
        let (w, h) = measure_text(&FixedAdvance, "HELLO", 40.0, "Impact");
        assert_eq!(w, 5.0 * 20.0 + 20.0);
        assert_eq!(h, 60.0);

        let (w, h) = measure_text(&FixedAdvance, "", 10.0, "Impact");
        assert_eq!(w, MIN_WIDTH);
        assert_eq!(h, 30.0);
    }

    #[test]
    fn test_measure_text_is_monotonic_in_font_size() {
        let mut last = (0.0, 0.0);
        for size in [1.0, 8.0, 12.0, 24.0, 40.0, 72.0, 120.0] {
            let (w, h) = measure_text(&FixedAdvance, "Hi", size, "Impact");
            assert!(h >= last.1);
            assert!(w >= last.0);
            assert!(w >= MIN_WIDTH);
            last = (w, h);
        }
    }

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = Rect::new(10.0, 10.0, 20.0, 10.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(30.0, 20.0)));
        assert!(!rect.contains(Point::new(30.1, 20.0)));
        assert!(!rect.contains(Point::new(9.9, 15.0)));
        assert_eq!(rect.center(), Point::new(20.0, 15.0));
    }

    #[test]
    fn test_resize_handle_straddles_corner() {
        let handle = resize_handle(Rect::new(50.0, 50.0, 100.0, 40.0));
        assert_eq!(handle, Rect::new(146.0, 86.0, 8.0, 8.0));
        assert!(handle.contains(Point::new(150.0, 90.0)));
        assert!(handle.contains(Point::new(154.0, 94.0)));
        assert!(!handle.contains(Point::new(145.0, 90.0)));
    }
}

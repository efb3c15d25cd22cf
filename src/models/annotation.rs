// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the text caption record placed over the background
//! image, its identifier and color types, and the edits the property panel
//! can apply to it.

use crate::util::geometry::{Point, Rect, MIN_HEIGHT, MIN_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder text for new annotations.
pub const DEFAULT_TEXT: &str = "Your text here";
pub const DEFAULT_FONT_SIZE: f32 = 40.0;
pub const DEFAULT_FONT_FAMILY: &str = "Impact, Arial Black, sans-serif";
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
pub const DEFAULT_POSITION: Point = Point { x: 50.0, y: 50.0 };

/// Stable identifier of an annotation, serialized as `text_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnotationId(u64);

impl AnnotationId {
    pub fn new(counter: u64) -> Self {
        Self(counter)
    }

    pub fn counter(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text_{}", self.0)
    }
}

impl From<AnnotationId> for String {
    fn from(id: AnnotationId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for AnnotationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .strip_prefix("text_")
            .and_then(|n| n.parse().ok())
            .map(Self)
            .ok_or_else(|| format!("invalid annotation id '{value}'"))
    }
}

/// An opaque RGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Self = Self([0xff, 0xff, 0xff]);
    pub const BLACK: Self = Self([0x00, 0x00, 0x00]);
    /// Selection chrome.
    pub const ACCENT: Self = Self([0x00, 0x7c, 0xba]);

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            6 => Some(Self([
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ])),
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 16 + v;
                }
                Some(Self(rgb))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

/// A movable, resizable text caption in preview-canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub id: AnnotationId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub font_family: String,
    #[serde(rename = "fill")]
    pub fill_color: Color,
    #[serde(rename = "stroke")]
    pub stroke_color: Color,
    pub stroke_width: f32,
    #[serde(default)]
    pub selected: bool,
}

impl TextAnnotation {
    /// Create an annotation with the default style at the default position.
    ///
    /// The size is a placeholder until the scene measures the text.
    pub fn new(id: AnnotationId) -> Self {
        Self {
            id,
            text: DEFAULT_TEXT.to_string(),
            x: DEFAULT_POSITION.x,
            y: DEFAULT_POSITION.y,
            width: 200.0,
            height: 50.0,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            fill_color: Color::WHITE,
            stroke_color: Color::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
            selected: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Glyph anchor in preview space.
    pub fn anchor(&self) -> Point {
        self.bounds().center()
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Set the size, never going below the interactable floor.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width.max(MIN_WIDTH);
        self.height = height.max(MIN_HEIGHT);
    }
}

/// A single property edit from the side panel.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEdit {
    Text(String),
    FontSize(f32),
    FontFamily(String),
    Fill(Color),
    Stroke(Color),
    StrokeWidth(f32),
}

impl AnnotationEdit {
    /// Whether applying this edit invalidates the measured size.
    pub fn remeasures(&self) -> bool {
        matches!(self, Self::Text(_) | Self::FontSize(_))
    }

    pub(crate) fn apply(self, annotation: &mut TextAnnotation) {
        match self {
            Self::Text(text) => annotation.text = text,
            Self::FontSize(size) => annotation.font_size = size.max(1.0),
            Self::FontFamily(family) => annotation.font_family = family,
            Self::Fill(color) => annotation.fill_color = color,
            Self::Stroke(color) => annotation.stroke_color = color,
            Self::StrokeWidth(width) => annotation.stroke_width = width.max(0.0),
        }
    }
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Font discovery and text metrics.
//!
//! Font families are CSS-style fallback lists such as
//! `"Impact, Arial Black, sans-serif"`. Each entry is resolved against the
//! font files found in the configured and system font directories, bold
//! faces first. When nothing resolves, the first font found is used, and
//! with no fonts at all widths are estimated and text is not painted.

use crate::util::geometry::TextMeasurer;
use ab_glyph::{Font, FontArc, PxScale, PxScaleFont, ScaleFont};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Advance per character, in ems, when no font is available.
const FALLBACK_ADVANCE: f32 = 0.6;

/// Directory recursion limit while scanning for font files.
const MAX_SCAN_DEPTH: usize = 4;

/// Candidate file stems per family, most preferred first.
///
/// Stems are compared lowercased with spaces, dashes and underscores
/// removed.
const FAMILY_ALIASES: &[(&str, &[&str])] = &[
    ("impact", &["impact"]),
    ("arial black", &["ariblk", "arialblack"]),
    ("arial", &["arialbd", "arialbold", "liberationsansbold", "arial"]),
    ("helvetica", &["helveticabold", "helvetica"]),
    ("comic sans ms", &["comicbd", "comicsansmsbold", "comicsansms", "comic"]),
    ("times new roman", &["timesbd", "timesnewromanbold", "liberationserifbold", "times"]),
    ("courier new", &["courbd", "couriernewbold", "liberationmonobold", "cour"]),
    ("sans-serif", &["dejavusansbold", "liberationsansbold", "notosansbold", "freesansbold", "dejavusans"]),
    ("serif", &["dejavuserifbold", "liberationserifbold", "notoserifbold", "dejavuserif"]),
    ("monospace", &["dejavusansmonobold", "liberationmonobold", "dejavusansmono"]),
    ("cursive", &["comicbd", "comicsansms", "dejavusansbold"]),
];

/// Font families offered in the property panel.
pub const FAMILY_CHOICES: &[&str] = &[
    "Impact, Arial Black, sans-serif",
    "Arial, sans-serif",
    "Comic Sans MS, cursive",
    "Times New Roman, serif",
    "Courier New, monospace",
];

/// Loaded fonts keyed by lowercase family name.
#[derive(Default)]
pub struct FontBook {
    families: HashMap<String, FontArc>,
    fallback: Option<FontArc>,
}

impl FontBook {
    /// A book with no fonts, measuring with the fixed fallback advance.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `extra_dirs` then the platform font directories.
    pub fn discover(extra_dirs: &[PathBuf]) -> Self {
        let mut dirs: Vec<PathBuf> = extra_dirs.to_vec();
        dirs.extend(system_font_dirs());

        let mut files: HashMap<String, PathBuf> = HashMap::new();
        for dir in &dirs {
            scan_dir(dir, 0, &mut files);
        }

        let book = Self::from_files(&files);
        if book.is_empty() {
            log::warn!("No usable fonts found; text will be measured approximately and not painted");
        } else {
            log::info!("Loaded {} font families", book.families.len());
        }
        book
    }

    fn from_files(files: &HashMap<String, PathBuf>) -> Self {
        let mut book = Self::default();
        let mut loaded: HashMap<PathBuf, FontArc> = HashMap::new();

        for (family, stems) in FAMILY_ALIASES {
            let Some(path) = stems.iter().find_map(|stem| files.get(*stem)) else {
                continue;
            };
            let font = match loaded.get(path) {
                Some(font) => font.clone(),
                None => match load_font(path) {
                    Some(font) => {
                        loaded.insert(path.clone(), font.clone());
                        font
                    }
                    None => continue,
                },
            };
            if book.fallback.is_none() {
                book.fallback = Some(font.clone());
            }
            book.families.insert((*family).to_string(), font);
        }

        book
    }

    pub fn is_empty(&self) -> bool {
        self.fallback.is_none()
    }

    /// Resolve a CSS-style family list to a loaded font.
    pub fn resolve(&self, font_family: &str) -> Option<&FontArc> {
        font_family
            .split(',')
            .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
            .find_map(|name| self.families.get(&name))
            .or(self.fallback.as_ref())
    }
}

impl TextMeasurer for FontBook {
    fn text_width(&self, text: &str, font_size: f32, font_family: &str) -> f32 {
        let Some(font) = self.resolve(font_family) else {
            return text.chars().count() as f32 * font_size * FALLBACK_ADVANCE;
        };
        line_width(&font.as_scaled(PxScale::from(font_size)), text)
    }
}

/// Advance width of a single line, kerning included.
pub(crate) fn line_width<F: Font>(scaled: &PxScaleFont<F>, text: &str) -> f32 {
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

fn load_font(path: &Path) -> Option<FontArc> {
    let bytes = std::fs::read(path).ok()?;
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            log::debug!("Skipping font {}: {}", path.display(), e);
            None
        }
    }
}

fn normalize_stem(stem: &str) -> String {
    stem.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn scan_dir(dir: &Path, depth: usize, files: &mut HashMap<String, PathBuf>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, depth + 1, files);
            continue;
        }
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
        if !is_font {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.entry(normalize_stem(stem)).or_insert(path);
        }
    }
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        dirs.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".fonts"));
    }
    for dir in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/System/Library/Fonts",
        "/Library/Fonts",
        "C:\\Windows\\Fonts",
    ] {
        dirs.push(PathBuf::from(dir));
    }
    dirs
}

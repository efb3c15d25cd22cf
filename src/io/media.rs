// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background image loading.
//!
//! Images are addressed by URL: `http(s)://` sources are fetched with
//! `curl`, `file://` URLs and plain paths are read from disk. Decoded
//! pixels are premultiplied once into the bitmap the renderers draw from.

use crate::error::ImageLoadError;
use crate::models::scene::BackgroundImage;
use crate::render::raster::pixmap_from_rgba;
use std::path::PathBuf;
use std::process::Command;

/// Where an image URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Local(PathBuf),
}

impl ImageSource {
    pub fn parse(url: &str) -> Result<Self, ImageLoadError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ImageLoadError::MalformedUrl(url.to_string()));
        }

        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            if url.split_once("://").is_some_and(|(_, rest)| rest.is_empty()) {
                return Err(ImageLoadError::MalformedUrl(url.to_string()));
            }
            return Ok(Self::Remote(url.to_string()));
        }
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(Self::Local(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = url.split_once("://") {
            if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ImageLoadError::MalformedUrl(url.to_string()));
            }
        }
        Ok(Self::Local(PathBuf::from(url)))
    }

    fn read(&self) -> Result<Vec<u8>, ImageLoadError> {
        match self {
            Self::Local(path) => Ok(std::fs::read(path)?),
            Self::Remote(url) => fetch(url),
        }
    }
}

fn fetch(url: &str) -> Result<Vec<u8>, ImageLoadError> {
    let output = Command::new("curl")
        .args(["-fsSL", "--max-time", "30"])
        .arg(url)
        .output()
        .map_err(|e| ImageLoadError::Network {
            url: url.to_string(),
            reason: format!("failed to run curl: {}", e),
        })?;

    if !output.status.success() {
        return Err(ImageLoadError::Network {
            url: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}

/// Decode image bytes into a background image.
pub fn decode_image(source: &str, bytes: &[u8]) -> Result<BackgroundImage, ImageLoadError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let bitmap = pixmap_from_rgba(&rgba).ok_or(ImageLoadError::Empty)?;
    Ok(BackgroundImage::new(source, bitmap))
}

/// Load and decode the image at `url`. Blocks; run off the UI thread.
pub fn load_image(url: &str) -> Result<BackgroundImage, ImageLoadError> {
    let bytes = ImageSource::parse(url)?.read()?;
    let image = decode_image(url.trim(), &bytes)?;
    log::info!(
        "Loaded image: {} ({}x{})",
        url,
        image.native_width,
        image.native_height
    );
    Ok(image)
}

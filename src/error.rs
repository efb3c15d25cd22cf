// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error kinds surfaced by the editor.
//!
//! Neither kind is fatal: image load failures become status text and leave
//! the scene untouched, storage failures are logged and ignored.

use thiserror::Error;

/// A background image could not be loaded.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("malformed image URL '{0}'")]
    MalformedUrl(String),

    #[error("failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    Empty,
}

/// The key-value store could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no data directory available")]
    Unavailable,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage data is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Read from `$QUICKMEME_CONFIG` or `<config_dir>/quickmeme/config.yaml`.
//! Every field has a default, so a missing file or missing keys are fine.

use crate::models::scene::PreviewBounds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "QUICKMEME_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Directories searched before the system font directories.
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage file override.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Show a save dialog instead of writing straight to `directory`.
    pub ask_for_location: bool,
    /// Download directory override.
    pub directory: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ask_for_location: true,
            directory: None,
        }
    }
}

impl ExportConfig {
    /// Configured directory, else the user's downloads, else home.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub preview: PreviewBounds,
    pub fonts: FontConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
}

impl EditorConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid config YAML")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_yaml(&yaml)
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("quickmeme").join("config.yaml"))
    }

    /// Load the config, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// User-tunable settings
///
/// Read once at startup from `<config_dir>/photo-archive/settings.json`.
/// The file is optional and never written back.
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Allowed grid column counts
pub const GRID_COLUMNS_RANGE: RangeInclusive<usize> = 1..=10;

/// Allowed photos per page
pub const PAGE_SIZE_RANGE: RangeInclusive<usize> = 1..=24;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Thumbnails per grid row
    pub grid_columns: usize,

    /// Thumbnails per page
    pub photos_per_page: usize,

    /// Extra pixels added to each viewer axis around the image
    pub window_padding: u32,

    /// Multiplicative zoom applied per wheel notch
    pub zoom_step: f32,

    /// Largest viewer frame [width, height]; bigger images can be panned
    pub max_window: [u32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_columns: 4,
            photos_per_page: 12,
            window_padding: 100,
            zoom_step: 1.1,
            max_window: [1600, 1000],
        }
    }
}

impl Settings {
    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| Error::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from the user config directory, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit file. Missing or invalid files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                info!("⚙️  Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("⚠️  Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Where the settings file is looked up
    /// - Linux: ~/.config/photo-archive/settings.json
    /// - macOS: ~/Library/Application Support/photo-archive/settings.json
    /// - Windows: %APPDATA%\photo-archive\settings.json
    fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("photo-archive");
        path.push("settings.json");
        Some(path)
    }

    fn validate(&self) -> Result<()> {
        if !GRID_COLUMNS_RANGE.contains(&self.grid_columns) {
            return Err(Error::Settings(format!(
                "grid_columns must be in {GRID_COLUMNS_RANGE:?}, got {}",
                self.grid_columns
            )));
        }
        if !PAGE_SIZE_RANGE.contains(&self.photos_per_page) {
            return Err(Error::Settings(format!(
                "photos_per_page must be in {PAGE_SIZE_RANGE:?}, got {}",
                self.photos_per_page
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(Error::Settings(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.max_window.contains(&0) {
            return Err(Error::Settings("max_window must be non-zero".to_string()));
        }
        Ok(())
    }
}

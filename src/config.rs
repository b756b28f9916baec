//! Album configuration.
//!
//! Handles loading, validating, and merging `config.toml` files. Configuration
//! is hierarchical: stock defaults are overridden by the root album's file,
//! which is overridden by each sub-album's file, and so on down the tree.
//!
//! ## Config File Location
//!
//! ```text
//! photos/
//! ├── config.toml              # Root config (overrides stock defaults)
//! ├── Holidays/
//! │   ├── config.toml          # Overrides root for Holidays and below
//! │   └── Crete/
//! │       ├── config.toml      # Overrides Holidays for Crete only
//! │       └── ...
//! └── Family/
//!     └── ...                  # Inherits root unchanged
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: a file defines only the keys it wants to change
//! and every other key is inherited from the parent album.
//!
//! ```toml
//! title = "Holidays"
//! max_per_page = 24
//! effect = ""           # empty string disables the photo effect
//! ```
//!
//! Unknown keys are rejected to catch typos early. A file that fails to parse
//! or validate is reported and ignored; the album inherits its parent's
//! configuration unchanged.

use crate::imaging::Background;
use crate::naming::CONFIG_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Effective configuration of one album.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override. For optional text options, an empty string means "off".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumConfig {
    /// Site title, shown as the root breadcrumb and in page titles.
    pub title: String,
    /// Author shown in the footer, page metadata, and feed items.
    pub author: String,
    /// Label placed before the author in the footer.
    pub author_label: String,
    /// Stylesheet path, relative to the site root.
    pub css: String,
    /// Append `index.html` to navigation links (for file:// browsing).
    pub explicit_index_html: bool,
    /// Render the black/white skin switcher.
    pub style_switcher: bool,
    /// Show sub-album titles under their highlight.
    pub show_title_album: bool,
    /// Show photo and album counts.
    pub show_stats_album: bool,
    /// Show image names.
    pub show_title_photo: bool,
    /// Show captions.
    pub show_description: bool,
    /// Use the caption as the image name and hide the separate caption.
    pub description_as_name: bool,
    /// Show the capture or modification date of each image.
    pub show_date: bool,
    /// Prefer the EXIF capture date over the file modification time.
    pub use_exif_date: bool,
    /// Show exposure, focal length and aperture when EXIF data is present.
    pub show_exif: bool,
    /// Also show the camera model.
    pub show_extended_exif: bool,
    /// Bounding box `[width, height]` of generated thumbnails.
    pub thumbnail_size: [u32; 2],
    /// Enable panning in the image viewer.
    pub panning: bool,
    /// Enable fading in the image viewer.
    pub fading: bool,
    pub label_no_photo: String,
    pub label_one_photo: String,
    /// `#` is replaced with the count.
    pub label_more_photos: String,
    pub label_one_album: String,
    /// `#` is replaced with the count.
    pub label_more_albums: String,
    /// Write `photos.rss` for every album.
    pub generate_rss: bool,
    /// Google Analytics account id; empty disables tracking.
    pub google_analytics: String,
    /// Footer license text; empty means "All rights reserved."
    pub copyright: String,
    /// Do not descend into sub-albums.
    pub nonrecursive: bool,
    /// Items per page; zero or negative disables pagination.
    pub max_per_page: i64,
    /// Log resolved captions for every album.
    pub debug: bool,
    /// Effect applied to photo thumbnails; empty disables it.
    pub effect: String,
    /// Effect applied to album highlights; empty copies a plain thumbnail.
    pub effect_album: String,
    /// Background behind effects: `none` or a hex color.
    pub effect_background: String,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            title: "Photo Album".to_string(),
            author: String::new(),
            author_label: "Authors".to_string(),
            css: "album.css".to_string(),
            explicit_index_html: false,
            style_switcher: true,
            show_title_album: true,
            show_stats_album: true,
            show_title_photo: true,
            show_description: true,
            description_as_name: false,
            show_date: true,
            use_exif_date: true,
            show_exif: true,
            show_extended_exif: false,
            thumbnail_size: [256, 256],
            panning: false,
            fading: false,
            label_no_photo: "no photos".to_string(),
            label_one_photo: "one photo".to_string(),
            label_more_photos: "# photos".to_string(),
            label_one_album: "one album".to_string(),
            label_more_albums: "# albums".to_string(),
            generate_rss: true,
            google_analytics: String::new(),
            copyright: String::new(),
            nonrecursive: false,
            max_per_page: -1,
            debug: false,
            effect: "polaroid".to_string(),
            effect_album: "polaroid_stack".to_string(),
            effect_background: "#000000".to_string(),
        }
    }
}

impl AlbumConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail_size[0] == 0 || self.thumbnail_size[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnail_size values must be non-zero".into(),
            ));
        }
        if Background::parse(&self.effect_background).is_none() {
            return Err(ConfigError::Validation(format!(
                "effect_background must be \"none\" or a hex color, got {:?}",
                self.effect_background
            )));
        }
        Ok(())
    }

    /// Merge a partial config on top of this one, key by key.
    ///
    /// Keys present in `partial` win; every other key keeps this config's
    /// value. The result is deserialized (unknown keys rejected) and validated.
    pub fn overlay(&self, partial: toml::Value) -> Result<AlbumConfig, ConfigError> {
        let base = toml::Value::try_from(self)?;
        let config: AlbumConfig = merge_toml(base, partial).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Thumbnail bounding box as `(width, height)`.
    pub fn thumbnail_bounds(&self) -> (u32, u32) {
        (self.thumbnail_size[0], self.thumbnail_size[1])
    }

    /// Background behind effects. Validated configs always parse.
    pub fn background(&self) -> Background {
        Background::parse(&self.effect_background).unwrap_or_default()
    }
}

/// Turn an empty option string into `None`.
pub fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a directory's `config.toml` as a raw partial config.
///
/// Returns `Ok(None)` if the directory has no config file.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_partial(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Effective config of `dir`: its partial config merged onto `parent`.
///
/// A missing file inherits `parent` unchanged. A malformed or invalid file is
/// logged and also inherits `parent` unchanged.
pub fn resolve_for_dir(parent: &AlbumConfig, dir: &Path) -> AlbumConfig {
    let resolved = load_partial(dir).and_then(|partial| match partial {
        Some(value) => parent.overlay(value).map(Some),
        None => Ok(None),
    });
    match resolved {
        Ok(Some(config)) => {
            tracing::info!("{} found for album {}", CONFIG_FILE, dir.display());
            config
        }
        Ok(None) => parent.clone(),
        Err(e) => {
            tracing::warn!(
                "ignoring {} in {}: {}",
                CONFIG_FILE,
                dir.display(),
                e
            );
            parent.clone()
        }
    }
}

/// Config of the site root: its `config.toml` merged onto the stock defaults.
pub fn load_root_config(root: &Path) -> AlbumConfig {
    resolve_for_dir(&AlbumConfig::default(), root)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Album Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# A config.toml can be placed in any album directory. It overrides the
# parent album's settings for that album and everything below it.
# Each level only needs the keys it wants to override.
# Unknown keys are reported and the file is ignored.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
title = "Photo Album"
author = ""
author_label = "Authors"
# Stylesheet, relative to the site root.
css = "album.css"
# Footer license text. Empty means "All rights reserved."
copyright = ""
# Google Analytics account id. Empty disables tracking.
google_analytics = ""
# Append index.html to navigation links (useful for file:// browsing).
explicit_index_html = false
style_switcher = true

# ---------------------------------------------------------------------------
# What to show
# ---------------------------------------------------------------------------
show_title_album = true
show_stats_album = true
show_title_photo = true
show_description = true
# Use the caption as the image name.
description_as_name = false
show_date = true
# Prefer the EXIF capture date over the file modification time.
use_exif_date = true
show_exif = true
show_extended_exif = false

# ---------------------------------------------------------------------------
# Labels ('#' is replaced with the count)
# ---------------------------------------------------------------------------
label_no_photo = "no photos"
label_one_photo = "one photo"
label_more_photos = "# photos"
label_one_album = "one album"
label_more_albums = "# albums"

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
# Items (sub-albums + photos) per page. Zero or negative disables pagination.
max_per_page = -1
# Do not descend into sub-albums.
nonrecursive = false
generate_rss = true
# Log resolved captions.
debug = false

# ---------------------------------------------------------------------------
# Thumbnails and effects
# ---------------------------------------------------------------------------
# Bounding box [width, height] of generated thumbnails.
thumbnail_size = [256, 256]
# shadow, glow, reflection, polaroid, rotate, stack, polaroid_stack.
# Empty disables the effect.
effect = "polaroid"
effect_album = "polaroid_stack"
# "none" or a hex color.
effect_background = "#000000"

# ---------------------------------------------------------------------------
# Image viewer
# ---------------------------------------------------------------------------
panning = false
fading = false
"##
}

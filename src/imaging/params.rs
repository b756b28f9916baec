//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`ThumbnailCache`](crate::cache::ThumbnailCache)
//! (which decides what images to create) and the [`backend`](super::backend)
//! (which does the actual pixel work), so a mock backend can stand in during
//! tests without changing cache logic.
//!
//! ## Types
//!
//! - [`Background`]: fill behind effects, transparent or an RGBA color.
//! - [`RasterizeParams`]: source, output, bounding box and blur of a thumbnail.
//! - [`EffectParams`]: file to transform in place, effect name and background.

use std::path::PathBuf;

/// Fill placed behind effect output and used when flattening JPEG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Transparent,
    Color([u8; 4]),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color([0, 0, 0, 255])
    }
}

impl Background {
    /// Parse `none`, `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("none") {
            return Some(Background::Transparent);
        }
        let hex = value.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut rgba = [255u8; 4];
                for (i, c) in hex.chars().enumerate() {
                    let digit = channel(&c.to_string())?;
                    rgba[i] = digit * 17;
                }
                Some(Background::Color(rgba))
            }
            6 | 8 => {
                let mut rgba = [255u8; 4];
                for i in 0..hex.len() / 2 {
                    rgba[i] = channel(&hex[i * 2..i * 2 + 2])?;
                }
                Some(Background::Color(rgba))
            }
            _ => None,
        }
    }

    /// Opaque color used when an output format has no alpha channel.
    pub fn flatten_rgb(self) -> [u8; 3] {
        match self {
            Background::Transparent => [255, 255, 255],
            Background::Color([r, g, b, _]) => [r, g, b],
        }
    }
}

/// Parameters for rasterizing a thumbnail that fits a bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    /// Gaussian blur sigma applied after scaling; zero disables it.
    pub blur: f32,
}

/// Parameters for an in-place effect on an existing thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParams {
    pub path: PathBuf,
    pub effect: String,
    pub background: Background,
}

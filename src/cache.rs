//! Thumbnail cache.
//!
//! Thumbnails live next to their sources in a flat `thumbnails/` directory:
//!
//! ```text
//! album/
//! ├── beach.jpg
//! ├── highlight.jpg            # album image, derived by album_highlight()
//! └── thumbnails/
//!     └── th_beach.jpg         # thumbnail(beach.jpg)
//! ```
//!
//! The file's existence is the only cache check: an existing thumbnail is
//! returned as is, a missing one is generated. There is no content hashing,
//! so a changed source keeps its stale thumbnail until `clean` removes the
//! cache directory.
//!
//! Generation is a rasterization to the configured bounding box followed by
//! the configured effect, both on a hidden staging file (`.th_beach.jpg`)
//! that is renamed into place once finished. An unknown effect name is
//! reported and the plain thumbnail is kept. Any other failure removes the
//! staging file, so a thumbnail on disk is always complete.
//!
//! The reserved `highlight.jpg` and `cover.jpg` are not filtered here;
//! callers decide which images get thumbnails.

use crate::config::{AlbumConfig, non_empty};
use crate::imaging::{BackendError, EffectParams, ImageBackend, RasterizeParams};
use crate::naming::{HIGHLIGHT, THUMBNAILS_DIR, thumbnail_name};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Blur sigma applied to every thumbnail after scaling.
const THUMBNAIL_BLUR: f32 = 0.25;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cannot generate {path}: {source}")]
    Backend {
        path: PathBuf,
        source: BackendError,
    },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Summary of cache activity for the run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub generated: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.generated += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.generated
    }

    pub fn absorb(&mut self, other: CacheStats) {
        self.hits += other.hits;
        self.generated += other.generated;
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} generated ({} total)",
                self.hits,
                self.generated,
                self.total()
            )
        } else {
            write!(f, "{} generated", self.generated)
        }
    }
}

/// Relative URL of an image's thumbnail from the album page.
pub fn thumbnail_href(image: &str) -> String {
    format!("{THUMBNAILS_DIR}/{}", thumbnail_name(image))
}

/// Hidden sibling a thumbnail is rendered into. It keeps the extension so
/// the backend picks the same output format.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}"))
}

/// Copy a file via a hidden sibling that is renamed into place.
pub fn copy_into_place(from: &Path, to: &Path) -> Result<(), CacheError> {
    let name = to
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let partial = to.with_file_name(format!(".{name}.partial"));
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| CacheError::Io { path, source }
    };
    fs::copy(from, &partial).map_err(io_err(from))?;
    fs::rename(&partial, to).map_err(io_err(to))?;
    Ok(())
}

/// Lazily generated thumbnails of one album.
pub struct ThumbnailCache<'a> {
    album_dir: &'a Path,
    config: &'a AlbumConfig,
    backend: &'a dyn ImageBackend,
    pub stats: CacheStats,
}

impl<'a> ThumbnailCache<'a> {
    pub fn new(album_dir: &'a Path, config: &'a AlbumConfig, backend: &'a dyn ImageBackend) -> Self {
        Self {
            album_dir,
            config,
            backend,
            stats: CacheStats::default(),
        }
    }

    /// Cache path of `image`'s thumbnail, whether or not it exists yet.
    pub fn thumbnail_path(&self, image: &str) -> PathBuf {
        self.album_dir
            .join(THUMBNAILS_DIR)
            .join(thumbnail_name(image))
    }

    /// Thumbnail of `image`, generated if missing.
    ///
    /// With `suppress_effect` the plain scaled image is produced; feed items
    /// and effect-less album highlights use that.
    pub fn thumbnail(&mut self, image: &str, suppress_effect: bool) -> Result<PathBuf, CacheError> {
        let target = self.thumbnail_path(image);
        if target.exists() {
            self.stats.hit();
            return Ok(target);
        }

        tracing::info!(
            "generating {} from {}",
            target.display(),
            self.album_dir.join(image).display()
        );
        let config = self.config;
        let effect = if suppress_effect {
            None
        } else {
            non_empty(&config.effect)
        };
        self.render(image, &target, effect)?;
        self.stats.miss();
        Ok(target)
    }

    /// Write the album's `highlight.jpg` derived from `source`.
    ///
    /// Without an album effect the plain thumbnail of `source` is copied.
    /// Otherwise `source` is scaled straight into the highlight and the album
    /// effect applied to it.
    pub fn album_highlight(&mut self, source: &str) -> Result<PathBuf, CacheError> {
        let target = self.album_dir.join(HIGHLIGHT);
        let config = self.config;
        match non_empty(&config.effect_album) {
            None => {
                let thumbnail = self.thumbnail(source, true)?;
                copy_into_place(&thumbnail, &target)?;
                tracing::info!(
                    "album image of {} set to the thumbnail of {}",
                    self.album_dir.display(),
                    source
                );
            }
            Some(effect) => {
                self.render(source, &target, Some(effect))?;
                self.stats.miss();
                tracing::info!(
                    "album image of {} set to {} with effect {}",
                    self.album_dir.display(),
                    source,
                    effect
                );
            }
        }
        Ok(target)
    }

    /// Rasterize `image` and apply `effect` in a hidden staging file, then
    /// rename it to `target`. On failure the staging file is removed.
    fn render(&self, image: &str, target: &Path, effect: Option<&str>) -> Result<(), CacheError> {
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).map_err(|source| CacheError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let staging = staging_path(target);
        let rendered = self.rasterize(image, &staging).and_then(|()| match effect {
            Some(effect) => self.apply_effect(&staging, effect),
            None => Ok(()),
        });
        if let Err(source) = rendered {
            let _ = fs::remove_file(&staging);
            return Err(CacheError::Backend {
                path: target.to_path_buf(),
                source,
            });
        }
        fs::rename(&staging, target).map_err(|source| {
            let _ = fs::remove_file(&staging);
            CacheError::Io {
                path: target.to_path_buf(),
                source,
            }
        })
    }

    fn rasterize(&self, image: &str, output: &Path) -> Result<(), BackendError> {
        let (max_width, max_height) = self.config.thumbnail_bounds();
        self.backend.rasterize(&RasterizeParams {
            source: self.album_dir.join(image),
            output: output.to_path_buf(),
            max_width,
            max_height,
            blur: THUMBNAIL_BLUR,
        })
    }

    /// Apply `effect` in place. Unknown effects keep the plain image.
    fn apply_effect(&self, path: &Path, effect: &str) -> Result<(), BackendError> {
        let result = self.backend.apply_effect(&EffectParams {
            path: path.to_path_buf(),
            effect: effect.to_string(),
            background: self.config.background(),
        });
        match result {
            Err(BackendError::UnknownEffect(name)) => {
                tracing::warn!("unknown effect {:?}, keeping plain thumbnail", name);
                Ok(())
            }
            other => other,
        }
    }
}

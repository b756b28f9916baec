//! Filesystem scanning.
//!
//! Reads one album directory into an [`Album`]: its sorted sub-album names
//! and its sorted image filenames. Nothing is cached between visits; every
//! command scans the directory it is about to work on.
//!
//! ## Directory Structure
//!
//! ```text
//! photos/                          # Site root (segments = [])
//! ├── config.toml                  # Optional partial config
//! ├── description.txt              # Optional shared captions
//! ├── beach.jpg                    # Image
//! ├── beach.jpg.txt                # Optional sidecar caption
//! ├── cover.jpg                    # Reserved: preferred highlight source
//! ├── highlight.jpg                # Reserved: album image in parent listing
//! ├── thumbnails/                  # Cache directory, never a sub-album
//! ├── .git/                        # Hidden, ignored
//! └── Holidays/                    # Sub-album (segments = ["Holidays"])
//!     └── ...
//! ```
//!
//! ## Rules
//!
//! - Images are files with a recognized extension, case-insensitive.
//! - Sub-albums are directories other than `thumbnails`.
//! - Hidden entries (leading `.`) are neither.
//! - Names that are not valid UTF-8 are skipped with a warning.
//! - Both lists are sorted ascending and free of duplicates.
//! - `highlight.jpg` and `cover.jpg` stay in [`Album::images`] but are
//!   excluded from [`Album::public_images`].

use crate::naming::{COVER, HIGHLIGHT, THUMBNAILS_DIR, is_image_name, is_reserved};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read album {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One album directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    /// Directory on disk.
    pub dir: PathBuf,
    /// Directory names from the site root down to this album; empty for the root.
    pub segments: Vec<String>,
    /// Immediate sub-album names, sorted.
    pub subalbums: Vec<String>,
    /// Image filenames, sorted, reserved names included.
    pub images: Vec<String>,
}

impl Album {
    /// Depth below the site root; the root is level 0.
    pub fn level(&self) -> usize {
        self.segments.len()
    }

    /// Images shown on pages, in feeds and in counts.
    pub fn public_images(&self) -> Vec<&str> {
        self.images
            .iter()
            .map(String::as_str)
            .filter(|name| !is_reserved(name))
            .collect()
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.images.iter().any(|i| i == name)
    }

    pub fn has_highlight(&self) -> bool {
        self.has_image(HIGHLIGHT)
    }

    pub fn has_cover(&self) -> bool {
        self.has_image(COVER)
    }

    /// Child album at `name`, with its segments extended.
    pub fn child_path(&self, name: &str) -> (PathBuf, Vec<String>) {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        (self.dir.join(name), segments)
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Scan one directory into an [`Album`].
pub fn scan_album(dir: &Path, segments: Vec<String>) -> Result<Album, ScanError> {
    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut subalbums = BTreeSet::new();
    let mut images = BTreeSet::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!(
                    "skipping {}: name is not valid UTF-8",
                    dir.join(raw).display()
                );
                continue;
            }
        };
        if is_hidden(&name) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            if name != THUMBNAILS_DIR {
                subalbums.insert(name);
            }
        } else if is_image_name(&name) {
            images.insert(name);
        }
    }

    Ok(Album {
        dir: dir.to_path_buf(),
        segments,
        subalbums: subalbums.into_iter().collect(),
        images: images.into_iter().collect(),
    })
}

/// Walk below `dir` in sorted name order, skipping hidden entries and
/// thumbnail caches.
fn walk_visible(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || e.file_name().to_str().is_some_and(|name| {
                    !is_hidden(name) && !(e.file_type().is_dir() && name == THUMBNAILS_DIR)
                })
        })
        .filter_map(|e| e.ok())
}

/// Number of public images in `dir` and every album below it.
pub fn count_photos(dir: &Path) -> usize {
    walk_visible(dir)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            is_image_name(&name) && !is_reserved(&name)
        })
        .count()
}

/// First `highlight.jpg` in a descendant album, depth-first in sorted order.
///
/// The album's own highlight is not considered.
pub fn find_descendant_highlight(dir: &Path) -> Option<PathBuf> {
    walk_visible(dir)
        .filter(|e| e.depth() >= 2 && e.file_type().is_file())
        .find(|e| e.file_name() == HIGHLIGHT)
        .map(|e| e.into_path())
}

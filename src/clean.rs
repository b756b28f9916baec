//! Removal of generated artifacts.
//!
//! Three passes over the whole tree below the site root:
//!
//! | Pass | Removes |
//! |------|---------|
//! | [`clean_index`] | `index.html` and `index_NNNN.html` pages |
//! | [`clean_highlight`] | `highlight.jpg` album images |
//! | [`clean`] | thumbnail directories, then highlights, then pages |
//!
//! Every pass is idempotent: finding nothing to remove is not an error.
//! Captions (`description.txt`, sidecars), feeds and config files are never
//! touched. Hidden directories are not entered.

use crate::naming::{HIGHLIGHT, THUMBNAILS_DIR, is_index_name};
use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("cannot remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// What a clean pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub pages: usize,
    pub highlights: usize,
    pub thumbnail_dirs: usize,
}

impl CleanReport {
    pub fn total(&self) -> usize {
        self.pages + self.highlights + self.thumbnail_dirs
    }
}

impl AddAssign for CleanReport {
    fn add_assign(&mut self, other: Self) {
        self.pages += other.pages;
        self.highlights += other.highlights;
        self.thumbnail_dirs += other.thumbnail_dirs;
    }
}

/// Visible entries below `root` matching `matches`, without descending into
/// matched directories. Unreadable entries below the root are skipped.
fn find(root: &Path, matches: impl Fn(&walkdir::DirEntry) -> bool) -> Result<Vec<PathBuf>, CleanError> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(CleanError::Walk {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.depth() > 0 && matches(&entry) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

fn remove_file(path: &Path) -> Result<(), CleanError> {
    fs::remove_file(path).map_err(|source| CleanError::Remove {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("removed {}", path.display());
    Ok(())
}

/// Remove every generated index page below `root`.
pub fn clean_index(root: &Path) -> Result<CleanReport, CleanError> {
    let pages = find(root, |e| {
        e.file_type().is_file() && is_index_name(&e.file_name().to_string_lossy())
    })?;
    for page in &pages {
        remove_file(page)?;
    }
    Ok(CleanReport {
        pages: pages.len(),
        ..Default::default()
    })
}

/// Remove every album highlight below `root`.
pub fn clean_highlight(root: &Path) -> Result<CleanReport, CleanError> {
    let highlights = find(root, |e| e.file_type().is_file() && e.file_name() == HIGHLIGHT)?;
    for highlight in &highlights {
        remove_file(highlight)?;
    }
    Ok(CleanReport {
        highlights: highlights.len(),
        ..Default::default()
    })
}

/// Remove thumbnail caches, highlights and index pages below `root`.
pub fn clean(root: &Path) -> Result<CleanReport, CleanError> {
    let dirs = find(root, |e| e.file_type().is_dir() && e.file_name() == THUMBNAILS_DIR)?;
    for dir in &dirs {
        fs::remove_dir_all(dir).map_err(|source| CleanError::Remove {
            path: dir.clone(),
            source,
        })?;
        tracing::info!("removed {}", dir.display());
    }

    let mut report = CleanReport {
        thumbnail_dirs: dirs.len(),
        ..Default::default()
    };
    report += clean_highlight(root)?;
    report += clean_index(root)?;
    Ok(report)
}

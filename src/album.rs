//! Album builds over a directory tree.
//!
//! The tree is walked depth-first, children before parents, so a parent can
//! list its sub-albums with the highlights they just produced. Every visit
//! works on an explicit directory path; the process working directory is
//! never changed.
//!
//! ## One Album Visit
//!
//! ```text
//! scan ─► children (unless nonrecursive) ─► captions ─► cards ─► pages
//!                                                               │
//!                                     feed (if enabled) ◄─ highlight
//! ```
//!
//! - **Config**: each child merges its own `config.toml` onto the parent's
//!   effective config ([`config::resolve_for_dir`]).
//! - **Highlight**: an album without `highlight.jpg` derives one from
//!   `cover.jpg`, else its first image, else copies the first highlight found
//!   in a descendant album. With none of those it stays without one.
//! - **Failures**: an error in one album aborts that album and is recorded
//!   in the report. Sibling albums and the parent still build.
//!
//! The `text` pass uses the same traversal to append missing caption rows.

use crate::cache::{CacheError, CacheStats, ThumbnailCache, copy_into_place, thumbnail_href};
use crate::clean::{self, CleanError, CleanReport};
use crate::config::{self, AlbumConfig};
use crate::imaging::{CaptureInfo, ImageBackend, read_capture_info};
use crate::metadata::{self, TextError, TextOutcome, Texts, item_text};
use crate::naming::{COVER, HIGHLIGHT, RSS_FILE, index_name};
use crate::paginate::paginate;
use crate::render::{AlbumView, ImageCard, SubalbumCard, format_date, render_album_page};
use crate::rss::{FeedItem, render_feed, select_latest};
use crate::scan::{self, Album, ScanError};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Text(#[from] TextError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An album whose visit failed.
#[derive(Debug)]
pub struct AlbumFailure {
    pub dir: PathBuf,
    pub error: BuildError,
}

/// Outcome of a `generate` pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub albums: usize,
    pub pages: usize,
    pub highlights: usize,
    pub feeds: usize,
    pub cache: CacheStats,
    pub failures: Vec<AlbumFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of a `text` pass.
#[derive(Debug, Default)]
pub struct TextReport {
    pub outcomes: Vec<(PathBuf, TextOutcome)>,
    pub failures: Vec<AlbumFailure>,
}

impl TextReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of a `rebuild`: page removal, caption rows, then a full build.
#[derive(Debug)]
pub struct RebuildReport {
    pub cleaned: CleanReport,
    pub texts: TextReport,
    pub build: BuildReport,
}

impl RebuildReport {
    pub fn is_success(&self) -> bool {
        self.texts.is_success() && self.build.is_success()
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// Visit `dir` and, unless `nonrecursive`, every album below it, children
/// first. Failures are collected; a directory that cannot be scanned skips
/// its whole subtree.
fn visit_tree(
    dir: &Path,
    config: &AlbumConfig,
    segments: Vec<String>,
    failures: &mut Vec<AlbumFailure>,
    visit: &mut dyn FnMut(&Album, &AlbumConfig) -> Result<(), BuildError>,
) {
    let album = match scan::scan_album(dir, segments) {
        Ok(album) => album,
        Err(e) => {
            tracing::error!("{e}");
            failures.push(AlbumFailure {
                dir: dir.to_path_buf(),
                error: e.into(),
            });
            return;
        }
    };

    if !config.nonrecursive {
        for name in &album.subalbums {
            let (child_dir, child_segments) = album.child_path(name);
            let child_config = config::resolve_for_dir(config, &child_dir);
            visit_tree(&child_dir, &child_config, child_segments, failures, visit);
        }
    }

    tracing::info!("processing album {}", album.dir.display());
    if let Err(e) = visit(&album, config) {
        tracing::error!("album {} failed: {e}", album.dir.display());
        failures.push(AlbumFailure {
            dir: album.dir.clone(),
            error: e,
        });
    }
}

/// Write via a hidden sibling that is renamed into place.
fn write_atomic(path: &Path, content: &str) -> Result<(), BuildError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let partial = path.with_file_name(format!(".{name}.partial"));
    let io_err = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&partial, content).map_err(io_err)?;
    fs::rename(&partial, path).map_err(|source| {
        let _ = fs::remove_file(&partial);
        io_err(source)
    })
}

fn modified(path: &Path) -> Result<DateTime<Utc>, BuildError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Capture time when preferred and known, else local modification time.
fn display_time(path: &Path, capture: &CaptureInfo, use_exif_date: bool) -> Option<NaiveDateTime> {
    if use_exif_date && let Some(taken) = capture.taken {
        return Some(taken);
    }
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(|time| DateTime::<Local>::from(time).naive_local())
}

// ============================================================================
// Generate
// ============================================================================

/// Builds album pages, highlights and feeds with an injected image backend.
pub struct AlbumBuilder<'a> {
    backend: &'a dyn ImageBackend,
    report: BuildReport,
}

impl<'a> AlbumBuilder<'a> {
    pub fn new(backend: &'a dyn ImageBackend) -> Self {
        Self {
            backend,
            report: BuildReport::default(),
        }
    }

    /// Build `dir` and the albums below it with `config` as its effective config.
    pub fn build(&mut self, dir: &Path, config: &AlbumConfig, segments: Vec<String>) {
        let mut failures = Vec::new();
        visit_tree(dir, config, segments, &mut failures, &mut |album, config| {
            self.build_album(album, config)
        });
        self.report.failures.extend(failures);
    }

    pub fn finish(self) -> BuildReport {
        self.report
    }

    fn build_album(&mut self, album: &Album, config: &AlbumConfig) -> Result<(), BuildError> {
        let texts = metadata::resolve(album)?;
        for (item, caption) in &texts {
            if config.debug {
                tracing::info!("{}: {item} → {caption:?}", album.dir.display());
            } else {
                tracing::debug!("{}: {item} → {caption:?}", album.dir.display());
            }
        }

        let mut cache = ThumbnailCache::new(&album.dir, config, self.backend);
        let result = self.write_album(album, config, &texts, &mut cache);
        self.report.cache.absorb(cache.stats);
        result?;
        self.report.albums += 1;
        Ok(())
    }

    fn write_album(
        &mut self,
        album: &Album,
        config: &AlbumConfig,
        texts: &Texts,
        cache: &mut ThumbnailCache,
    ) -> Result<(), BuildError> {
        let subalbums = subalbum_cards(album, config, texts);
        let images = image_cards(album, config, texts, cache)?;

        let view = AlbumView {
            config,
            segments: &album.segments,
            images: &images,
            subalbum_count: subalbums.len(),
        };
        for page in paginate(&subalbums, &images, config.max_per_page) {
            let path = album.dir.join(index_name(page.index));
            let html = render_album_page(&view, &page).into_string();
            write_atomic(&path, &html)?;
            tracing::info!(
                "generated {} ({} of {})",
                path.display(),
                page.index + 1,
                page.page_count
            );
            self.report.pages += 1;
        }

        if !album.has_highlight() && self.ensure_highlight(album, cache)? {
            self.report.highlights += 1;
        }

        if config.generate_rss {
            self.write_feed(album, config, texts, cache)?;
            self.report.feeds += 1;
        }
        Ok(())
    }

    /// Derive the album's missing highlight. Returns whether one was written.
    fn ensure_highlight(&self, album: &Album, cache: &mut ThumbnailCache) -> Result<bool, BuildError> {
        let source = if album.has_cover() {
            Some(COVER)
        } else {
            album.images.first().map(String::as_str)
        };
        if let Some(source) = source {
            cache.album_highlight(source)?;
            return Ok(true);
        }

        match scan::find_descendant_highlight(&album.dir) {
            Some(found) => {
                copy_into_place(&found, &album.dir.join(HIGHLIGHT))?;
                tracing::info!(
                    "album image of {} copied from {}",
                    album.dir.display(),
                    found.display()
                );
                Ok(true)
            }
            None => {
                tracing::warn!("no highlight found for album {}", album.dir.display());
                Ok(false)
            }
        }
    }

    fn write_feed(
        &self,
        album: &Album,
        config: &AlbumConfig,
        texts: &Texts,
        cache: &mut ThumbnailCache,
    ) -> Result<(), BuildError> {
        let mut timed = Vec::new();
        for image in album.public_images() {
            timed.push((modified(&album.dir.join(image))?, image));
        }

        let mut items = Vec::new();
        for (published, image) in select_latest(timed) {
            cache.thumbnail(image, true)?;
            let text = item_text(image, texts, config);
            items.push(FeedItem {
                file: image.to_string(),
                thumbnail: thumbnail_href(image),
                name: text.name,
                description: text.description,
                published,
            });
        }

        let path = album.dir.join(RSS_FILE);
        write_atomic(&path, &render_feed(config, &album.segments, &items, Utc::now()))?;
        tracing::info!("generated {} with {} items", path.display(), items.len());
        Ok(())
    }
}

fn subalbum_cards(album: &Album, config: &AlbumConfig, texts: &Texts) -> Vec<SubalbumCard> {
    album
        .subalbums
        .iter()
        .map(|name| SubalbumCard {
            name: name.clone(),
            description: texts.get(name).cloned(),
            photo_count: if config.show_stats_album {
                scan::count_photos(&album.dir.join(name))
            } else {
                0
            },
        })
        .collect()
}

fn image_cards(
    album: &Album,
    config: &AlbumConfig,
    texts: &Texts,
    cache: &mut ThumbnailCache,
) -> Result<Vec<ImageCard>, BuildError> {
    let wants_capture = config.show_exif || (config.show_date && config.use_exif_date);
    let mut cards = Vec::new();
    for (index, image) in album.public_images().into_iter().enumerate() {
        cache.thumbnail(image, false)?;
        let path = album.dir.join(image);
        let capture = if wants_capture {
            read_capture_info(&path)
        } else {
            CaptureInfo::default()
        };
        let date = display_time(&path, &capture, config.use_exif_date)
            .map(format_date)
            .unwrap_or_default();
        cards.push(ImageCard {
            file: image.to_string(),
            thumbnail: thumbnail_href(image),
            index,
            text: item_text(image, texts, config),
            date,
            capture,
        });
    }
    Ok(cards)
}

// ============================================================================
// Entry points
// ============================================================================

/// Build the whole site below `root` using its `config.toml` and `backend`.
pub fn generate(root: &Path, backend: &dyn ImageBackend) -> BuildReport {
    let config = config::load_root_config(root);
    let mut builder = AlbumBuilder::new(backend);
    builder.build(root, &config, Vec::new());
    builder.finish()
}

/// Create or extend `description.txt` in every album below `root`.
pub fn generate_texts(root: &Path) -> TextReport {
    let config = config::load_root_config(root);
    let mut report = TextReport::default();
    let mut outcomes = Vec::new();
    visit_tree(root, &config, Vec::new(), &mut report.failures, &mut |album, _| {
        outcomes.push((album.dir.clone(), metadata::generate_text(album)?));
        Ok(())
    });
    report.outcomes = outcomes;
    report
}

/// Remove index pages, add missing caption rows, then build everything.
///
/// Captions and sidecars are preserved.
pub fn rebuild(root: &Path, backend: &dyn ImageBackend) -> Result<RebuildReport, CleanError> {
    let cleaned = clean::clean_index(root)?;
    let texts = generate_texts(root);
    let build = generate(root, backend);
    Ok(RebuildReport {
        cleaned,
        texts,
        build,
    })
}

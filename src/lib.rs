//! # Foldergal
//!
//! A static photo album generator. Your filesystem is the data source: every
//! directory becomes an album page listing its sub-albums and images, with
//! thumbnails, captions and a media RSS feed. Generated files are written
//! next to the images they describe, so the site root is the album tree.
//!
//! # Architecture: One Depth-First Pass
//!
//! ```text
//! photos/                 scan ─► captions ─► thumbnails ─► pages
//! ├── Holidays/    ①                                          │
//! │   └── Crete/   ⓪      highlight.jpg ◄─────────────────────┘
//! └── Zoo/         ②                │
//!  (root)          ③      photos.rss ◄┘
//! ```
//!
//! Children are built before their parent, so a parent's page can show the
//! `highlight.jpg` each child just produced. Nothing is kept between runs
//! except the files themselves: an existing thumbnail is reused, an existing
//! highlight is respected, pages and feeds are rewritten every time.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`album`] | Tree traversal, per-album build, `text` and `rebuild` passes |
//! | [`scan`] | Reads one directory into sorted sub-album and image lists |
//! | [`config`] | `config.toml` cascade: each album overrides its parent key by key |
//! | [`metadata`] | Captions from `description.txt` and `<image>.txt` sidecars |
//! | [`paginate`] | Splits sub-albums then images into pages; page-number navigation |
//! | [`cache`] | Lazily generated thumbnails and album highlights |
//! | [`imaging`] | Pure-Rust rasterization, thumbnail effects, EXIF capture info |
//! | [`render`] | Album pages with Maud |
//! | [`rss`] | Media RSS 2.0 feed per album |
//! | [`clean`] | Removes generated pages, highlights and thumbnail caches |
//! | [`naming`] | Reserved filenames and generated-file naming |
//! | [`output`] | End-of-run summaries for the CLI |
//!
//! # Design Decisions
//!
//! ## Existence Is the Cache
//!
//! A thumbnail is regenerated only when its file is missing. There is no
//! manifest and no content hash, so the cache survives copying the tree
//! around. `clean` is the way to force regeneration after editing images.
//!
//! ## Injected Imaging
//!
//! All pixel work goes through the [`imaging::ImageBackend`] trait. The CLI
//! uses [`imaging::RustBackend`]; tests use a mock that records calls and
//! writes placeholder files, so builder tests never decode an image.
//!
//! ## Failures Stay Local
//!
//! An album that cannot be read or whose thumbnails fail is skipped and
//! reported; its siblings and parent still build. The CLI exits non-zero when
//! anything failed, and rerunning after a fix picks up where it left off.
//!
//! ## Relative Links Only
//!
//! Pages link with `./`, `./../` prefixes, never absolute paths, so a site
//! works from `file://` as well as from any web server path.

pub mod album;
pub mod cache;
pub mod clean;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod paginate;
pub mod render;
pub mod rss;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;

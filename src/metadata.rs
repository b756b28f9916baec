//! Caption resolution.
//!
//! Every image and sub-album can carry a caption from two independent sources:
//!
//! ## Shared description file
//!
//! `description.txt` in the album directory holds one caption per line:
//!
//! ```text
//! # Trip to Crete, summer 2008
//! beach.jpg: First morning at the beach
//! Knossos; The palace          # sub-albums get captions too
//! harbor.jpg	                 # tab-separated, still empty
//! ```
//!
//! - The key and caption are split at the first `;`, `,`, `:` or tab that
//!   follows at least one character of the key.
//! - `#` starts a comment running to the end of the line.
//! - Keys and captions are trimmed. Lines with an empty key or no separator
//!   are skipped. Empty captions are skipped unless the caller asks for them.
//! - A later line for the same key replaces an earlier one.
//!
//! ## Sidecar files
//!
//! `<image>.txt` next to an image (`beach.jpg.txt`) holds that image's caption,
//! taken verbatim. A sidecar always wins over the shared file.
//!
//! ## Boilerplate generation
//!
//! The `text` command appends an empty row for every item the shared file
//! does not mention yet. Existing lines are never rewritten or reordered.

use crate::config::AlbumConfig;
use crate::naming::{DESCRIPTION_FILE, HIGHLIGHT, display_name, sidecar_name};
use crate::scan::Album;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Item filename → caption.
pub type Texts = BTreeMap<String, String>;

const SEPARATORS: [char; 4] = [';', ',', ':', '\t'];

/// First line of a newly created description file.
pub const DESCRIPTION_HEADER: &str = "# Write descriptions for images and albums. Format: one definition per line, filename and text separated by colon, semicolon, comma or tab.";

#[derive(Error, Debug)]
pub enum TextError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> TextError + '_ {
    move |source| TextError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Split a comment-free line into raw key and raw caption.
///
/// The key is the shortest non-empty prefix followed by optional whitespace
/// and a separator. Tab counts as both whitespace and separator.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    for (key_end, _) in line.char_indices().skip(1) {
        let rest = &line[key_end..];
        let gap = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
        for sep_at in (0..=gap).rev() {
            if let Some(c) = rest[sep_at..].chars().next()
                && SEPARATORS.contains(&c)
            {
                return Some((&line[..key_end], &rest[sep_at + c.len_utf8()..]));
            }
        }
    }
    None
}

/// Parse one line of the shared description file into `(key, caption)`.
///
/// Returns `None` for blank lines, comment-only lines, lines without a
/// separator and lines whose key is empty. The caption may be empty.
pub fn parse_description_line(line: &str) -> Option<(String, String)> {
    let content = line.split('#').next().unwrap_or_default();
    let (key, caption) = split_entry(content)?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), caption.trim().to_string()))
}

/// Read captions from the album's shared description file.
///
/// A missing file yields no captions. Empty captions are kept only with
/// `include_empty`.
pub fn load_shared(dir: &Path, include_empty: bool) -> Result<Texts, TextError> {
    let path = dir.join(DESCRIPTION_FILE);
    if !path.is_file() {
        return Ok(Texts::new());
    }
    let bytes = fs::read(&path).map_err(io_error(&path))?;
    let content = String::from_utf8_lossy(&bytes);

    let mut texts = Texts::new();
    for (key, caption) in content.lines().filter_map(parse_description_line) {
        if include_empty || !caption.is_empty() {
            texts.insert(key, caption);
        }
    }
    Ok(texts)
}

/// Read sidecar captions for the album's images, verbatim.
pub fn load_sidecars(album: &Album) -> Result<Texts, TextError> {
    let mut texts = Texts::new();
    for image in &album.images {
        let path = album.dir.join(sidecar_name(image));
        if path.is_file() {
            let bytes = fs::read(&path).map_err(io_error(&path))?;
            texts.insert(image.clone(), String::from_utf8_lossy(&bytes).into_owned());
        }
    }
    Ok(texts)
}

/// Captions for the album's items: shared file overlaid with sidecars.
pub fn resolve(album: &Album) -> Result<Texts, TextError> {
    let mut texts = load_shared(&album.dir, false)?;
    texts.extend(load_sidecars(album)?);
    Ok(texts)
}

/// Items that could carry a caption: sub-albums then images, minus the highlight.
fn textables(album: &Album) -> impl Iterator<Item = &String> {
    album
        .subalbums
        .iter()
        .chain(album.images.iter())
        .filter(|name| name.as_str() != HIGHLIGHT)
}

/// Items with no row in the shared description file, in listing order.
///
/// Rows with empty captions count as present. Sidecars are not consulted.
pub fn report_missing(album: &Album) -> Result<Vec<String>, TextError> {
    let shared = load_shared(&album.dir, true)?;
    Ok(textables(album)
        .filter(|name| !shared.contains_key(name.as_str()))
        .cloned()
        .collect())
}

/// What [`generate_text`] did to the description file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    /// The file did not exist and was created with this many rows.
    Created(usize),
    /// This many empty rows were appended.
    Appended(usize),
    /// Every item already had a row.
    UpToDate,
}

/// Create or extend the shared description file with empty rows.
pub fn generate_text(album: &Album) -> Result<TextOutcome, TextError> {
    let path = album.dir.join(DESCRIPTION_FILE);

    if path.is_file() {
        let missing = report_missing(album)?;
        if missing.is_empty() {
            tracing::info!("{} is up to date", path.display());
            return Ok(TextOutcome::UpToDate);
        }
        let mut rows = String::from("\n");
        for name in &missing {
            rows.push_str(&format!("{name}\t\n"));
        }
        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(io_error(&path))?;
        file.write_all(rows.as_bytes()).map_err(io_error(&path))?;
        tracing::info!(
            "merged {} new empty descriptions into {}",
            missing.len(),
            path.display()
        );
        return Ok(TextOutcome::Appended(missing.len()));
    }

    let items: Vec<&String> = textables(album).collect();
    let mut content = format!("{DESCRIPTION_HEADER}\n");
    for name in &items {
        content.push_str(&format!("{name}\t\n"));
    }
    fs::write(&path, content).map_err(io_error(&path))?;
    tracing::info!("created {} with {} rows", path.display(), items.len());
    Ok(TextOutcome::Created(items.len()))
}

/// Display name and caption of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemText {
    pub name: String,
    pub description: Option<String>,
}

/// Resolve what to show for `image`.
///
/// Normally the name is the filename without its extension and the caption
/// is shown separately. With `description_as_name` the caption becomes the
/// name and no separate caption is shown.
pub fn item_text(image: &str, texts: &Texts, config: &AlbumConfig) -> ItemText {
    let description = texts.get(image).cloned();
    if config.description_as_name {
        ItemText {
            name: description.unwrap_or_default(),
            description: None,
        }
    } else {
        ItemText {
            name: display_name(image).to_string(),
            description,
        }
    }
}

//! Reserved filenames and the naming conventions shared by every stage.
//!
//! The album tree is the data source, so a handful of names carry meaning:
//!
//! ```text
//! album/
//! ├── config.toml          # Partial config, overrides the parent's keys
//! ├── description.txt      # Shared captions: `name<sep>caption` per line
//! ├── cat.jpg
//! ├── cat.jpg.txt          # Sidecar caption for cat.jpg (wins over description.txt)
//! ├── cover.jpg            # Preferred source for the album highlight
//! ├── highlight.jpg        # Album image shown in the parent listing (generated)
//! ├── index.html           # Page 0 (generated)
//! ├── index_0001.html      # Page 1 (generated)
//! ├── photos.rss           # Media RSS feed (generated)
//! └── thumbnails/
//!     └── th_cat.jpg       # Cached thumbnail (generated)
//! ```

/// Per-album configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Shared caption file for images and sub-albums of one directory.
pub const DESCRIPTION_FILE: &str = "description.txt";
/// Directory holding generated thumbnails. Never treated as a sub-album.
pub const THUMBNAILS_DIR: &str = "thumbnails";
/// Album image shown in the parent listing.
pub const HIGHLIGHT: &str = "highlight.jpg";
/// Image preferred over the first image when deriving a highlight.
pub const COVER: &str = "cover.jpg";
/// Media RSS feed of one album.
pub const RSS_FILE: &str = "photos.rss";
/// Extension of per-item sidecar caption files.
pub const SIDECAR_EXTENSION: &str = "txt";

/// Recognized image extensions, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

const THUMBNAIL_PREFIX: &str = "th_";

/// Whether a filename is one of the two reserved album images.
pub fn is_reserved(name: &str) -> bool {
    name == HIGHLIGHT || name == COVER
}

/// Whether a filename has a recognized image extension.
pub fn is_image_name(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty()
            && IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Filename of the generated page with the given 0-based index.
///
/// - `0` → `index.html`
/// - `3` → `index_0003.html`
pub fn index_name(page: usize) -> String {
    if page == 0 {
        "index.html".to_string()
    } else {
        format!("index_{page:04}.html")
    }
}

/// Whether a filename looks like a generated page (`index*.html`).
pub fn is_index_name(name: &str) -> bool {
    name.starts_with("index") && name.ends_with(".html")
}

/// Cache filename of an image's thumbnail: `cat.jpg` → `th_cat.jpg`.
pub fn thumbnail_name(image: &str) -> String {
    format!("{THUMBNAIL_PREFIX}{image}")
}

/// Sidecar caption filename of an item: `cat.jpg` → `cat.jpg.txt`.
pub fn sidecar_name(item: &str) -> String {
    format!("{item}.{SIDECAR_EXTENSION}")
}

/// Display name of an image: its filename without the image extension.
///
/// Names without a recognized extension are returned unchanged:
/// - `fero.jpg` → `fero`
/// - `Beach.Day.PNG` → `Beach.Day`
/// - `fero` → `fero`
pub fn display_name(image: &str) -> &str {
    const DISPLAY_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "tiff"];
    match image.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && DISPLAY_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => image,
    }
}

/// Relative prefix that climbs `levels` directories: `./`, `./../`, `./../../`.
pub fn relative_prefix(levels: usize) -> String {
    format!("./{}", "../".repeat(levels))
}

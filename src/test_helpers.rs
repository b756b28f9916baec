//! Shared test utilities for the foldergal test suite.
//!
//! Builds album trees in temp directories and reads back generated output.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = album_tree(&["a.jpg", "Holidays/b.jpg", "Holidays/Crete/c.jpg"]);
//! assert_eq!(read(&tmp.path().join("index.html")), "...");
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create an empty file, creating parent directories as needed.
pub fn touch(path: &Path) {
    write(path, "");
}

/// Write a text file, creating parent directories as needed.
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Temp directory holding an empty file at every relative path in `files`.
///
/// Directory-only entries end with `/`.
pub fn album_tree(files: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for file in files {
        let path = tmp.path().join(file);
        if file.ends_with('/') {
            std::fs::create_dir_all(&path).unwrap();
        } else {
            touch(&path);
        }
    }
    tmp
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

// =========================================================================
// Output inspection
// =========================================================================

/// Read a text file. Panics with the path on failure.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Sorted names of the entries in `dir`.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()))
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Assert that `haystack` contains `needle`, showing the haystack on failure.
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "expected to find {needle:?} in:\n{haystack}"
    );
}

/// Assert that `haystack` does not contain `needle`.
pub fn assert_not_contains(haystack: &str, needle: &str) {
    assert!(
        !haystack.contains(needle),
        "did not expect {needle:?} in:\n{haystack}"
    );
}

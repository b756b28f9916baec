//! CLI output formatting for every command.
//!
//! Progress is logged through `tracing` while a command runs; these
//! functions produce the end-of-run summary printed to stdout.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! Generated 4 albums: 6 pages, 3 highlights, 4 feeds
//! Thumbnails: 12 cached, 3 generated (15 total)
//! Failed 1 album
//!     Holidays/Crete: cannot read album …
//! ```
//!
//! ## Text
//!
//! ```text
//! . → created with 5 rows
//! Holidays → 2 rows appended
//! Holidays/Crete → up to date
//! ```
//!
//! ## Clean
//!
//! ```text
//! Removed 6 pages, 3 highlights, 3 thumbnail directories
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Paths are shown relative to
//! the site root, which itself is shown as `.`.

use crate::album::{AlbumFailure, BuildReport, RebuildReport, TextReport};
use crate::clean::CleanReport;
use crate::metadata::TextOutcome;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// `1 page`, `3 pages`.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Album directory relative to the site root.
fn album_path(dir: &Path, root: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => dir.display().to_string(),
    }
}

/// Failure block; empty when nothing failed.
pub fn format_failures(failures: &[AlbumFailure], root: &Path) -> Vec<String> {
    if failures.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("Failed {}", plural(failures.len(), "album", "albums"))];
    for failure in failures {
        lines.push(format!(
            "    {}: {}",
            album_path(&failure.dir, root),
            failure.error
        ));
    }
    lines
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_build_output(report: &BuildReport, root: &Path) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Generated {}: {}, {}, {}",
            plural(report.albums, "album", "albums"),
            plural(report.pages, "page", "pages"),
            plural(report.highlights, "highlight", "highlights"),
            plural(report.feeds, "feed", "feeds"),
        ),
        format!("Thumbnails: {}", report.cache),
    ];
    lines.extend(format_failures(&report.failures, root));
    lines
}

pub fn print_build_output(report: &BuildReport, root: &Path) {
    for line in format_build_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Text
// ============================================================================

pub fn format_text_output(report: &TextReport, root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|(dir, outcome)| {
            let status = match outcome {
                TextOutcome::Created(rows) => {
                    format!("created with {}", plural(*rows, "row", "rows"))
                }
                TextOutcome::Appended(rows) => {
                    format!("{} appended", plural(*rows, "row", "rows"))
                }
                TextOutcome::UpToDate => "up to date".to_string(),
            };
            format!("{} \u{2192} {}", album_path(dir, root), status)
        })
        .collect();
    lines.extend(format_failures(&report.failures, root));
    lines
}

pub fn print_text_output(report: &TextReport, root: &Path) {
    for line in format_text_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Clean
// ============================================================================

pub fn format_clean_output(report: &CleanReport) -> Vec<String> {
    if report.total() == 0 {
        return vec!["Nothing to remove".to_string()];
    }
    vec![format!(
        "Removed {}, {}, {}",
        plural(report.pages, "page", "pages"),
        plural(report.highlights, "highlight", "highlights"),
        plural(report.thumbnail_dirs, "thumbnail directory", "thumbnail directories"),
    )]
}

pub fn print_clean_output(report: &CleanReport) {
    for line in format_clean_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Rebuild
// ============================================================================

pub fn format_rebuild_output(report: &RebuildReport, root: &Path) -> Vec<String> {
    let mut lines = format_clean_output(&report.cleaned);
    lines.extend(format_text_output(&report.texts, root));
    lines.extend(format_build_output(&report.build, root));
    lines
}

pub fn print_rebuild_output(report: &RebuildReport, root: &Path) {
    for line in format_rebuild_output(report, root) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::BuildError;
    use crate::cache::CacheStats;
    use crate::scan::ScanError;
    use std::path::PathBuf;

    fn failure(dir: &str) -> AlbumFailure {
        AlbumFailure {
            dir: PathBuf::from(dir),
            error: BuildError::Scan(ScanError::Io {
                path: PathBuf::from(dir),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }),
        }
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "page", "pages"), "1 page");
        assert_eq!(plural(0, "page", "pages"), "0 pages");
        assert_eq!(plural(2, "page", "pages"), "2 pages");
    }

    #[test]
    fn album_path_is_relative_to_root() {
        let root = Path::new("/photos");
        assert_eq!(album_path(Path::new("/photos"), root), ".");
        assert_eq!(album_path(Path::new("/photos/A/B"), root), "A/B");
        assert_eq!(album_path(Path::new("/elsewhere"), root), "/elsewhere");
    }

    #[test]
    fn build_output_summary() {
        let report = BuildReport {
            albums: 2,
            pages: 3,
            highlights: 1,
            feeds: 2,
            cache: CacheStats {
                hits: 5,
                generated: 2,
            },
            failures: Vec::new(),
        };
        let lines = format_build_output(&report, Path::new("/photos"));
        assert_eq!(
            lines,
            vec![
                "Generated 2 albums: 3 pages, 1 highlight, 2 feeds",
                "Thumbnails: 5 cached, 2 generated (7 total)",
            ]
        );
    }

    #[test]
    fn build_output_lists_failures() {
        let report = BuildReport {
            failures: vec![failure("/photos/A")],
            ..Default::default()
        };
        let lines = format_build_output(&report, Path::new("/photos"));
        assert_eq!(lines[2], "Failed 1 album");
        assert!(lines[3].starts_with("    A: cannot read album /photos/A"));
    }

    #[test]
    fn text_output_per_album() {
        let report = TextReport {
            outcomes: vec![
                (PathBuf::from("/photos"), TextOutcome::Created(5)),
                (PathBuf::from("/photos/A"), TextOutcome::Appended(1)),
                (PathBuf::from("/photos/B"), TextOutcome::UpToDate),
            ],
            failures: Vec::new(),
        };
        assert_eq!(
            format_text_output(&report, Path::new("/photos")),
            vec![
                ". \u{2192} created with 5 rows",
                "A \u{2192} 1 row appended",
                "B \u{2192} up to date",
            ]
        );
    }

    #[test]
    fn clean_output_counts() {
        let report = CleanReport {
            pages: 3,
            highlights: 1,
            thumbnail_dirs: 2,
        };
        assert_eq!(
            format_clean_output(&report),
            vec!["Removed 3 pages, 1 highlight, 2 thumbnail directories"]
        );
        assert_eq!(
            format_clean_output(&CleanReport::default()),
            vec!["Nothing to remove"]
        );
    }
}

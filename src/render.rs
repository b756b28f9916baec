//! HTML album pages.
//!
//! Rendering is pure: the builder gathers everything a page shows into
//! [`SubalbumCard`]s and [`ImageCard`]s, paginates them, and hands each
//! [`Page`] to [`render_album_page`]. No filesystem access happens here.
//!
//! ## Page Layout
//!
//! ```text
//! head      title, author, stylesheets, home/up links, feed link
//! menu      breadcrumb · counts | feed icon | skin switcher
//! paginator « 1 2 … 9 10 11 12 13 … 19 20 »     (only with several pages)
//! cards     sub-albums first, then images
//! script    viewer entries for every image of the album
//! footer    copyright, generator, analytics
//! ```
//!
//! All links are relative so a site can be browsed from disk or moved
//! between hosts. Pages at depth `n` reach the site root through
//! [`relative_prefix`]`(n)`.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! which escapes every interpolated value.

use crate::config::{AlbumConfig, non_empty};
use crate::imaging::CaptureInfo;
use crate::metadata::ItemText;
use crate::naming::{HIGHLIGHT, RSS_FILE, index_name, relative_prefix};
use crate::paginate::{NavEntry, Page, page_sequence};
use chrono::NaiveDateTime;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Date format for image cards and viewer entries, e.g. `Sunday 02 June 2024 14:30`.
pub const DATE_FORMAT: &str = "%A %d %B %Y %H:%M";

/// Generator name and version for page metadata and feeds.
pub(crate) const GENERATOR: &str = concat!("foldergal ", env!("CARGO_PKG_VERSION"));

/// A sub-album as listed in its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct SubalbumCard {
    /// Directory name.
    pub name: String,
    pub description: Option<String>,
    /// Public images in the sub-album and everything below it.
    pub photo_count: usize,
}

/// A public image as listed in its album.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCard {
    /// Image filename.
    pub file: String,
    /// Thumbnail path relative to the album directory.
    pub thumbnail: String,
    /// Position among the album's public images; the viewer index.
    pub index: usize,
    pub text: ItemText,
    /// Formatted capture or modification time; empty when unknown.
    pub date: String,
    pub capture: CaptureInfo,
}

/// Everything one page needs besides its own slice of cards.
pub struct AlbumView<'a> {
    pub config: &'a AlbumConfig,
    /// Directory names from the site root; empty for the root album.
    pub segments: &'a [String],
    /// Every public image of the album, for the viewer and the counts.
    pub images: &'a [ImageCard],
    pub subalbum_count: usize,
}

impl AlbumView<'_> {
    fn level(&self) -> usize {
        self.segments.len()
    }

    /// Link to an ancestor `levels` directories up.
    fn up(&self, levels: usize) -> String {
        self.with_index(relative_prefix(levels))
    }

    /// Link into the immediate sub-album `name`.
    fn down(&self, name: &str) -> String {
        self.with_index(format!("{}/", url_escape(name)))
    }

    fn with_index(&self, mut href: String) -> String {
        if self.config.explicit_index_html {
            href.push_str("index.html");
        }
        href
    }
}

/// Format a timestamp for display.
pub fn format_date(time: NaiveDateTime) -> String {
    time.format(DATE_FORMAT).to_string()
}

/// `label_no_photo`, `label_one_photo` or `label_more_photos` for `count`.
///
/// Without `talkative` a zero count yields an empty string.
pub fn photo_label(count: usize, config: &AlbumConfig, talkative: bool) -> String {
    match count {
        0 if talkative => config.label_no_photo.clone(),
        0 => String::new(),
        1 => config.label_one_photo.clone(),
        n => config.label_more_photos.replace('#', &n.to_string()),
    }
}

/// `label_one_album` or `label_more_albums` for `count`; empty for zero.
pub fn album_label(count: usize, config: &AlbumConfig) -> String {
    match count {
        0 => String::new(),
        1 => config.label_one_album.clone(),
        n => config.label_more_albums.replace('#', &n.to_string()),
    }
}

/// Percent-encode a relative URL path, keeping `/` and URI punctuation.
pub fn url_escape(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            b'-' | b'_' | b'.' | b'~' | b'/' | b'!' | b'*' | b'\'' | b'(' | b')' => {
                out.push(byte as char)
            }
            b':' | b'@' | b'&' | b'=' | b'+' | b'$' | b',' | b';' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// JavaScript string literal that is safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

// ============================================================================
// Page Renderer
// ============================================================================

/// Render one page of an album.
pub fn render_album_page(view: &AlbumView, page: &Page<SubalbumCard, ImageCard>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (page_head(view))
            body {
                (menu(view))
                (paginator(page))
                @for card in page.subalbums {
                    (subalbum_card(view, card))
                }
                @for card in page.images {
                    (image_card(view.config, card))
                }
                (viewer_script(view))
                (footer(view.config))
            }
        }
    }
}

fn page_title(view: &AlbumView) -> String {
    match view.segments.last() {
        Some(name) => format!("{} :: {name}", view.config.title),
        None => view.config.title.clone(),
    }
}

fn page_head(view: &AlbumView) -> Markup {
    let config = view.config;
    let relative = relative_prefix(view.level());
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            meta name="author" content=(config.author);
            meta name="generator" content=(GENERATOR);
            title { (page_title(view)) }
            @if view.level() > 0 {
                link rel="home" title="Home" href=(view.up(view.level()));
                link rel="up" title="Up" href=(view.up(1));
            }
            link href={ (relative) (config.css) } media="all" rel="stylesheet" type="text/css";
            @if config.style_switcher {
                link href={ (relative) "black.css" } media="all" rel="alternate stylesheet" type="text/css" title="black";
                link href={ (relative) "white.css" } media="all" rel="alternate stylesheet" type="text/css" title="white";
            }
            @if config.generate_rss {
                link href=(RSS_FILE) rel="alternate" type="application/rss+xml" title="photo media feed";
            }
        }
    }
}

/// Breadcrumb from the site root to this album. Ancestors link upward.
fn breadcrumb(view: &AlbumView) -> Markup {
    let level = view.level();
    let labels = std::iter::once(view.config.title.as_str())
        .chain(view.segments.iter().map(String::as_str));
    html! {
        @for (depth, label) in labels.enumerate() {
            @if depth == level {
                span.actual-item { (label) }
            } @else {
                a.normal-item href=(view.up(level - depth)) { (label) }
                " :: "
            }
        }
    }
}

fn menu(view: &AlbumView) -> Markup {
    let config = view.config;
    let relative = relative_prefix(view.level());
    let stats: Vec<String> = [
        photo_label(view.images.len(), config, false),
        album_label(view.subalbum_count, config),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();

    html! {
        div.menu {
            div.navigation {
                (breadcrumb(view))
                @if config.show_stats_album {
                    span.menu-details {
                        @for (i, stat) in stats.iter().enumerate() {
                            @if i > 0 { (PreEscaped(" &nbsp; / &nbsp; ")) }
                            (stat)
                        }
                    }
                }
            }
            @if config.generate_rss {
                div.rss {
                    a href=(RSS_FILE) {
                        img src={ (relative) ".rss-icon.png" } title="RSS photo media feed" alt="RSS photo media feed";
                    }
                }
            }
            @if config.style_switcher {
                div.skin {
                    "Skin: "
                    a href="#" onclick="setActiveStyleSheet('black'); return false;" { "Black" }
                    ", "
                    a href="#" onclick="setActiveStyleSheet('white'); return false;" { "White" }
                }
            }
        }
    }
}

/// Previous/next and page-number links; empty for single-page albums.
fn paginator<S, I>(page: &Page<S, I>) -> Markup {
    html! {
        @if page.is_paginated() {
            span.paginator {
                @if page.has_prev() {
                    a href=(index_name(page.index - 1)) title="Previous Page" { "«" }
                }
                @for entry in page_sequence(page.index, page.page_count) {
                    @match entry {
                        NavEntry::Ellipsis => {
                            span.elipsis { "…" }
                        }
                        NavEntry::Page(target) => {
                            a id=[(target == page.index).then_some("current")]
                                href=(index_name(target))
                                title={ " Page " (target + 1) } { (target + 1) }
                        }
                    }
                }
                @if page.has_next() {
                    a href=(index_name(page.index + 1)) title="Next Page" { "»" }
                }
            }
        }
    }
}

fn subalbum_card(view: &AlbumView, card: &SubalbumCard) -> Markup {
    let config = view.config;
    html! {
        div.index-item.album {
            a href=(view.down(&card.name)) {
                img.image src={ (url_escape(&card.name)) "/" (HIGHLIGHT) } alt={ "Album: " (card.name) };
                @if config.show_title_album {
                    span.title { (card.name) }
                }
            }
            @if config.show_description {
                @if let Some(description) = &card.description {
                    span.description { (description) }
                }
            }
            @if config.show_stats_album {
                span.statistics { (photo_label(card.photo_count, config, true)) }
            }
        }
    }
}

fn image_card(config: &AlbumConfig, card: &ImageCard) -> Markup {
    let show_exif = config.show_exif && !card.capture.is_empty();
    html! {
        div.image-item.photo.first-image-item[card.index == 0] {
            a href=(url_escape(&card.file)) onclick={ "return viewer.show(" (card.index) ")" } {
                img.image src=(url_escape(&card.thumbnail)) alt=(card.file) title=(card.file);
            }
            @if config.show_date {
                span.datum { (card.date) }
            }
            @if config.show_title_photo {
                span.title { (card.text.name) }
            }
            @if config.show_description {
                @if let Some(description) = &card.text.description {
                    span.description { (description) }
                }
            }
            @if show_exif {
                span.exifBasic { (card.capture.basic_summary()) }
                @if config.show_extended_exif {
                    span.exifExtended { (card.capture.model.as_deref().unwrap_or_default()) }
                }
            }
        }
    }
}

/// Viewer setup: one entry per public image, in album order.
fn viewer_script(view: &AlbumView) -> Markup {
    let config = view.config;
    let relative = relative_prefix(view.level());

    let mut js = String::from("\nvar viewer = new PhotoViewer();\n");
    if !config.panning {
        js.push_str("viewer.disablePanning();\n");
    }
    if !config.fading {
        js.push_str("viewer.disableFading();\n");
    }
    for card in view.images {
        js.push_str(&format!(
            "viewer.add({}, {}, {});\n",
            js_string(&url_escape(&card.file)),
            js_string(&card.text.name),
            js_string(&card.date)
        ));
    }

    html! {
        @if config.style_switcher {
            script type="text/javascript" src={ (relative) "switcher.js" } {}
        }
        script type="text/javascript" src={ (relative) "slide.js" } {}
        script type="text/javascript" { (PreEscaped(js)) }
    }
}

fn footer(config: &AlbumConfig) -> Markup {
    let copyright = non_empty(&config.copyright).unwrap_or("All rights reserved.");
    html! {
        div.copyright {
            p.license {
                (config.author_label) " " (config.author)
                br;
                (copyright)
            }
            p.software {
                "Generated by " em { "foldergal" } " - a photo album generator."
            }
        }
        @if let Some(account) = non_empty(&config.google_analytics) {
            (analytics(account))
        }
    }
}

fn analytics(account: &str) -> Markup {
    let setup = format!(
        "window.dataLayer = window.dataLayer || [];\n\
         function gtag(){{dataLayer.push(arguments);}}\n\
         gtag('js', new Date());\n\
         gtag('config', {});\n",
        js_string(account)
    );
    html! {
        script async src={ "https://www.googletagmanager.com/gtag/js?id=" (url_escape(account)) } {}
        script type="text/javascript" { (PreEscaped(setup)) }
    }
}

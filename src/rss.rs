//! Media RSS feed for one album.
//!
//! Every album with `generate_rss` gets a `photos.rss` listing its own public
//! images (not those of sub-albums), oldest first, capped at the
//! [`MAX_ITEMS`] most recently modified. Items point at the image and at its
//! plain (effect-free) thumbnail.

use crate::config::AlbumConfig;
use crate::naming::RSS_FILE;
use crate::render::{GENERATOR, url_escape};
use chrono::{DateTime, Utc};
use maud::html;

/// Feed length cap.
pub const MAX_ITEMS: usize = 1000;

/// One image in the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub file: String,
    /// Thumbnail path relative to the album directory.
    pub thumbnail: String,
    pub name: String,
    pub description: Option<String>,
    pub published: DateTime<Utc>,
}

/// Sort `(time, image)` pairs by time and keep the latest [`MAX_ITEMS`].
///
/// Ties are broken by name so the order is stable across runs.
pub fn select_latest<T: Ord>(mut timed: Vec<(DateTime<Utc>, T)>) -> Vec<(DateTime<Utc>, T)> {
    timed.sort();
    let skip = timed.len().saturating_sub(MAX_ITEMS);
    timed.split_off(skip)
}

fn xml_escape(text: &str) -> String {
    html! { (text) }.into_string()
}

fn channel_title(config: &AlbumConfig, segments: &[String]) -> String {
    std::iter::once(config.title.as_str())
        .chain(segments.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" :: ")
}

fn channel_link(segments: &[String]) -> String {
    let path: Vec<String> = segments.iter().map(|s| url_escape(s)).collect();
    format!("{}/{RSS_FILE}", path.join("/"))
}

fn render_item(config: &AlbumConfig, item: &FeedItem) -> String {
    let image = xml_escape(&url_escape(&item.file));
    format!(
        "        <item>
            <title>{title}</title>
            <media:description>{description}</media:description>
            <link>{image}</link>
            <pubDate>{published}</pubDate>
            <author>{author}</author>
            <media:thumbnail url=\"{thumbnail}\"/>
            <media:content url=\"{image}\"/>
        </item>
",
        title = xml_escape(&item.name),
        description = xml_escape(item.description.as_deref().unwrap_or_default()),
        published = item.published.to_rfc2822(),
        author = xml_escape(&config.author),
        thumbnail = xml_escape(&url_escape(&item.thumbnail)),
    )
}

/// Render the complete feed document.
pub fn render_feed(
    config: &AlbumConfig,
    segments: &[String],
    items: &[FeedItem],
    published: DateTime<Utc>,
) -> String {
    let body: String = items.iter().map(|item| render_item(config, item)).collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>
<rss version=\"2.0\" xmlns:media=\"http://search.yahoo.com/mrss/\" xmlns:atom=\"http://www.w3.org/2005/Atom\">
    <channel>
        <title>{title}</title>
        <link>{link}</link>
        <pubDate>{published}</pubDate>
        <copyright>{copyright}</copyright>
        <generator>{GENERATOR}</generator>
{body}    </channel>
</rss>
",
        title = xml_escape(&channel_title(config, segments)),
        link = xml_escape(&channel_link(segments)),
        published = published.to_rfc2822(),
        copyright = xml_escape(&config.copyright),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_contains, assert_not_contains};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn item(file: &str, secs: i64) -> FeedItem {
        FeedItem {
            file: file.to_string(),
            thumbnail: format!("thumbnails/th_{file}"),
            name: file.to_string(),
            description: None,
            published: at(secs),
        }
    }

    #[test]
    fn select_latest_sorts_by_time() {
        let timed = vec![(at(30), "c"), (at(10), "a"), (at(20), "b")];
        let names: Vec<&str> = select_latest(timed).into_iter().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn select_latest_caps_at_most_recent() {
        let timed: Vec<(DateTime<Utc>, usize)> =
            (0..MAX_ITEMS + 5).rev().map(|i| (at(i as i64), i)).collect();
        let kept = select_latest(timed);
        assert_eq!(kept.len(), MAX_ITEMS);
        assert_eq!(kept.first().map(|(_, i)| *i), Some(5));
        assert_eq!(kept.last().map(|(_, i)| *i), Some(MAX_ITEMS + 4));
    }

    #[test]
    fn channel_names_album_path() {
        let config = AlbumConfig::default();
        let segments = vec!["Holidays".to_string(), "Crete 2024".to_string()];
        let xml = render_feed(&config, &segments, &[], at(0));
        assert_contains(&xml, "<title>Photo Album :: Holidays :: Crete 2024</title>");
        assert_contains(&xml, "<link>Holidays/Crete%202024/photos.rss</link>");
        assert_contains(&xml, "1 Jan 1970 00:00:00 +0000</pubDate>");
        assert_contains(&xml, "<generator>foldergal ");
        assert_not_contains(&xml, "<item>");
    }

    #[test]
    fn root_channel_has_plain_title() {
        let config = AlbumConfig::default();
        let xml = render_feed(&config, &[], &[], at(0));
        assert_contains(&xml, "<title>Photo Album</title>");
        assert_contains(&xml, "<link>/photos.rss</link>");
    }

    #[test]
    fn items_are_escaped() {
        let config = AlbumConfig {
            author: "Tom & Jerry".to_string(),
            ..Default::default()
        };
        let mut entry = item("a b.jpg", 60);
        entry.name = "<b>".to_string();
        entry.description = Some("fish & chips".to_string());
        let xml = render_feed(&config, &[], &[entry], at(0));

        assert_contains(&xml, "<title>&lt;b&gt;</title>");
        assert_contains(&xml, "<media:description>fish &amp; chips</media:description>");
        assert_contains(&xml, "<link>a%20b.jpg</link>");
        assert_contains(&xml, "<author>Tom &amp; Jerry</author>");
        assert_contains(&xml, r#"<media:thumbnail url="thumbnails/th_a%20b.jpg"/>"#);
        assert_contains(&xml, r#"<media:content url="a%20b.jpg"/>"#);
        assert_contains(&xml, "1 Jan 1970 00:01:00 +0000</pubDate>");
    }

    #[test]
    fn url_ampersand_is_xml_escaped() {
        let config = AlbumConfig::default();
        let xml = render_feed(&config, &[], &[item("a&b.jpg", 0)], at(0));
        assert_contains(&xml, "<link>a&amp;b.jpg</link>");
    }
}

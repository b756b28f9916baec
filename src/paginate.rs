//! Pagination of album listings.
//!
//! An album lists its sub-albums first, then its images. With a positive page
//! size the combined sequence is cut into consecutive pages of that size; a
//! page may end inside the sub-albums and the next one continue with them, or
//! start with the last sub-albums and fill up with the first images.
//!
//! ```text
//! subalbums = [A, B, C], images = [x, y, z, w]
//!
//! page size 3:  [A B C] [x y z] [w]
//! page size 4:  [A B C x] [y z w]
//! page size 0:  [A B C x y z w]        (pagination disabled)
//! ```
//!
//! Page navigation with more than ten pages is compressed around the current
//! page by [`page_sequence`].

use std::ops::RangeInclusive;

/// Navigation is compressed above this many pages.
const COMPRESS_ABOVE: usize = 10;

/// Items assigned to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, S, I> {
    /// 0-based page index.
    pub index: usize,
    pub page_count: usize,
    pub subalbums: &'a [S],
    pub images: &'a [I],
    /// Position of `images[0]` within the album's full image list.
    pub image_offset: usize,
}

impl<S, I> Page<'_, S, I> {
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.page_count
    }

    /// Whether the listing spans several pages and needs navigation.
    pub fn is_paginated(&self) -> bool {
        self.page_count > 1
    }
}

/// Number of pages for `total` items; always at least one.
pub fn page_count(total: usize, page_size: i64) -> usize {
    if page_size <= 0 {
        return 1;
    }
    total.div_ceil(page_size as usize).max(1)
}

/// Split `subalbums ++ images` into pages of `page_size` items.
///
/// A page size of zero or less disables pagination: one page holds everything.
pub fn paginate<'a, S, I>(subalbums: &'a [S], images: &'a [I], page_size: i64) -> Vec<Page<'a, S, I>> {
    let total = subalbums.len() + images.len();
    let pages = page_count(total, page_size);
    let size = if page_size <= 0 {
        total
    } else {
        page_size as usize
    };
    let split = subalbums.len();

    (0..pages)
        .map(|index| {
            let start = (index * size).min(total);
            let end = (start + size).min(total);
            let image_offset = start.saturating_sub(split);
            Page {
                index,
                page_count: pages,
                subalbums: &subalbums[start.min(split)..end.min(split)],
                images: &images[image_offset..end.saturating_sub(split)],
                image_offset,
            }
        })
        .collect()
}

/// One entry of the page-number navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEntry {
    /// Link to the page with this 0-based index.
    Page(usize),
    Ellipsis,
}

/// Page numbers to show for `current` (0-based) out of `page_count`.
///
/// Up to ten pages are all listed. Above that, with 1-based numbers:
///
/// - `current < 4`: `1..=5` and the last two pages
/// - `current > page_count - 3`: `1..=2` and the last four pages
/// - otherwise: `1..=2`, `current-1..=current+3`, and the last two pages
///
/// Groups that touch or overlap are merged; gaps become [`NavEntry::Ellipsis`].
pub fn page_sequence(current: usize, page_count: usize) -> Vec<NavEntry> {
    let groups: Vec<RangeInclusive<usize>> = if page_count <= COMPRESS_ABOVE {
        vec![1..=page_count]
    } else if current < 4 {
        vec![1..=5, page_count - 1..=page_count]
    } else if current > page_count - 3 {
        vec![1..=2, page_count - 3..=page_count]
    } else {
        vec![1..=2, current - 1..=current + 3, page_count - 1..=page_count]
    };

    let mut entries = Vec::new();
    let mut last_shown = 0;
    for group in groups {
        let (start, end) = (*group.start(), *group.end());
        if last_shown > 0 && start > last_shown + 1 {
            entries.push(NavEntry::Ellipsis);
        }
        for number in start.max(last_shown + 1)..=end {
            entries.push(NavEntry::Page(number - 1));
        }
        last_shown = last_shown.max(end);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBS: [&str; 3] = ["A", "B", "C"];
    const IMGS: [&str; 4] = ["x", "y", "z", "w"];

    fn shape<'a>(pages: &[Page<'a, &'a str, &'a str>]) -> Vec<Vec<&'a str>> {
        pages
            .iter()
            .map(|p| p.subalbums.iter().chain(p.images.iter()).copied().collect())
            .collect()
    }

    fn numbers(entries: &[NavEntry]) -> String {
        entries
            .iter()
            .map(|e| match e {
                NavEntry::Page(i) => (i + 1).to_string(),
                NavEntry::Ellipsis => "…".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    // =========================================================================
    // Slicing
    // =========================================================================

    #[test]
    fn subalbums_fill_page_exactly() {
        let pages = paginate(&SUBS, &IMGS, 3);
        assert_eq!(
            shape(&pages),
            vec![vec!["A", "B", "C"], vec!["x", "y", "z"], vec!["w"]]
        );
        assert!(pages[0].images.is_empty());
        assert!(pages[1].subalbums.is_empty());
    }

    #[test]
    fn page_spans_subalbum_image_boundary() {
        let pages = paginate(&SUBS, &IMGS, 4);
        assert_eq!(
            shape(&pages),
            vec![vec!["A", "B", "C", "x"], vec!["y", "z", "w"]]
        );
        assert_eq!(pages[0].subalbums.len(), 3);
        assert_eq!(pages[0].images, &["x"]);
    }

    #[test]
    fn non_positive_size_disables_pagination() {
        for size in [0, -1, -50] {
            let pages = paginate(&SUBS, &IMGS, size);
            assert_eq!(pages.len(), 1);
            assert_eq!(
                shape(&pages),
                vec![vec!["A", "B", "C", "x", "y", "z", "w"]]
            );
            assert!(!pages[0].is_paginated());
        }
    }

    #[test]
    fn empty_album_has_one_empty_page() {
        let pages = paginate::<&str, &str>(&[], &[], 5);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].subalbums.is_empty() && pages[0].images.is_empty());
        assert!(!pages[0].has_prev() && !pages[0].has_next());
    }

    #[test]
    fn exact_fit_is_single_page() {
        let pages = paginate(&SUBS, &IMGS, 7);
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].is_paginated());
    }

    #[test]
    fn every_item_exactly_once_in_order() {
        let subs: Vec<usize> = (0..7).collect();
        let imgs: Vec<usize> = (100..109).collect();
        for s in 0..=subs.len() {
            for i in 0..=imgs.len() {
                for size in 1..=12i64 {
                    let pages = paginate(&subs[..s], &imgs[..i], size);
                    let total = s + i;
                    assert_eq!(pages.len(), page_count(total, size));

                    let flat: Vec<usize> = pages
                        .iter()
                        .flat_map(|p| p.subalbums.iter().chain(p.images.iter()).copied())
                        .collect();
                    let expected: Vec<usize> =
                        subs[..s].iter().chain(imgs[..i].iter()).copied().collect();
                    assert_eq!(flat, expected, "s={s} i={i} size={size}");

                    for (n, page) in pages.iter().enumerate() {
                        let len = page.subalbums.len() + page.images.len();
                        if n + 1 < pages.len() {
                            assert_eq!(len, size as usize, "s={s} i={i} size={size} page={n}");
                        } else if total > 0 {
                            assert!(len >= 1 && len <= size as usize);
                        }
                        if !page.images.is_empty() {
                            assert!(pages[n + 1..].iter().all(|p| p.subalbums.is_empty()));
                        }
                        assert_eq!(page.index, n);
                        assert_eq!(page.has_prev(), n > 0);
                        assert_eq!(page.has_next(), n + 1 < pages.len());
                    }
                }
            }
        }
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 3), 1);
        assert_eq!(page_count(1, 3), 1);
        assert_eq!(page_count(3, 3), 1);
        assert_eq!(page_count(4, 3), 2);
        assert_eq!(page_count(100, -1), 1);
    }

    #[test]
    fn image_offset_tracks_position() {
        let pages = paginate(&SUBS, &IMGS, 2);
        let offsets: Vec<usize> = pages.iter().map(|p| p.image_offset).collect();
        // [A B] [C x] [y z] [w]
        assert_eq!(offsets, vec![0, 0, 1, 3]);
    }

    // =========================================================================
    // Navigation sequence
    // =========================================================================

    #[test]
    fn short_sequences_list_every_page() {
        assert_eq!(numbers(&page_sequence(0, 1)), "1");
        assert_eq!(numbers(&page_sequence(3, 10)), "1 2 3 4 5 6 7 8 9 10");
    }

    #[test]
    fn long_sequence_near_start() {
        for current in 0..4 {
            assert_eq!(numbers(&page_sequence(current, 20)), "1 2 3 4 5 … 19 20");
        }
    }

    #[test]
    fn long_sequence_in_middle() {
        assert_eq!(numbers(&page_sequence(4, 20)), "1 2 3 4 5 6 7 … 19 20");
        assert_eq!(numbers(&page_sequence(10, 20)), "1 2 … 9 10 11 12 13 … 19 20");
        assert_eq!(numbers(&page_sequence(16, 20)), "1 2 … 15 16 17 18 19 20");
    }

    #[test]
    fn long_sequence_near_end() {
        assert_eq!(numbers(&page_sequence(17, 20)), "1 2 … 16 17 18 19 20");
        assert_eq!(numbers(&page_sequence(18, 20)), "1 2 … 17 18 19 20");
        assert_eq!(numbers(&page_sequence(19, 20)), "1 2 … 17 18 19 20");
    }

    #[test]
    fn eleven_pages_every_position_is_strictly_increasing() {
        for current in 0..11 {
            let pages: Vec<usize> = page_sequence(current, 11)
                .into_iter()
                .filter_map(|e| match e {
                    NavEntry::Page(i) => Some(i),
                    NavEntry::Ellipsis => None,
                })
                .collect();
            assert!(pages.windows(2).all(|w| w[0] < w[1]), "current={current}");
            assert_eq!(pages.first(), Some(&0));
            assert_eq!(pages.last(), Some(&10));
        }
    }
}

//! Page window computation for paginated listings.
//!
//! A listing with many pages renders the first page, the last page, and a
//! small window around the current page. Elided ranges are rendered as gaps.

pub mod error;
pub mod links;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use error::PaginationError;
pub use links::{page_query, PageLink, PageLinks};

/// Listings with this many pages or fewer render every page.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// One slot in a rendered page list: a clickable page number or a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEntry {
    Page(u32),
    Gap,
}

impl PageEntry {
    pub fn page(&self) -> Option<u32> {
        match self {
            PageEntry::Page(n) => Some(*n),
            PageEntry::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, PageEntry::Gap)
    }
}

// Pages serialize as bare numbers, gaps as the string "gap".
impl Serialize for PageEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageEntry::Page(n) => serializer.serialize_u32(*n),
            PageEntry::Gap => serializer.serialize_str("gap"),
        }
    }
}

impl<'de> Deserialize<'de> for PageEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(PageEntry::Page(n)),
            Raw::Text(s) if s == "gap" => Ok(PageEntry::Gap),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected page number or \"gap\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Compute the ordered page entries to render for `current_page` of `total_pages`.
///
/// Both arguments are 1-indexed. Fails with `InvalidArgument` when either is zero
/// or when `current_page` lies beyond `total_pages`.
pub fn compute_window(current_page: u32, total_pages: u32) -> Result<Vec<PageEntry>, PaginationError> {
    validate(current_page, total_pages)?;

    if total_pages <= MAX_VISIBLE_PAGES {
        return Ok((1..=total_pages).map(PageEntry::Page).collect());
    }

    let mut pages = vec![PageEntry::Page(1)];

    if current_page > 3 {
        pages.push(PageEntry::Gap);
    }

    // Clamped to 2..=total-1 so the first and last pages are never repeated
    let start = current_page.saturating_sub(1).max(2);
    let end = current_page.saturating_add(1).min(total_pages - 1);
    pages.extend((start..=end).map(PageEntry::Page));

    if current_page < total_pages - 2 {
        pages.push(PageEntry::Gap);
    }

    pages.push(PageEntry::Page(total_pages));
    Ok(pages)
}

/// Number of pages needed to show `total_items` at `per_page` items each.
/// An empty listing still has one (empty) page.
pub fn total_pages(total_items: u64, per_page: u32) -> Result<u32, PaginationError> {
    if per_page == 0 {
        return Err(PaginationError::invalid("per_page must be at least 1"));
    }
    let pages = total_items.div_ceil(u64::from(per_page)).max(1);
    u32::try_from(pages).map_err(|_| PaginationError::invalid(format!("too many pages: {}", pages)))
}

/// Row offset of the first item on `page`.
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(per_page)
}

/// `?page=` query parameter for paginated listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    /// Resolve the requested page against the listing size, defaulting to page 1.
    pub fn resolve(&self, total_pages: u32) -> Result<u32, PaginationError> {
        let page = self.page.unwrap_or(1);
        validate(page, total_pages)?;
        Ok(page)
    }
}

fn validate(current_page: u32, total_pages: u32) -> Result<(), PaginationError> {
    if total_pages == 0 {
        return Err(PaginationError::invalid("total_pages must be at least 1"));
    }
    if current_page == 0 {
        return Err(PaginationError::invalid("current_page must be at least 1"));
    }
    if current_page > total_pages {
        return Err(PaginationError::invalid(format!(
            "current_page {} exceeds total_pages {}",
            current_page, total_pages
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageEntry::{Gap, Page};

    #[test]
    fn small_listings_render_every_page() {
        for total in 1..=MAX_VISIBLE_PAGES {
            let expected: Vec<PageEntry> = (1..=total).map(Page).collect();
            assert_eq!(compute_window(total, total).unwrap(), expected);
            assert_eq!(compute_window(1, total).unwrap(), expected);
        }
    }

    #[test]
    fn middle_of_five_has_no_gaps() {
        assert_eq!(
            compute_window(3, 5).unwrap(),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn first_page_of_ten() {
        assert_eq!(compute_window(1, 10).unwrap(), vec![Page(1), Page(2), Gap, Page(10)]);
    }

    #[test]
    fn middle_page_of_ten() {
        assert_eq!(
            compute_window(5, 10).unwrap(),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]
        );
    }

    #[test]
    fn next_to_last_page_of_ten() {
        assert_eq!(
            compute_window(9, 10).unwrap(),
            vec![Page(1), Gap, Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn boundary_pages_of_six() {
        assert_eq!(compute_window(1, 6).unwrap(), vec![Page(1), Page(2), Gap, Page(6)]);
        assert_eq!(compute_window(2, 6).unwrap(), vec![Page(1), Page(2), Page(3), Gap, Page(6)]);
        assert_eq!(compute_window(5, 6).unwrap(), vec![Page(1), Gap, Page(4), Page(5), Page(6)]);
        assert_eq!(compute_window(6, 6).unwrap(), vec![Page(1), Gap, Page(5), Page(6)]);
    }

    #[test]
    fn large_listings_start_at_one_and_end_at_total_without_duplicates() {
        for total in 6..=40 {
            for current in 1..=total {
                let window = compute_window(current, total).unwrap();
                assert_eq!(window.first(), Some(&Page(1)));
                assert_eq!(window.last(), Some(&Page(total)));

                let pages: Vec<u32> = window.iter().filter_map(PageEntry::page).collect();
                assert!(
                    pages.windows(2).all(|w| w[0] < w[1]),
                    "duplicate or unordered pages for ({}, {})",
                    current,
                    total
                );

                assert!(pages.contains(&current), "current page missing for ({}, {})", current, total);
                assert!(window.iter().filter(|e| e.is_gap()).count() <= 2);
                assert!(!window.windows(2).any(|w| w[0].is_gap() && w[1].is_gap()));
            }
        }
    }

    #[test]
    fn rejects_out_of_range_arguments() {
        assert!(matches!(compute_window(0, 10), Err(PaginationError::InvalidArgument(_))));
        assert!(matches!(compute_window(1, 0), Err(PaginationError::InvalidArgument(_))));
        assert!(matches!(compute_window(11, 10), Err(PaginationError::InvalidArgument(_))));
    }

    #[test]
    fn extreme_page_counts_do_not_overflow() {
        let window = compute_window(u32::MAX, u32::MAX).unwrap();
        assert_eq!(window, vec![Page(1), Gap, Page(u32::MAX - 1), Page(u32::MAX)]);
    }

    #[test]
    fn entries_serialize_as_numbers_and_gap_strings() {
        let window = compute_window(5, 10).unwrap();
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json, serde_json::json!([1, "gap", 4, 5, 6, "gap", 10]));

        let back: Vec<PageEntry> = serde_json::from_value(json).unwrap();
        assert_eq!(back, window);
        assert!(serde_json::from_str::<PageEntry>("\"ellipsis\"").is_err());
    }

    #[test]
    fn total_pages_rounds_up_and_never_hits_zero() {
        assert_eq!(total_pages(0, 20).unwrap(), 1);
        assert_eq!(total_pages(20, 20).unwrap(), 1);
        assert_eq!(total_pages(21, 20).unwrap(), 2);
        assert_eq!(total_pages(199, 20).unwrap(), 10);
        assert!(total_pages(10, 0).is_err());
    }

    #[test]
    fn page_offsets() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }

    #[test]
    fn page_query_defaults_to_first_page() {
        assert_eq!(PageQuery::default().resolve(4).unwrap(), 1);
        assert_eq!(PageQuery { page: Some(4) }.resolve(4).unwrap(), 4);
        assert!(PageQuery { page: Some(5) }.resolve(4).is_err());
        assert!(PageQuery { page: Some(0) }.resolve(4).is_err());
    }
}

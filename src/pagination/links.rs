use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::{compute_window, PageEntry, PaginationError};

/// Everything a page-navigation control needs: previous/next targets and the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub current_page: u32,
    pub total_pages: u32,
    /// `None` when the previous control is disabled (first page)
    pub previous: Option<u32>,
    /// `None` when the next control is disabled (last page)
    pub next: Option<u32>,
    pub pages: Vec<PageLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub entry: PageEntry,
    pub current: bool,
}

impl PageLinks {
    pub fn new(current_page: u32, total_pages: u32) -> Result<Self, PaginationError> {
        let pages = compute_window(current_page, total_pages)?
            .into_iter()
            .map(|entry| PageLink {
                entry,
                current: entry == PageEntry::Page(current_page),
            })
            .collect();

        Ok(Self {
            current_page,
            total_pages,
            previous: (current_page > 1).then(|| current_page - 1),
            next: (current_page < total_pages).then(|| current_page + 1),
            pages,
        })
    }

    /// Query strings for each clickable page, keyed by page number.
    pub fn hrefs(&self, existing_query: &str) -> Vec<(u32, String)> {
        self.pages
            .iter()
            .filter_map(|link| link.entry.page())
            .map(|page| (page, format!("?{}", page_query(existing_query, page))))
            .collect()
    }
}

/// Set the `page` parameter on an existing query string, keeping every other parameter.
///
/// The first `page` pair is replaced in place and any later duplicates are dropped;
/// when absent, `page` is appended.
pub fn page_query(existing_query: &str, page: u32) -> String {
    let existing = existing_query.strip_prefix('?').unwrap_or(existing_query);
    let value = page.to_string();

    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, v) in form_urlencoded::parse(existing.as_bytes()) {
        if key == "page" {
            if !replaced {
                pairs.push(("page".to_string(), value.clone()));
                replaced = true;
            }
            continue;
        }
        pairs.push((key.into_owned(), v.into_owned()));
    }
    if !replaced {
        pairs.push(("page".to_string(), value));
    }

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

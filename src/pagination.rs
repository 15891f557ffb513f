use serde::{Deserialize, Serialize};

/// Pages always shown at each end of the pager.
pub const BOUNDARY_PAGES: usize = 1;
/// Pages shown on each side of the current page.
pub const SIBLING_PAGES: usize = 2;

/// Pagination metadata as reported by the backend. Never computed locally
/// for server-side tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(alias = "total_items", alias = "total")]
    pub total_items: usize,
    #[serde(alias = "total_pages")]
    pub total_pages: usize,
    /// 1-based.
    #[serde(alias = "current_page", alias = "page")]
    pub current_page: usize,
}

impl PaginationMeta {
    /// Metadata for an in-memory data set.
    pub fn for_rows(total_items: usize, page_size: usize, page_index: usize) -> Self {
        let total_pages = total_items.div_ceil(page_size.max(1));
        Self {
            total_items,
            total_pages,
            current_page: page_index.min(total_pages.saturating_sub(1)) + 1,
        }
    }
}

/// Windowed list of page numbers; `None` marks an ellipsis.
///
/// Gaps of a single page are filled with that page instead of an ellipsis,
/// so the control keeps a stable width.
pub fn page_window(
    total_pages: usize,
    current_page: usize,
    boundary: usize,
    siblings: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let current_page = current_page.clamp(1, last_page);
    let mut pages = Vec::new();

    let left_end = (1 + boundary).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(siblings));
    let mid_end = (current_page + siblings + 1).min(last_page + 1);

    push_gap(&mut pages, left_end, mid_start);
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max((last_page + 1).saturating_sub(boundary));

    push_gap(&mut pages, mid_end, right_start);
    pages.extend((right_start..=last_page).map(Some));

    pages
}

fn push_gap(pages: &mut Vec<Option<usize>>, from: usize, to: usize) {
    match to.saturating_sub(from) {
        0 => {}
        1 => pages.push(Some(from)),
        _ => pages.push(None),
    }
}

/// Pager model handed to templates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub pages: Vec<Option<usize>>,
    /// 1-based current page.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Pager {
    pub fn new(meta: &PaginationMeta) -> Self {
        let page = if meta.current_page == 0 {
            1
        } else {
            meta.current_page
        };

        let pages = page_window(meta.total_pages, page, BOUNDARY_PAGES, SIBLING_PAGES);

        Self {
            pages,
            page,
            total_pages: meta.total_pages,
            total_items: meta.total_items,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

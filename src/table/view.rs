//! Serializable table view handed to the `components/table.html` template.

use serde::Serialize;

use crate::pagination::Pager;
use crate::query::SortDirection;
use crate::table::column::{CellFormat, FilterOption};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub id: String,
    pub label: String,
    pub sortable: bool,
    pub indicator: Option<SortDirection>,
    /// Target of a click on a sortable header.
    pub href: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub text: String,
    pub format: CellFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub label: String,
    pub href: String,
    pub destructive: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: Option<String>,
    pub cells: Vec<CellView>,
    pub actions: Vec<ActionView>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    Loading,
    Empty,
}

/// Single row spanning every column, shown instead of data rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub colspan: usize,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLinkView {
    /// 1-based label; `None` renders an ellipsis.
    pub number: Option<usize>,
    pub href: Option<String>,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub links: Vec<PageLinkView>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl PaginationView {
    /// Builds links for `pager`, `href` maps a zero-based page index to its
    /// target.
    pub fn new(pager: &Pager, href: impl Fn(usize) -> String) -> Self {
        let links = pager
            .pages
            .iter()
            .map(|number| PageLinkView {
                number: *number,
                href: number.map(|n| href(n - 1)),
                current: *number == Some(pager.page),
            })
            .collect();

        Self {
            links,
            previous: pager.has_previous().then(|| href(pager.page - 2)),
            next: pager.has_next().then(|| href(pager.page)),
            page: pager.page,
            total_pages: pager.total_pages,
            total_items: pager.total_items,
        }
    }

    /// Number of numbered page buttons.
    pub fn button_count(&self) -> usize {
        self.links.iter().filter(|link| link.number.is_some()).count()
    }

    pub fn ellipsis_count(&self) -> usize {
        self.links.iter().filter(|link| link.number.is_none()).count()
    }
}

/// Filter-by selector and the value control for the selected field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterView {
    pub action: String,
    pub options: Vec<FilterOption>,
    pub selected: Option<String>,
    pub value: String,
    /// Raw query string of the current URL, re-submitted with the form so
    /// unrelated keys survive.
    pub query: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub placeholder: Option<Placeholder>,
    pub pagination: PaginationView,
    pub filter: Option<FilterView>,
    pub has_actions: bool,
}

//! Table query state carried in the URL.
//!
//! [`TableQueryState`] is the single source of truth for which page, sort and
//! filter a listing requests. It is decoded fresh from the query string on
//! every request and never mutated in place; changes go through
//! [`QueryParamSync`] which produces the next URL.

use serde::{Deserialize, Serialize};

pub mod sync;

pub use sync::{Navigation, NavigationMode, QueryParamSync};

/// Page size used when the URL carries none or an invalid one.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Largest page size accepted from the URL.
pub const MAX_PAGE_SIZE: usize = 100;
/// Largest zero-based page index accepted from the URL. Anything above is
/// treated as malformed.
pub const MAX_PAGE_INDEX: usize = 1_000_000;

/// Query string keys understood by the synchronizer.
pub mod keys {
    pub const PAGE_INDEX: &str = "pageIndex";
    pub const PAGE_SIZE: &str = "pageSize";
    pub const SORT_BY: &str = "sortBy";
    pub const DIRECTION: &str = "direction";
    pub const SEARCH: &str = "search";
    pub const FILTER_BY: &str = "filterBy";

    /// Legacy 1-based page number, read only when `pageIndex` is absent.
    pub const LEGACY_PAGE: &str = "page";
    /// Legacy page size, read only when `pageSize` is absent.
    pub const LEGACY_LIMIT: &str = "limit";
    /// Legacy sort direction, read only when `direction` is absent.
    pub const LEGACY_SORT_ORDER: &str = "sortOrder";

    /// Every key owned by the table state, canonical and legacy.
    pub const ALL: [&str; 9] = [
        PAGE_INDEX,
        PAGE_SIZE,
        SORT_BY,
        DIRECTION,
        SEARCH,
        FILTER_BY,
        LEGACY_PAGE,
        LEGACY_LIMIT,
        LEGACY_SORT_ORDER,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Parses `asc`/`desc` case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// A sort applied to exactly one column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSort {
    pub column: String,
    pub direction: SortDirection,
}

impl ColumnSort {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

/// Pagination, sort and filter intent of a table view.
///
/// `page_index` is zero-based both here and in the URL. Backends that count
/// pages from one get `page_index + 1` through
/// [`crate::store::ListParams::from_state`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableQueryState {
    pub page_index: usize,
    pub page_size: usize,
    pub sorting: Option<ColumnSort>,
    pub search: String,
    pub filter_by: Option<String>,
}

impl Default for TableQueryState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sorting: None,
            search: String::new(),
            filter_by: None,
        }
    }
}

impl TableQueryState {
    /// Decodes the state from a raw query string. Never fails: malformed
    /// values fall back to their defaults.
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(&parse_pairs(query))
    }

    /// Decodes the state from already split query pairs.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let page_index = match lookup(keys::PAGE_INDEX) {
            Some(raw) => raw.trim().parse::<usize>().ok(),
            None => lookup(keys::LEGACY_PAGE)
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .map(|page| page.saturating_sub(1)),
        }
        .filter(|index| *index <= MAX_PAGE_INDEX)
        .unwrap_or(0);

        let page_size = lookup(keys::PAGE_SIZE)
            .or_else(|| lookup(keys::LEGACY_LIMIT))
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let direction = lookup(keys::DIRECTION)
            .or_else(|| lookup(keys::LEGACY_SORT_ORDER))
            .and_then(SortDirection::parse)
            .unwrap_or(SortDirection::Asc);

        let sorting = lookup(keys::SORT_BY)
            .map(str::trim)
            .filter(|column| !column.is_empty())
            .map(|column| ColumnSort::new(column, direction));

        let search = lookup(keys::SEARCH)
            .map(|raw| raw.trim().to_string())
            .unwrap_or_default();

        let filter_by = lookup(keys::FILTER_BY)
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(str::to_string);

        Self {
            page_index,
            page_size,
            sorting,
            search,
            filter_by,
        }
    }

    /// Canonical query pairs for this state. Empty search and absent
    /// sort/filter are omitted.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (keys::PAGE_INDEX.to_string(), self.page_index.to_string()),
            (keys::PAGE_SIZE.to_string(), self.page_size.to_string()),
        ];
        if let Some(sort) = &self.sorting {
            pairs.push((keys::SORT_BY.to_string(), sort.column.clone()));
            pairs.push((
                keys::DIRECTION.to_string(),
                sort.direction.as_str().to_string(),
            ));
        }
        if !self.search.is_empty() {
            pairs.push((keys::SEARCH.to_string(), self.search.clone()));
        }
        if let Some(filter_by) = &self.filter_by {
            pairs.push((keys::FILTER_BY.to_string(), filter_by.clone()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_pairs())
    }

    /// Drops a sort column or filter field the table does not know about.
    pub fn restrict<'a, S, F>(mut self, sortable: S, filterable: F) -> Self
    where
        S: IntoIterator<Item = &'a str>,
        F: IntoIterator<Item = &'a str>,
    {
        if let Some(sort) = &self.sorting {
            if !sortable.into_iter().any(|id| id == sort.column) {
                self.sorting = None;
            }
        }
        if let Some(field) = &self.filter_by {
            if !filterable.into_iter().any(|id| id == field) {
                self.filter_by = None;
            }
        }
        self
    }

    /// Returns the same state on the first page.
    pub fn reset_page(mut self) -> Self {
        self.page_index = 0;
        self
    }
}

/// Splits a query string into decoded pairs, ignoring a leading `?`.
pub(crate) fn parse_pairs(query: &str) -> Vec<(String, String)> {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return Vec::new();
    }
    serde_html_form::from_str::<Vec<(String, String)>>(query).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed query string {query:?}: {err}");
        Vec::new()
    })
}

pub(crate) fn encode_pairs(pairs: &[(String, String)]) -> String {
    serde_html_form::to_string(pairs).unwrap_or_else(|err| {
        log::error!("Failed to encode query pairs: {err}");
        String::new()
    })
}

//! URL <-> [`TableQueryState`] projection.

use serde::Serialize;

use crate::query::{ColumnSort, TableQueryState, encode_pairs, keys, parse_pairs};

/// How the next URL should be entered into history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    Push,
    Replace,
}

/// Target produced by a synchronizer setter.
///
/// Navigations are shallow and never scroll; the consumer follows `href`
/// either as a link or as a redirect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub href: String,
    pub mode: NavigationMode,
    pub scroll: bool,
}

/// Reads table state from a request URL and writes it back as new URLs.
///
/// Query pairs unrelated to the table are carried through untouched and keep
/// their order. Setters rewrite only the keys of the field they change and
/// never reset `pageIndex` on their own; callers that change sort, search or
/// filter are expected to chain [`TableQueryState::reset_page`].
#[derive(Clone, Debug)]
pub struct QueryParamSync {
    path: String,
    pairs: Vec<(String, String)>,
    state: TableQueryState,
}

impl QueryParamSync {
    pub fn parse(path: impl Into<String>, query: &str) -> Self {
        let pairs = parse_pairs(query);
        let state = TableQueryState::from_pairs(&pairs);
        Self {
            path: path.into(),
            pairs,
            state,
        }
    }

    pub fn from_state(path: impl Into<String>, state: TableQueryState) -> Self {
        Self {
            path: path.into(),
            pairs: state.to_pairs(),
            state,
        }
    }

    /// Replaces the decoded state, e.g. after restricting it to known columns.
    /// The raw pairs are left as they are; the next setter rewrites them.
    pub fn with_state(mut self, state: TableQueryState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &TableQueryState {
        &self.state
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string of the current URL, without the leading `?`.
    pub fn query(&self) -> String {
        encode_pairs(&self.pairs)
    }

    pub fn href(&self) -> String {
        build_href(&self.path, &self.pairs)
    }

    pub fn set_page_index(&self, page_index: usize) -> Navigation {
        self.navigate(&TableQueryState {
            page_index,
            ..self.state.clone()
        })
    }

    pub fn set_page_size(&self, page_size: usize) -> Navigation {
        self.navigate(&TableQueryState {
            page_size,
            ..self.state.clone()
        })
    }

    pub fn set_sorting(&self, sorting: Option<ColumnSort>) -> Navigation {
        self.navigate(&TableQueryState {
            sorting,
            ..self.state.clone()
        })
    }

    pub fn set_search(&self, search: &str) -> Navigation {
        self.navigate(&TableQueryState {
            search: search.trim().to_string(),
            ..self.state.clone()
        })
    }

    pub fn set_filter_by(&self, filter_by: Option<&str>) -> Navigation {
        self.navigate(&TableQueryState {
            filter_by: filter_by.map(str::to_string),
            ..self.state.clone()
        })
    }

    /// Builds the URL for `next`, rewriting only the keys whose field differs
    /// from the current state.
    pub fn navigate(&self, next: &TableQueryState) -> Navigation {
        let mut pairs = self.pairs.clone();
        let current = &self.state;

        if next.page_index != current.page_index {
            write_key(&mut pairs, keys::PAGE_INDEX, Some(next.page_index.to_string()));
        }
        if next.page_size != current.page_size {
            write_key(&mut pairs, keys::PAGE_SIZE, Some(next.page_size.to_string()));
        }
        if next.sorting != current.sorting {
            write_key(
                &mut pairs,
                keys::SORT_BY,
                next.sorting.as_ref().map(|sort| sort.column.clone()),
            );
            write_key(
                &mut pairs,
                keys::DIRECTION,
                next.sorting
                    .as_ref()
                    .map(|sort| sort.direction.as_str().to_string()),
            );
        }
        if next.search != current.search {
            write_key(
                &mut pairs,
                keys::SEARCH,
                Some(next.search.clone()).filter(|s| !s.is_empty()),
            );
        }
        if next.filter_by != current.filter_by {
            write_key(&mut pairs, keys::FILTER_BY, next.filter_by.clone());
        }

        Navigation {
            href: build_href(&self.path, &pairs),
            mode: NavigationMode::Push,
            scroll: false,
        }
    }
}

/// Sets `key` to `value` in place, dropping duplicates, or removes it when
/// `value` is `None`.
fn write_key(pairs: &mut Vec<(String, String)>, key: &str, value: Option<String>) {
    match value {
        Some(value) => {
            let mut written = false;
            pairs.retain_mut(|(k, v)| {
                if k != key {
                    return true;
                }
                if written {
                    return false;
                }
                *v = value.clone();
                written = true;
                true
            });
            if !written {
                pairs.push((key.to_string(), value));
            }
        }
        None => pairs.retain(|(k, _)| k != key),
    }
}

fn build_href(path: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", encode_pairs(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortDirection;

    #[test]
    fn href_keeps_path_and_query() {
        let sync = QueryParamSync::parse("/admin/products", "pageIndex=2&tab=draft");
        assert_eq!(sync.href(), "/admin/products?pageIndex=2&tab=draft");
    }

    #[test]
    fn href_without_query_is_bare_path() {
        let sync = QueryParamSync::parse("/admin/products", "");
        assert_eq!(sync.href(), "/admin/products");
    }

    #[test]
    fn setter_touches_only_its_key() {
        let sync = QueryParamSync::parse(
            "/admin/orders",
            "tab=open&pageIndex=2&sortBy=total&direction=desc",
        );

        let nav = sync.set_page_index(5);

        assert_eq!(
            nav.href,
            "/admin/orders?tab=open&pageIndex=5&sortBy=total&direction=desc"
        );
        assert_eq!(nav.mode, NavigationMode::Push);
        assert!(!nav.scroll);
    }

    #[test]
    fn setter_appends_missing_key() {
        let sync = QueryParamSync::parse("/admin/orders", "tab=open");

        let nav = sync.set_search("  jane ");

        assert_eq!(nav.href, "/admin/orders?tab=open&search=jane");
    }

    #[test]
    fn sorting_change_does_not_reset_page() {
        let sync = QueryParamSync::parse("/admin/products", "pageIndex=4");

        let nav = sync.set_sorting(Some(ColumnSort::asc("name")));

        let next = TableQueryState::from_query(nav.href.split_once('?').map_or("", |(_, q)| q));
        assert_eq!(next.page_index, 4);
        assert_eq!(next.sorting, Some(ColumnSort::new("name", SortDirection::Asc)));
    }

    #[test]
    fn clearing_sort_removes_both_keys() {
        let sync = QueryParamSync::parse(
            "/admin/products",
            "sortBy=name&direction=desc&pageIndex=1",
        );

        let nav = sync.set_sorting(None);

        assert_eq!(nav.href, "/admin/products?pageIndex=1");
    }

    #[test]
    fn clearing_filter_and_search_removes_keys() {
        let sync = QueryParamSync::parse("/admin/products", "search=red&filterBy=name");

        let nav = sync.navigate(&TableQueryState::default());

        assert_eq!(nav.href, "/admin/products");
    }

    #[test]
    fn duplicate_keys_collapse_on_write() {
        let sync = QueryParamSync::parse("/p", "pageIndex=1&x=1&pageIndex=9");

        let nav = sync.set_page_index(3);

        assert_eq!(nav.href, "/p?pageIndex=3&x=1");
    }

    #[test]
    fn navigate_with_reset_page_writes_both_fields() {
        let sync = QueryParamSync::parse("/admin/customers", "pageIndex=6&pageSize=20");
        let next = TableQueryState {
            search: "smith".to_string(),
            filter_by: Some("email".to_string()),
            ..sync.state().clone()
        }
        .reset_page();

        let nav = sync.navigate(&next);

        assert_eq!(
            nav.href,
            "/admin/customers?pageIndex=0&pageSize=20&search=smith&filterBy=email"
        );
    }
}

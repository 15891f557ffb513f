//! Translation of table state into backend list parameters.

use serde::Serialize;

use crate::query::{SortDirection, TableQueryState};

/// Canonical list request. Field names are fixed here; the backend's
/// spelling of each key is chosen by a [`ParamMapping`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListParams {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
    pub sort_by: Option<String>,
    pub direction: Option<SortDirection>,
    pub search: Option<String>,
    pub filter_by: Option<String>,
}

impl ListParams {
    pub fn from_state(state: &TableQueryState) -> Self {
        Self {
            page: state.page_index.saturating_add(1),
            limit: state.page_size,
            sort_by: state.sorting.as_ref().map(|sort| sort.column.clone()),
            direction: state.sorting.as_ref().map(|sort| sort.direction),
            search: Some(state.search.clone()).filter(|search| !search.is_empty()),
            filter_by: state.filter_by.clone(),
        }
    }

    /// Query pairs spelled the way `mapping` says.
    pub fn to_query(&self, mapping: &ParamMapping) -> Vec<(&'static str, String)> {
        let mut query = vec![
            (mapping.page, self.page.to_string()),
            (mapping.limit, self.limit.to_string()),
        ];
        if let Some(sort_by) = &self.sort_by {
            query.push((mapping.sort_by, sort_by.clone()));
        }
        if let Some(direction) = self.direction {
            query.push((mapping.direction, direction.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push((mapping.search, search.clone()));
        }
        if let Some(filter_by) = &self.filter_by {
            query.push((mapping.filter_by, filter_by.clone()));
        }
        query
    }
}

/// Backend key names of one list endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamMapping {
    pub page: &'static str,
    pub limit: &'static str,
    pub sort_by: &'static str,
    pub direction: &'static str,
    pub search: &'static str,
    pub filter_by: &'static str,
}

impl ParamMapping {
    pub const STANDARD: Self = Self {
        page: "page",
        limit: "limit",
        sort_by: "sortBy",
        direction: "direction",
        search: "search",
        filter_by: "filterBy",
    };

    /// Endpoints that name the sort direction `sortOrder`.
    pub const SORT_ORDER: Self = Self {
        direction: "sortOrder",
        ..Self::STANDARD
    };
}

impl Default for ParamMapping {
    fn default() -> Self {
        Self::STANDARD
    }
}

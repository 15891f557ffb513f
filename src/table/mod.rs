//! Dual-mode data table.
//!
//! In [`TableMode::Server`] the rows passed to [`Table::render`] already are
//! the requested page and sort window; header and pager links are URLs built
//! by the [`QueryParamSync`] and the page controller re-fetches. In
//! [`TableMode::Client`] the full data set is in memory and the table sorts
//! and slices it itself from its own [`ClientTableState`].
//!
//! Columns and rows are trusted: a sort on a column without
//! `enable_sorting` is silently ignored and no cross-field validation is
//! performed.

use serde_json::Value;

use crate::pagination::{Pager, PaginationMeta};
use crate::query::{ColumnSort, QueryParamSync, TableQueryState, encode_pairs};

pub mod client;
pub mod column;
pub mod sorting;
pub mod view;

pub use client::{ClientTableAction, ClientTableState};
pub use column::{CellFormat, ColumnDef, FilterKind, FilterOption, Header, Row, SelectOption};
pub use view::{PlaceholderKind, TableView};

use sorting::{indicator, toggle_sort};

use view::{
    ActionView, CellView, FilterView, HeaderView, PaginationView, Placeholder, RowView,
};

pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_MESSAGE: &str = "No records found.";

/// Query keys used by client-side table actions.
pub mod action_keys {
    pub const TOGGLE_SORT: &str = "toggleSort";
    pub const PAGE: &str = "page";
    pub const PAGE_SIZE: &str = "pageSize";
}

pub enum TableMode<'a> {
    /// Full data set in memory; `action_path` receives the table's own
    /// sort/page actions.
    Client {
        state: &'a ClientTableState,
        action_path: &'a str,
    },
    /// Rows are the server's page; `meta` is the server's pagination.
    Server {
        sync: &'a QueryParamSync,
        meta: PaginationMeta,
    },
}

/// Per-row link, `{id}` in `path` is replaced by the percent-encoded row id.
#[derive(Clone, Debug)]
pub struct RowAction {
    pub label: String,
    pub path: String,
    pub destructive: bool,
}

impl RowAction {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            destructive: false,
        }
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    fn resolve(&self, id: &str) -> ActionView {
        ActionView {
            label: self.label.clone(),
            href: self.path.replace("{id}", &urlencoding::encode(id)),
            destructive: self.destructive,
        }
    }
}

pub struct Table<'a> {
    columns: &'a [ColumnDef],
    mode: TableMode<'a>,
    loading: bool,
    filter: Option<(&'a [FilterOption], &'a str)>,
    actions: &'a [RowAction],
    empty_message: &'a str,
}

impl<'a> Table<'a> {
    pub fn client(
        columns: &'a [ColumnDef],
        state: &'a ClientTableState,
        action_path: &'a str,
    ) -> Self {
        Self::new(columns, TableMode::Client { state, action_path })
    }

    pub fn server(
        columns: &'a [ColumnDef],
        sync: &'a QueryParamSync,
        meta: PaginationMeta,
    ) -> Self {
        Self::new(columns, TableMode::Server { sync, meta })
    }

    fn new(columns: &'a [ColumnDef], mode: TableMode<'a>) -> Self {
        Self {
            columns,
            mode,
            loading: false,
            filter: None,
            actions: &[],
            empty_message: EMPTY_MESSAGE,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Enables the filter form, submitted to `action`. Only rendered for
    /// server-side tables.
    pub fn filter(mut self, options: &'a [FilterOption], action: &'a str) -> Self {
        self.filter = Some((options, action));
        self
    }

    pub fn actions(mut self, actions: &'a [RowAction]) -> Self {
        self.actions = actions;
        self
    }

    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn render(&self, rows: &[Row]) -> TableView {
        let total_rows = rows.len();
        let visible: Vec<&Row> = match &self.mode {
            TableMode::Client { state, .. } => state.visible_rows(self.columns, rows),
            TableMode::Server { .. } => rows.iter().collect(),
        };

        let has_actions = !self.actions.is_empty();
        let colspan = self.columns.len() + usize::from(has_actions);

        let placeholder = if self.loading {
            Some(Placeholder {
                kind: PlaceholderKind::Loading,
                colspan,
                message: LOADING_MESSAGE.to_string(),
            })
        } else if visible.is_empty() {
            Some(Placeholder {
                kind: PlaceholderKind::Empty,
                colspan,
                message: self.empty_message.to_string(),
            })
        } else {
            None
        };

        let rows = if placeholder.is_some() {
            Vec::new()
        } else {
            visible.into_iter().map(|row| self.row_view(row)).collect()
        };

        TableView {
            headers: self.headers(),
            rows,
            placeholder,
            pagination: self.pagination(total_rows),
            filter: self.filter_view(),
            has_actions,
        }
    }

    fn current_sort(&self) -> Option<&ColumnSort> {
        match &self.mode {
            TableMode::Client { state, .. } => state.sorting.as_ref(),
            TableMode::Server { sync, .. } => sync.state().sorting.as_ref(),
        }
    }

    fn headers(&self) -> Vec<HeaderView> {
        let current = self.current_sort();
        self.columns
            .iter()
            .map(|column| {
                let href = column.enable_sorting.then(|| match &self.mode {
                    TableMode::Client { action_path, .. } => action_href(
                        action_path,
                        action_keys::TOGGLE_SORT,
                        &column.id,
                    ),
                    TableMode::Server { sync, .. } => {
                        let next = TableQueryState {
                            sorting: toggle_sort(self.columns, current, &column.id),
                            ..sync.state().clone()
                        }
                        .reset_page();
                        sync.navigate(&next).href
                    }
                });

                HeaderView {
                    id: column.id.clone(),
                    label: column.header_text(),
                    sortable: column.enable_sorting,
                    indicator: indicator(current, &column.id),
                    href,
                }
            })
            .collect()
    }

    fn row_view(&self, row: &Row) -> RowView {
        let id = row_id(row);
        let cells = self
            .columns
            .iter()
            .map(|column| CellView {
                text: column.render_cell(row),
                format: column.format,
            })
            .collect();
        let actions = match &id {
            Some(id) => self.actions.iter().map(|action| action.resolve(id)).collect(),
            None => Vec::new(),
        };

        RowView { id, cells, actions }
    }

    fn pagination(&self, total_rows: usize) -> PaginationView {
        match &self.mode {
            TableMode::Client { state, action_path } => {
                let pager = Pager::new(&state.meta(total_rows));
                PaginationView::new(&pager, |index| {
                    action_href(action_path, action_keys::PAGE, &index.to_string())
                })
            }
            TableMode::Server { sync, meta } => {
                let pager = Pager::new(meta);
                PaginationView::new(&pager, |index| sync.set_page_index(index).href)
            }
        }
    }

    fn filter_view(&self) -> Option<FilterView> {
        let (options, action) = self.filter?;
        let TableMode::Server { sync, .. } = &self.mode else {
            return None;
        };
        let state = sync.state();

        Some(FilterView {
            action: action.to_string(),
            options: options.to_vec(),
            selected: state
                .filter_by
                .clone()
                .or_else(|| options.first().map(|option| option.field.clone())),
            value: state.search.clone(),
            query: sync.query(),
        })
    }
}

/// Identifier of a backend record, read from `id` or `_id`.
pub fn row_id(row: &Row) -> Option<String> {
    match row.get("id").or_else(|| row.get("_id"))? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn action_href(path: &str, key: &str, value: &str) -> String {
    format!(
        "{path}?{}",
        encode_pairs(&[(key.to_string(), value.to_string())])
    )
}

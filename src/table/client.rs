//! In-memory pagination and sorting for fully loaded data sets.

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationMeta;
use crate::query::{ColumnSort, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SortDirection};
use crate::table::column::{ColumnDef, Row};
use crate::table::sorting::{compare_values, toggle_sort};

/// Pagination and sort state owned by a client-side table.
///
/// This state belongs to the table itself and is never written to the URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTableState {
    pub page_index: usize,
    pub page_size: usize,
    pub sorting: Option<ColumnSort>,
}

impl Default for ClientTableState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sorting: None,
        }
    }
}

/// A user interaction with a client-side table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientTableAction {
    ToggleSort(String),
    SetPage(usize),
    SetPageSize(usize),
}

impl ClientTableState {
    /// Applies an action. Sorting and page size changes return to the first
    /// page.
    pub fn apply_action(&mut self, columns: &[ColumnDef], action: ClientTableAction) {
        match action {
            ClientTableAction::ToggleSort(column) => {
                let next = toggle_sort(columns, self.sorting.as_ref(), &column);
                if next != self.sorting {
                    self.sorting = next;
                    self.page_index = 0;
                }
            }
            ClientTableAction::SetPage(page_index) => self.page_index = page_index,
            ClientTableAction::SetPageSize(page_size) => {
                if (1..=MAX_PAGE_SIZE).contains(&page_size) {
                    self.page_size = page_size;
                    self.page_index = 0;
                }
            }
        }
    }

    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size.max(1))
    }

    /// Page index clamped to the available pages.
    pub fn effective_page_index(&self, total_rows: usize) -> usize {
        self.page_index
            .min(self.page_count(total_rows).saturating_sub(1))
    }

    pub fn meta(&self, total_rows: usize) -> PaginationMeta {
        PaginationMeta::for_rows(total_rows, self.page_size.max(1), self.page_index)
    }

    /// Sorts (stably) and slices `rows` down to the current page.
    pub fn visible_rows<'a>(&self, columns: &[ColumnDef], rows: &'a [Row]) -> Vec<&'a Row> {
        let mut ordered: Vec<&Row> = rows.iter().collect();

        let sort_column = self.sorting.as_ref().and_then(|sort| {
            columns
                .iter()
                .find(|def| def.id == sort.column && def.enable_sorting)
                .map(|def| (def, sort.direction))
        });

        if let Some((column, direction)) = sort_column {
            ordered.sort_by(|a, b| {
                let ordering = compare_values(column.value(a), column.value(b));
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let page_size = self.page_size.max(1);
        let start = self.effective_page_index(rows.len()) * page_size;
        ordered.into_iter().skip(start).take(page_size).collect()
    }
}

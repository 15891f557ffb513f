//! List slice: state of one listing plus the action/reducer contract.

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationMeta;
use crate::store::params::ListParams;
use crate::table::Row;

/// Body of a backend list response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default)]
    pub pagination: PaginationMeta,
}

/// Sequence number of a fetch issued by a [`ListSlice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListAction {
    FetchStarted {
        ticket: RequestTicket,
        params: ListParams,
    },
    FetchSucceeded {
        ticket: RequestTicket,
        page: ListPage,
    },
    FetchFailed {
        ticket: RequestTicket,
        error: String,
    },
}

impl ListAction {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            ListAction::FetchStarted { ticket, .. }
            | ListAction::FetchSucceeded { ticket, .. }
            | ListAction::FetchFailed { ticket, .. } => *ticket,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ListState {
    pub items: Vec<Row>,
    pub pagination: PaginationMeta,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Parameters of the request that produced (or is producing) this state.
    pub params: Option<ListParams>,
}

/// Applies `action` to `state`. Pagination is only ever replaced by a new
/// response, never adjusted locally.
pub fn reduce(state: &mut ListState, action: ListAction) {
    match action {
        ListAction::FetchStarted { params, .. } => {
            state.is_loading = true;
            state.error = None;
            state.params = Some(params);
        }
        ListAction::FetchSucceeded { page, .. } => {
            state.items = page.data;
            state.pagination = page.pagination;
            state.is_loading = false;
            state.error = None;
        }
        ListAction::FetchFailed { error, .. } => {
            state.is_loading = false;
            state.error = Some(error);
        }
    }
}

/// One listing's state guarded by request sequence numbers.
///
/// Every fetch takes a ticket from [`ListSlice::begin`]; only actions
/// carrying the most recently issued ticket are applied, so a slow response
/// can never overwrite the result of a later request.
#[derive(Debug, Default)]
pub struct ListSlice {
    state: ListState,
    latest: u64,
    prefetched: bool,
}

impl ListSlice {
    pub fn begin(&mut self, params: ListParams) -> RequestTicket {
        self.latest += 1;
        self.prefetched = false;
        let ticket = RequestTicket(self.latest);
        reduce(
            &mut self.state,
            ListAction::FetchStarted { ticket, params },
        );
        ticket
    }

    /// Applies `action` if it belongs to the latest request. Returns whether
    /// it was applied.
    pub fn dispatch(&mut self, action: ListAction) -> bool {
        let ticket = action.ticket();
        if ticket.0 != self.latest {
            log::debug!(
                "Discarding stale list action #{} (latest #{})",
                ticket.0,
                self.latest
            );
            return false;
        }
        reduce(&mut self.state, action);
        true
    }

    /// Dispatches the outcome of the fetch identified by `ticket`.
    pub fn settle(&mut self, ticket: RequestTicket, result: Result<ListPage, String>) -> bool {
        let action = match result {
            Ok(page) => ListAction::FetchSucceeded { ticket, page },
            Err(error) => ListAction::FetchFailed { ticket, error },
        };
        self.dispatch(action)
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Marks the current state as a fresh fetch the next render may use
    /// without fetching again.
    pub fn mark_prefetched(&mut self) {
        self.prefetched = !self.state.is_loading && self.state.error.is_none();
    }

    /// Hands out the prefetched state once, if it was fetched for `params`.
    pub fn take_prefetched(&mut self, params: &ListParams) -> Option<ListState> {
        let prefetched = std::mem::take(&mut self.prefetched);
        (prefetched && self.state.params.as_ref() == Some(params)).then(|| self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::TableQueryState;

    fn params(page_index: usize) -> ListParams {
        ListParams::from_state(&TableQueryState {
            page_index,
            ..TableQueryState::default()
        })
    }

    fn page(name: &str, current_page: usize) -> ListPage {
        let row = match json!({"id": 1, "name": name}) {
            serde_json::Value::Object(map) => map,
            _ => Row::new(),
        };
        ListPage {
            data: vec![row],
            pagination: PaginationMeta {
                total_items: 30,
                total_pages: 3,
                current_page,
            },
        }
    }

    #[test]
    fn begin_marks_loading_and_records_params() {
        let mut slice = ListSlice::default();

        slice.begin(params(1));

        assert!(slice.state().is_loading);
        assert_eq!(slice.state().params, Some(params(1)));
    }

    #[test]
    fn success_replaces_items_and_pagination() {
        let mut slice = ListSlice::default();
        let ticket = slice.begin(params(0));

        assert!(slice.settle(ticket, Ok(page("first", 1))));

        let state = slice.state();
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.error, None);
    }

    #[test]
    fn failure_keeps_previous_items_and_records_error() {
        let mut slice = ListSlice::default();
        let first = slice.begin(params(0));
        slice.settle(first, Ok(page("first", 1)));

        let second = slice.begin(params(1));
        slice.settle(second, Err("backend unavailable".to_string()));

        let state = slice.state();
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.error.as_deref(), Some("backend unavailable"));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut slice = ListSlice::default();
        let slow = slice.begin(params(1));
        let fast = slice.begin(params(2));

        assert!(slice.settle(fast, Ok(page("page three", 3))));
        assert!(!slice.settle(slow, Ok(page("page two", 2))));

        let state = slice.state();
        assert_eq!(state.pagination.current_page, 3);
        assert_eq!(state.items[0].get("name"), Some(&json!("page three")));
        assert_eq!(state.params, Some(params(2)));
    }

    #[test]
    fn stale_failure_does_not_clear_loading() {
        let mut slice = ListSlice::default();
        let slow = slice.begin(params(1));
        let fast = slice.begin(params(2));

        assert!(!slice.settle(slow, Err("timeout".to_string())));

        assert!(slice.state().is_loading);
        assert_eq!(slice.state().error, None);
        assert!(slice.is_latest(fast));
    }

    #[test]
    fn prefetched_state_is_handed_out_once() {
        let mut slice = ListSlice::default();
        let ticket = slice.begin(params(0));
        slice.settle(ticket, Ok(page("first", 1)));
        slice.mark_prefetched();

        assert!(slice.take_prefetched(&params(0)).is_some());
        assert!(slice.take_prefetched(&params(0)).is_none());
    }

    #[test]
    fn prefetched_state_requires_matching_params() {
        let mut slice = ListSlice::default();
        let ticket = slice.begin(params(0));
        slice.settle(ticket, Ok(page("first", 1)));
        slice.mark_prefetched();

        assert!(slice.take_prefetched(&params(3)).is_none());
    }

    #[test]
    fn failed_fetch_is_never_prefetched() {
        let mut slice = ListSlice::default();
        let ticket = slice.begin(params(0));
        slice.settle(ticket, Err("boom".to_string()));
        slice.mark_prefetched();

        assert!(slice.take_prefetched(&params(0)).is_none());
    }

    #[test]
    fn list_page_tolerates_missing_fields() {
        let page: ListPage = serde_json::from_str(r#"{"data": []}"#).expect("partial page");
        assert_eq!(page.pagination, PaginationMeta::default());
    }
}

//! Server-side listings: one parametrized fetch cycle for every resource.

use crate::api::AdminApi;
use crate::domain::resource::ResourceKind;
use crate::domain::types::RecordId;
use crate::forms::admin::{DeleteDecision, SearchPayload};
use crate::query::{QueryParamSync, TableQueryState};
use crate::services::{ServiceError, ServiceResult};
use crate::store::{ListParams, ListState, StoreId, StoreRegistry};
use crate::table::ColumnDef;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Path of the listing page of `resource`.
pub fn resource_path(resource: ResourceKind) -> String {
    format!("/admin/{}", resource.slug())
}

/// Table state of `query`, dropping sort columns and filter fields the
/// resource does not offer.
pub fn query_state(resource: ResourceKind, query: &str) -> TableQueryState {
    let columns = resource.columns();
    let filters = resource.filter_options();
    TableQueryState::from_query(query).restrict(
        columns
            .iter()
            .filter(|column| column.enable_sorting)
            .map(|column| column.id.as_str()),
        filters.iter().map(|option| option.field.as_str()),
    )
}

/// Loads the page described by `state` into the session's slice and returns
/// the slice state to render.
///
/// A state prefetched by a preceding mutation for the same parameters is
/// used as is. When a later request for the same slice was started while
/// this one was in flight, the late response is dropped and the newer
/// (possibly still loading) state is returned.
pub async fn load_list_page<A>(
    api: &A,
    registry: &StoreRegistry,
    store_id: StoreId,
    resource: ResourceKind,
    state: &TableQueryState,
) -> ListState
where
    A: AdminApi + ?Sized,
{
    let params = ListParams::from_state(state);
    let prefetched = registry.with_store(store_id, |store| {
        store.list_mut(resource).take_prefetched(&params)
    });
    if let Some(state) = prefetched {
        log::debug!("Using prefetched {resource} page {}", params.page);
        return state;
    }

    fetch_into_store(api, registry, store_id, resource, params).await
}

async fn fetch_into_store<A>(
    api: &A,
    registry: &StoreRegistry,
    store_id: StoreId,
    resource: ResourceKind,
    params: ListParams,
) -> ListState
where
    A: AdminApi + ?Sized,
{
    let query = params.to_query(&resource.param_mapping());
    let ticket = registry.with_store(store_id, |store| store.list_mut(resource).begin(params));

    let result = api
        .list(resource.endpoint(), &query)
        .await
        .map_err(|err| {
            log::error!("Failed to list {resource}: {err}");
            err.user_message()
        });

    registry.with_store(store_id, |store| {
        let slice = store.list_mut(resource);
        slice.settle(ticket, result);
        slice.state().clone()
    })
}

/// Resolves the target of a delete route. Unknown slugs, malformed ids and
/// resources that cannot be deleted are all [`ServiceError::NotFound`].
pub fn delete_target(slug: &str, id: &str) -> ServiceResult<(ResourceKind, RecordId)> {
    let resource = slug.parse::<ResourceKind>()?;
    if !resource.deletable() {
        return Err(ServiceError::NotFound);
    }
    Ok((resource, RecordId::new(id)?))
}

/// Applies the confirmation dialog's decision.
///
/// A confirmed delete issues exactly one delete call and, when it succeeds,
/// exactly one re-fetch of the listing page the user returns to. That page
/// is handed to the next [`load_list_page`] for the same parameters instead
/// of being fetched again. A cancelled dialog issues no call.
pub async fn resolve_delete<A>(
    api: &A,
    registry: &StoreRegistry,
    store_id: StoreId,
    resource: ResourceKind,
    id: &RecordId,
    decision: DeleteDecision,
    return_state: &TableQueryState,
) -> ServiceResult<DeleteOutcome>
where
    A: AdminApi + ?Sized,
{
    if decision == DeleteDecision::Cancel {
        return Ok(DeleteOutcome::Cancelled);
    }
    if !resource.deletable() {
        return Err(ServiceError::NotFound);
    }

    api.delete(resource.endpoint(), id).await.map_err(|err| {
        log::error!("Failed to delete {} {id}: {err}", resource.record_label());
        err
    })?;
    log::info!("Deleted {} {id}", resource.record_label());

    fetch_into_store(
        api,
        registry,
        store_id,
        resource,
        ListParams::from_state(return_state),
    )
    .await;
    registry.with_store(store_id, |store| store.list_mut(resource).mark_prefetched());

    Ok(DeleteOutcome::Deleted)
}

/// Target of a filter form submission: search and field replaced, first
/// page, every other key of the submitting page kept.
pub fn search_href(resource: ResourceKind, payload: SearchPayload) -> String {
    let sync = QueryParamSync::parse(resource_path(resource), &payload.query);
    let next = TableQueryState {
        search: payload.search,
        filter_by: payload.filter_by,
        ..sync.state().clone()
    }
    .reset_page();
    sync.navigate(&next).href
}

/// Current page of the listing as CSV, cells formatted as on screen.
pub async fn export_csv<A>(
    api: &A,
    resource: ResourceKind,
    state: &TableQueryState,
) -> ServiceResult<Vec<u8>>
where
    A: AdminApi + ?Sized,
{
    let params = ListParams::from_state(state);
    let page = api
        .list(resource.endpoint(), &params.to_query(&resource.param_mapping()))
        .await
        .map_err(|err| {
            log::error!("Failed to export {resource}: {err}");
            err
        })?;

    let columns = resource.columns();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(ColumnDef::header_text))
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    for row in &page.data {
        writer
            .write_record(columns.iter().map(|column| column.render_cell(row)))
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| ServiceError::Internal(err.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::{ApiResult, AdminApi};
    use crate::query::ColumnSort;
    use crate::services::fakes::{FakeAdminApi, row, rows};
    use crate::store::ListPage;
    use crate::table::Row;
    use uuid::Uuid;

    fn state(query: &str) -> TableQueryState {
        query_state(ResourceKind::Products, query)
    }

    #[actix_web::test]
    async fn load_maps_state_to_backend_params() {
        let api = FakeAdminApi::with_records(rows(42));
        let registry = StoreRegistry::default();
        let state = query_state(ResourceKind::Orders, "pageIndex=1&sortBy=total&direction=desc");

        let loaded =
            load_list_page(&api, &registry, Uuid::new_v4(), ResourceKind::Orders, &state).await;

        assert_eq!(api.list_calls.get(), 1);
        let query = api.last_query.borrow().clone();
        assert!(query.contains(&("page", "2".to_string())));
        assert!(query.contains(&("limit", "10".to_string())));
        assert!(query.contains(&("sortOrder", "desc".to_string())));
        assert_eq!(loaded.items.len(), 10);
        assert_eq!(loaded.pagination.current_page, 2);
        assert!(!loaded.is_loading);
    }

    #[test]
    fn delete_target_rejects_unknown_and_undeletable() {
        assert!(matches!(
            delete_target("widgets", "1"),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            delete_target("orders", "1"),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            delete_target("products", "a b"),
            Err(ServiceError::NotFound)
        ));
        let (resource, id) = delete_target("coupons", "SUMMER-10").unwrap();
        assert_eq!(resource, ResourceKind::Coupons);
        assert_eq!(id.as_str(), "SUMMER-10");
    }

    #[test]
    fn unknown_sort_column_is_not_sent() {
        let unknown = state("sortBy=password&direction=asc&filterBy=secret");
        assert_eq!(unknown.sorting, None);
        assert_eq!(unknown.filter_by, None);

        let known = state("sortBy=price&direction=asc&filterBy=sku");
        assert_eq!(known.sorting, Some(ColumnSort::asc("price")));
        assert_eq!(known.filter_by.as_deref(), Some("sku"));
    }

    #[actix_web::test]
    async fn failed_load_records_error_message() {
        let api = FakeAdminApi {
            fail_list: true,
            ..FakeAdminApi::default()
        };
        let registry = StoreRegistry::default();

        let loaded = load_list_page(
            &api,
            &registry,
            Uuid::new_v4(),
            ResourceKind::Products,
            &state(""),
        )
        .await;

        assert!(!loaded.is_loading);
        assert_eq!(loaded.error.as_deref(), Some("list failed"));
    }

    #[actix_web::test]
    async fn confirmed_delete_fetches_once_for_next_render() {
        let api = FakeAdminApi::with_records(rows(15));
        let registry = StoreRegistry::default();
        let store_id = Uuid::new_v4();
        let id = RecordId::new("3").unwrap();
        let return_state = state("pageIndex=0");

        let outcome = resolve_delete(
            &api,
            &registry,
            store_id,
            ResourceKind::Products,
            &id,
            DeleteDecision::Confirm,
            &return_state,
        )
        .await
        .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(api.delete_calls.get(), 1);
        assert_eq!(api.list_calls.get(), 1);

        let rendered =
            load_list_page(&api, &registry, store_id, ResourceKind::Products, &return_state).await;

        assert_eq!(api.list_calls.get(), 1, "redirect target reuses the re-fetch");
        assert_eq!(rendered.pagination.total_items, 14);
        assert!(
            rendered
                .items
                .iter()
                .all(|item| item.get("id") != Some(&json!(3)))
        );

        load_list_page(&api, &registry, store_id, ResourceKind::Products, &return_state).await;
        assert_eq!(api.list_calls.get(), 2, "prefetched page is used only once");
    }

    #[actix_web::test]
    async fn cancelled_delete_issues_no_calls() {
        let api = FakeAdminApi::with_records(rows(5));
        let registry = StoreRegistry::default();

        let outcome = resolve_delete(
            &api,
            &registry,
            Uuid::new_v4(),
            ResourceKind::Products,
            &RecordId::new("1").unwrap(),
            DeleteDecision::Cancel,
            &state(""),
        )
        .await
        .unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(api.delete_calls.get(), 0);
        assert_eq!(api.list_calls.get(), 0);
    }

    #[actix_web::test]
    async fn failed_delete_skips_refetch() {
        let api = FakeAdminApi {
            fail_delete: true,
            ..FakeAdminApi::with_records(rows(5))
        };
        let registry = StoreRegistry::default();

        let result = resolve_delete(
            &api,
            &registry,
            Uuid::new_v4(),
            ResourceKind::Coupons,
            &RecordId::new("1").unwrap(),
            DeleteDecision::Confirm,
            &state(""),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Api(_))));
        assert_eq!(api.delete_calls.get(), 1);
        assert_eq!(api.list_calls.get(), 0);
    }

    #[actix_web::test]
    async fn orders_cannot_be_deleted() {
        let api = FakeAdminApi::with_records(rows(5));
        let registry = StoreRegistry::default();

        let result = resolve_delete(
            &api,
            &registry,
            Uuid::new_v4(),
            ResourceKind::Orders,
            &RecordId::new("1").unwrap(),
            DeleteDecision::Confirm,
            &TableQueryState::default(),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert_eq!(api.delete_calls.get(), 0);
    }

    /// Starts a newer request for the same slice while a list call is in
    /// flight, as a second browser tab would.
    struct OvertakenApi<'a> {
        inner: FakeAdminApi,
        registry: &'a StoreRegistry,
        store_id: StoreId,
    }

    impl AdminApi for OvertakenApi<'_> {
        async fn list(
            &self,
            endpoint: &str,
            query: &[(&'static str, String)],
        ) -> ApiResult<ListPage> {
            self.registry.with_store(self.store_id, |store| {
                store
                    .list_mut(ResourceKind::Products)
                    .begin(ListParams::from_state(&TableQueryState::default().reset_page()))
            });
            self.inner.list(endpoint, query).await
        }

        async fn list_all(&self, endpoint: &str) -> ApiResult<Vec<Row>> {
            self.inner.list_all(endpoint).await
        }

        async fn delete(&self, endpoint: &str, id: &RecordId) -> ApiResult<()> {
            self.inner.delete(endpoint, id).await
        }
    }

    #[actix_web::test]
    async fn overtaken_response_is_discarded() {
        let registry = StoreRegistry::default();
        let store_id = Uuid::new_v4();
        let api = OvertakenApi {
            inner: FakeAdminApi::with_records(rows(30)),
            registry: &registry,
            store_id,
        };

        let loaded = load_list_page(
            &api,
            &registry,
            store_id,
            ResourceKind::Products,
            &state("pageIndex=2"),
        )
        .await;

        assert!(loaded.is_loading, "newer request still pending");
        assert!(loaded.items.is_empty());
        assert_eq!(loaded.params.map(|params| params.page), Some(1));
    }

    #[test]
    fn search_resets_page_and_keeps_other_keys() {
        let payload = SearchPayload {
            search: "lamp".to_string(),
            filter_by: Some("name".to_string()),
            query: "pageIndex=4&pageSize=25&sortBy=price&direction=asc&ref=nav".to_string(),
        };

        let href = search_href(ResourceKind::Products, payload);
        let next = state(href.split_once('?').map_or("", |(_, query)| query));

        assert!(href.starts_with("/admin/products?"));
        assert!(href.contains("ref=nav"));
        assert_eq!(next.page_index, 0);
        assert_eq!(next.page_size, 25);
        assert_eq!(next.search, "lamp");
        assert_eq!(next.filter_by.as_deref(), Some("name"));
        assert_eq!(next.sorting, Some(ColumnSort::asc("price")));
    }

    #[actix_web::test]
    async fn export_writes_headers_and_formatted_cells() {
        let api = FakeAdminApi::with_records(vec![row(json!({
            "id": 1,
            "name": "Lamp, brass",
            "price": 12.5,
            "isActive": true
        }))]);

        let bytes = export_csv(&api, ResourceKind::Products, &state(""))
            .await
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("Name,SKU,Category,Price,Stock,Active,Created")
        );
        assert_eq!(lines.next(), Some("\"Lamp, brass\",,,12.50,,Yes,"));
    }
}

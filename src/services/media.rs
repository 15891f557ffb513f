//! Media library: the whole collection rendered by a client-side table.

use crate::api::AdminApi;
use crate::domain::resource::media;
use crate::services::ServiceResult;
use crate::store::{StoreId, StoreRegistry};
use crate::table::{ClientTableAction, ClientTableState, Row};

/// Data required to render the media library page.
pub struct MediaPageData {
    pub rows: Vec<Row>,
    pub table: ClientTableState,
}

/// Fetches every media record together with the table's own sort and page
/// state from the session store.
pub async fn load_media_page<A>(
    api: &A,
    registry: &StoreRegistry,
    store_id: StoreId,
) -> ServiceResult<MediaPageData>
where
    A: AdminApi + ?Sized,
{
    let rows = api.list_all(media::ENDPOINT).await.map_err(|err| {
        log::error!("Failed to list media: {err}");
        err
    })?;
    let table = registry.with_store(store_id, |store| store.table_state(media::TABLE_ID));

    Ok(MediaPageData { rows, table })
}

/// Applies a sort or page action to the media table. Never touches the
/// backend.
pub fn apply_media_action(
    registry: &StoreRegistry,
    store_id: StoreId,
    action: ClientTableAction,
) -> ClientTableState {
    let columns = media::columns();
    registry.with_store(store_id, |store| {
        let table = store.table_state_mut(media::TABLE_ID);
        table.apply_action(&columns, action);
        table.clone()
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::query::ColumnSort;
    use crate::services::fakes::{FakeAdminApi, rows};

    #[actix_web::test]
    async fn load_returns_all_rows_and_session_table_state() {
        let api = FakeAdminApi::with_records(rows(35));
        let registry = StoreRegistry::default();
        let store_id = Uuid::new_v4();
        apply_media_action(&registry, store_id, ClientTableAction::SetPage(2));

        let data = load_media_page(&api, &registry, store_id).await.unwrap();

        assert_eq!(data.rows.len(), 35);
        assert_eq!(data.table.page_index, 2);
        assert_eq!(api.list_all_calls.get(), 1);
    }

    #[actix_web::test]
    async fn load_failure_is_reported() {
        let api = FakeAdminApi {
            fail_list: true,
            ..FakeAdminApi::default()
        };

        let result = load_media_page(&api, &StoreRegistry::default(), Uuid::new_v4()).await;

        assert!(result.is_err());
    }

    #[test]
    fn sort_action_cycles_and_resets_page() {
        let registry = StoreRegistry::default();
        let store_id = Uuid::new_v4();
        apply_media_action(&registry, store_id, ClientTableAction::SetPage(3));

        let sorted = apply_media_action(
            &registry,
            store_id,
            ClientTableAction::ToggleSort("fileName".to_string()),
        );
        assert_eq!(sorted.sorting, Some(ColumnSort::asc("fileName")));
        assert_eq!(sorted.page_index, 0);

        let desc = apply_media_action(
            &registry,
            store_id,
            ClientTableAction::ToggleSort("fileName".to_string()),
        );
        assert_eq!(desc.sorting, Some(ColumnSort::desc("fileName")));
    }

    #[test]
    fn unknown_column_sort_is_ignored() {
        let registry = StoreRegistry::default();
        let store_id = Uuid::new_v4();
        apply_media_action(&registry, store_id, ClientTableAction::SetPage(1));

        let state = apply_media_action(
            &registry,
            store_id,
            ClientTableAction::ToggleSort("path".to_string()),
        );

        assert_eq!(state.sorting, None);
        assert_eq!(state.page_index, 1);
    }
}

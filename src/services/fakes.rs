//! In-memory backend fakes counting the calls services make.

use std::cell::{Cell, RefCell};

use serde_json::{Value, json};

use crate::api::{AdminApi, ApiError, ApiResult, PaymentApi};
use crate::domain::payment::{CreatedOrder, OrderRequest, PaymentConfirmation};
use crate::domain::types::{IdempotencyKey, RecordId};
use crate::pagination::PaginationMeta;
use crate::store::ListPage;
use crate::table::{Row, row_id};

pub(crate) fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

pub(crate) fn rows(count: usize) -> Vec<Row> {
    (1..=count)
        .map(|id| row(json!({"id": id, "name": format!("Item {id}")})))
        .collect()
}

#[derive(Default)]
pub(crate) struct FakeAdminApi {
    pub records: RefCell<Vec<Row>>,
    pub list_calls: Cell<usize>,
    pub list_all_calls: Cell<usize>,
    pub delete_calls: Cell<usize>,
    pub last_query: RefCell<Vec<(&'static str, String)>>,
    pub fail_list: bool,
    pub fail_delete: bool,
}

impl FakeAdminApi {
    pub fn with_records(records: Vec<Row>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    fn param(query: &[(&'static str, String)], key: &str) -> Option<usize> {
        query
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, value)| value.parse().ok())
    }
}

impl AdminApi for FakeAdminApi {
    async fn list(&self, _endpoint: &str, query: &[(&'static str, String)]) -> ApiResult<ListPage> {
        self.list_calls.set(self.list_calls.get() + 1);
        *self.last_query.borrow_mut() = query.to_vec();
        if self.fail_list {
            return Err(ApiError::Status {
                status: 500,
                message: "list failed".to_string(),
            });
        }

        let page = Self::param(query, "page").unwrap_or(1).max(1);
        let limit = Self::param(query, "limit").unwrap_or(10).max(1);
        let records = self.records.borrow();
        let data = records
            .iter()
            .skip((page - 1) * limit)
            .take(limit)
            .cloned()
            .collect();

        Ok(ListPage {
            data,
            pagination: PaginationMeta::for_rows(records.len(), limit, page - 1),
        })
    }

    async fn list_all(&self, _endpoint: &str) -> ApiResult<Vec<Row>> {
        self.list_all_calls.set(self.list_all_calls.get() + 1);
        if self.fail_list {
            return Err(ApiError::NotFound);
        }
        Ok(self.records.borrow().clone())
    }

    async fn delete(&self, _endpoint: &str, id: &RecordId) -> ApiResult<()> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        if self.fail_delete {
            return Err(ApiError::Status {
                status: 409,
                message: "record is in use".to_string(),
            });
        }
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|record| row_id(record).as_deref() != Some(id.as_str()));
        if records.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakePaymentApi {
    pub confirm_calls: Cell<usize>,
    pub create_calls: Cell<usize>,
    pub keys: RefCell<Vec<IdempotencyKey>>,
    pub fail_confirm: bool,
}

impl PaymentApi for FakePaymentApi {
    async fn confirm_payment(
        &self,
        key: &IdempotencyKey,
        _confirmation: &PaymentConfirmation,
    ) -> ApiResult<()> {
        self.confirm_calls.set(self.confirm_calls.get() + 1);
        self.keys.borrow_mut().push(*key);
        if self.fail_confirm {
            return Err(ApiError::Status {
                status: 402,
                message: "Payment could not be verified.".to_string(),
            });
        }
        Ok(())
    }

    async fn create_order(
        &self,
        key: &IdempotencyKey,
        _request: &OrderRequest<'_>,
    ) -> ApiResult<CreatedOrder> {
        self.create_calls.set(self.create_calls.get() + 1);
        self.keys.borrow_mut().push(*key);
        Ok(CreatedOrder {
            id: "order-1".to_string(),
            order_number: Some("1001".to_string()),
        })
    }
}

//! `reqwest` client for the storefront REST backend.
//!
//! Auth: `Authorization: Bearer <token>` when the browser carried a token.
//! Payment calls additionally send `Idempotency-Key`.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::{AdminApi, ApiError, ApiResult, PaymentApi};
use crate::domain::payment::{CreatedOrder, OrderRequest, PaymentConfirmation, PaymentProvider};
use crate::domain::types::{IdempotencyKey, RecordId};
use crate::store::ListPage;
use crate::table::Row;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Longest slice of an undecodable body kept in the error.
const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Collections are returned either paginated or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Collection {
    Rows(Vec<Row>),
    Page(ListPage),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

#[derive(Default, Deserialize)]
struct Acknowledgement {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    verified: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RestClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Copy of this client sending `token` as bearer credentials.
    pub fn authorized(&self, token: Option<String>) -> Self {
        Self {
            token,
            ..self.clone()
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl AdminApi for RestClient {
    async fn list(&self, endpoint: &str, query: &[(&'static str, String)]) -> ApiResult<ListPage> {
        let resp = self.request(Method::GET, endpoint).query(query).send().await?;
        handle_response(resp).await
    }

    async fn list_all(&self, endpoint: &str) -> ApiResult<Vec<Row>> {
        let resp = self.request(Method::GET, endpoint).send().await?;
        match handle_response::<Collection>(resp).await? {
            Collection::Rows(rows) => Ok(rows),
            Collection::Page(page) => Ok(page.data),
        }
    }

    async fn delete(&self, endpoint: &str, id: &RecordId) -> ApiResult<()> {
        let path = format!("{}/{}", endpoint.trim_end_matches('/'), id);
        let resp = self.request(Method::DELETE, &path).send().await?;
        handle_empty(resp).await
    }
}

impl PaymentApi for RestClient {
    async fn confirm_payment(
        &self,
        key: &IdempotencyKey,
        confirmation: &PaymentConfirmation,
    ) -> ApiResult<()> {
        let path = match confirmation.provider() {
            PaymentProvider::Paypal => "payments/paypal/capture",
            PaymentProvider::Razorpay => "payments/razorpay/verify",
        };
        let resp = self
            .request(Method::POST, path)
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string())
            .json(confirmation)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        let ack = if body.trim().is_empty() {
            Acknowledgement::default()
        } else {
            serde_json::from_str::<Envelope<Acknowledgement>>(&body)
                .map(Envelope::into_inner)
                .map_err(|e| decode_error(&e, &body))?
        };
        if ack.success == Some(false) || ack.verified == Some(false) {
            return Err(ApiError::Status {
                status: StatusCode::PAYMENT_REQUIRED.as_u16(),
                message: ack
                    .message
                    .unwrap_or_else(|| "Payment could not be verified.".to_string()),
            });
        }
        Ok(())
    }

    async fn create_order(
        &self,
        key: &IdempotencyKey,
        request: &OrderRequest<'_>,
    ) -> ApiResult<CreatedOrder> {
        let resp = self
            .request(Method::POST, "orders")
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string())
            .json(request)
            .send()
            .await?;
        handle_response::<Envelope<CreatedOrder>>(resp)
            .await
            .map(Envelope::into_inner)
    }
}

async fn handle_response<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| decode_error(&e, &body))
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn handle_empty(resp: Response) -> ApiResult<()> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: StatusCode, resp: Response) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound;
    }
    let raw = resp.text().await.unwrap_or_default();
    ApiError::Status {
        status: status.as_u16(),
        message: error_message(status, &raw),
    }
}

fn error_message(status: StatusCode, raw: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(raw) {
        if let Some(message) = body.message.or(body.error) {
            return message;
        }
    }
    if raw.trim().is_empty() || raw.trim_start().starts_with('{') {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        raw.trim().to_string()
    }
}

fn decode_error(err: &serde_json::Error, body: &str) -> ApiError {
    let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    ApiError::Decode(format!("{err} (body preview: {preview:?})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let client = RestClient::new("http://api.local/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/products"), "http://api.local/v1/products");
        assert_eq!(client.url("orders"), "http://api.local/v1/orders");
    }

    #[test]
    fn authorized_keeps_base_url() {
        let client = RestClient::new("http://api.local", Duration::from_secs(5)).unwrap();
        let authorized = client.authorized(Some("secret".to_string()));
        assert_eq!(authorized.token.as_deref(), Some("secret"));
        assert_eq!(authorized.base_url, "http://api.local");
        assert_eq!(client.token, None);
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message": "Invalid sort field"}"#),
            "Invalid sort field"
        );
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#"{"error": "Already exists"}"#),
            "Already exists"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down\n"), "upstream down");
    }

    #[test]
    fn collections_decode_from_page_or_array() {
        let rows: Collection = serde_json::from_str(r#"[{"id": 1}]"#).unwrap();
        assert!(matches!(rows, Collection::Rows(rows) if rows.len() == 1));

        let page: Collection = serde_json::from_str(
            r#"{"data": [{"id": 1}, {"id": 2}], "pagination": {"totalItems": 2, "totalPages": 1, "currentPage": 1}}"#,
        )
        .unwrap();
        assert!(matches!(page, Collection::Page(page) if page.data.len() == 2));
    }

    #[test]
    fn created_order_decodes_wrapped_or_bare() {
        let wrapped: Envelope<CreatedOrder> =
            serde_json::from_str(r#"{"data": {"id": "o1", "orderNumber": "1001"}}"#).unwrap();
        assert_eq!(wrapped.into_inner().display_number(), "1001");

        let bare: Envelope<CreatedOrder> = serde_json::from_str(r#"{"_id": "o2"}"#).unwrap();
        assert_eq!(bare.into_inner().id, "o2");
    }
}

//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};
use uuid::Uuid;

use crate::dto::admin::resource_links;
use crate::storage::StorageError;
use crate::store::StoreId;

pub mod admin;
pub mod main;
pub mod media;
pub mod payment;

/// Cookie carrying the backend bearer token.
pub const TOKEN_COOKIE: &str = "token";
/// Session key of the visitor's store.
pub const STORE_ID_KEY: &str = "store_id";

/// Registers every handler. Media routes come before the generic resource
/// routes so `/admin/media` is not taken for a resource slug.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::show_index)
        .service(media::show_media)
        .service(media::media_table_action)
        .service(admin::show_list)
        .service(admin::search_list)
        .service(admin::export_list)
        .service(admin::confirm_delete)
        .service(admin::submit_delete)
        .service(payment::start_checkout)
        .service(payment::paypal_success)
        .service(payment::razorpay_success)
        .service(payment::order_status);
}

/// Maps flash message levels to Bootstrap alert classes.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    render_with_status(tera, template, context, HttpResponse::Ok())
}

fn render_with_status(
    tera: &Tera,
    template: &str,
    context: &Context,
    mut builder: actix_web::HttpResponseBuilder,
) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => builder.content_type("text/html; charset=utf-8").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context every page starts from: alerts, navigation and the active menu
/// entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("resources", &resource_links());
    context
}

pub fn not_found(tera: &Tera, flash_messages: &IncomingFlashMessages) -> HttpResponse {
    let context = base_context(flash_messages, "");
    render_with_status(tera, "errors/404.html", &context, HttpResponse::NotFound())
}

/// Fallback for unmatched paths.
pub async fn not_found_page(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    not_found(&tera, &flash_messages)
}

/// Bearer token forwarded to the backend: the `token` cookie, or an
/// `Authorization: Bearer` header sent by the browser.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Store id of the visitor, created and saved in the session on first use.
pub fn session_store_id(session: &Session) -> Result<StoreId, StorageError> {
    if let Some(id) = session.get::<Uuid>(STORE_ID_KEY)? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(STORE_ID_KEY, id)?;
    Ok(id)
}

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::RestClient;
use crate::domain::resource::media;
use crate::forms::media::MediaTableQuery;
use crate::routes::{base_context, bearer_token, redirect, render_template, session_store_id};
use crate::services::media::{apply_media_action, load_media_page};
use crate::store::StoreRegistry;
use crate::table::{ClientTableAction, Table};

pub const MEDIA_PATH: &str = "/admin/media";
const MEDIA_TABLE_PATH: &str = "/admin/media/table";

#[get("/admin/media")]
pub async fn show_media(
    req: HttpRequest,
    session: Session,
    api: web::Data<RestClient>,
    registry: web::Data<StoreRegistry>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store_id = match session_store_id(&session) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Failed to read store id: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let api = api.authorized(bearer_token(&req));
    let mut context = base_context(&flash_messages, media::TABLE_ID);

    match load_media_page(&api, &registry, store_id).await {
        Ok(page) => {
            let columns = media::columns();
            let table = Table::client(&columns, &page.table, MEDIA_TABLE_PATH)
                .empty_message("No media uploaded yet.")
                .render(&page.rows);
            context.insert("table", &table);
            context.insert("error", &None::<String>);
        }
        Err(err) => {
            context.insert("table", &None::<()>);
            context.insert("error", &Some(err.user_message()));
        }
    }

    render_template(&tera, "admin/media.html", &context)
}

/// Sort and page links of the media table land here and go back to the
/// library page.
#[get("/admin/media/table")]
pub async fn media_table_action(
    session: Session,
    params: web::Query<MediaTableQuery>,
    registry: web::Data<StoreRegistry>,
) -> impl Responder {
    let store_id = match session_store_id(&session) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Failed to read store id: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match ClientTableAction::try_from(params.into_inner()) {
        Ok(action) => {
            apply_media_action(&registry, store_id, action);
        }
        Err(err) => {
            log::warn!("Ignoring media table action: {err}");
            FlashMessage::warning("That table action is not available.").send();
        }
    }

    redirect(MEDIA_PATH)
}

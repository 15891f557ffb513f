use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::routes::media::MEDIA_PATH;
use crate::routes::{base_context, render_template};

#[get("/")]
pub async fn show_index(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, "index");
    context.insert("media_href", MEDIA_PATH);

    render_template(&tera, "main/index.html", &context)
}

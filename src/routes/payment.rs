use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::RestClient;
use crate::domain::payment::{PaymentConfirmation, PaymentProvider};
use crate::dto::payment::{ORDER_STATUS_PATH, PaymentResultView};
use crate::forms::FormError;
use crate::forms::payment::{CheckoutForm, PaypalReturn, RazorpayReturn};
use crate::models::config::ServerConfig;
use crate::routes::{base_context, bearer_token, not_found, redirect, render_template};
use crate::services::payment::{self, complete_payment};
use crate::storage::{PaymentStorage, SessionStorage};

#[post("/checkout/{provider}")]
pub async fn start_checkout(
    provider: web::Path<String>,
    web::Form(form): web::Form<CheckoutForm>,
    session: Session,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(provider) = provider.parse::<PaymentProvider>() else {
        return not_found(&tera, &flash_messages);
    };

    let storage = SessionStorage::new(session);
    match payment::start_checkout(
        &storage,
        provider,
        form,
        server_config.checkout_url(provider),
    ) {
        Ok(location) => redirect(&location),
        Err(err) => {
            FlashMessage::error(err.user_message()).send();
            redirect(ORDER_STATUS_PATH)
        }
    }
}

/// Renders the outcome of a provider return. Parameters that cannot be read
/// fail without contacting the backend.
async fn finish_payment(
    req: &HttpRequest,
    provider: PaymentProvider,
    confirmation: Result<PaymentConfirmation, FormError>,
    session: Session,
    api: &RestClient,
    server_config: &ServerConfig,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    let delay = server_config.redirect_delay_secs;
    let view = match confirmation {
        Ok(confirmation) => {
            let storage = SessionStorage::new(session);
            let api = api.authorized(bearer_token(req));
            match complete_payment(&api, &storage, confirmation).await {
                Ok(outcome) => PaymentResultView::new(provider, &outcome, delay),
                Err(err) => {
                    log::error!("Failed to complete {provider} payment: {err}");
                    PaymentResultView::invalid_return(provider, delay)
                }
            }
        }
        Err(err) => {
            log::warn!("Invalid {provider} return parameters: {err}");
            PaymentResultView::invalid_return(provider, delay)
        }
    };

    let mut context = base_context(flash_messages, "checkout");
    context.insert("result", &view);

    render_template(tera, "payment/result.html", &context)
}

#[get("/checkout/paypal/success")]
pub async fn paypal_success(
    req: HttpRequest,
    params: web::Query<PaypalReturn>,
    session: Session,
    api: web::Data<RestClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    finish_payment(
        &req,
        PaymentProvider::Paypal,
        PaymentConfirmation::try_from(params.into_inner()),
        session,
        &api,
        &server_config,
        &flash_messages,
        &tera,
    )
    .await
}

#[get("/checkout/razorpay/success")]
pub async fn razorpay_success(
    req: HttpRequest,
    params: web::Query<RazorpayReturn>,
    session: Session,
    api: web::Data<RestClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    finish_payment(
        &req,
        PaymentProvider::Razorpay,
        PaymentConfirmation::try_from(params.into_inner()),
        session,
        &api,
        &server_config,
        &flash_messages,
        &tera,
    )
    .await
}

#[get("/orders/status")]
pub async fn order_status(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let storage = SessionStorage::new(session);
    let pending = match storage.pending_order() {
        Ok(pending) => pending,
        Err(err) => {
            log::error!("Failed to read pending order: {err}");
            None
        }
    };

    let mut context = base_context(&flash_messages, "orders");
    context.insert("pending_provider", &pending.as_ref().map(|order| order.provider.label()));
    context.insert(
        "pending_since",
        &pending
            .as_ref()
            .map(|order| order.created_at.format("%Y-%m-%d %H:%M").to_string()),
    );

    render_template(&tera, "payment/status.html", &context)
}

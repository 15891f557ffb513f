//! Checkout redirect and payment-provider return handling.

use serde_json::Value;

use crate::api::PaymentApi;
use crate::domain::payment::{
    OrderRequest, PaymentConfirmation, PaymentOutcome, PaymentProvider, PendingOrder,
};
use crate::forms::payment::CheckoutForm;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::PaymentStorage;

/// Saves the order as pending under a fresh idempotency key and returns the
/// provider URL to redirect to.
pub fn start_checkout<S>(
    storage: &S,
    provider: PaymentProvider,
    form: CheckoutForm,
    checkout_url: &str,
) -> ServiceResult<String>
where
    S: PaymentStorage + ?Sized,
{
    let order = Value::try_from(form).map_err(|err| {
        log::error!("Failed to read checkout form: {err}");
        ServiceError::Form("The order could not be read.".to_string())
    })?;

    let pending = PendingOrder::new(provider, order);
    storage.save_pending_order(&pending).map_err(|err| {
        log::error!("Failed to save pending order: {err}");
        err
    })?;
    log::info!(
        "Redirecting to {} with order {}",
        provider.label(),
        pending.idempotency_key
    );

    let separator = if checkout_url.contains('?') { '&' } else { '?' };
    Ok(format!(
        "{checkout_url}{separator}reference={}",
        pending.idempotency_key
    ))
}

/// Turns a provider's success redirect into an order, at most once per
/// payment.
///
/// A payment id already recorded as processed returns
/// [`PaymentOutcome::AlreadyProcessed`] without any backend call. Otherwise
/// the payment is confirmed and the order created, both under the pending
/// order's idempotency key, and the payment id is recorded.
pub async fn complete_payment<A, S>(
    api: &A,
    storage: &S,
    confirmation: PaymentConfirmation,
) -> ServiceResult<PaymentOutcome>
where
    A: PaymentApi + ?Sized,
    S: PaymentStorage + ?Sized,
{
    let payment_id = confirmation.payment_id().clone();
    if storage.is_processed(&payment_id)? {
        log::info!("Payment {payment_id} already processed");
        return Ok(PaymentOutcome::AlreadyProcessed);
    }

    let Some(pending) = storage.pending_order()? else {
        log::warn!("No pending order for payment {payment_id}");
        return Ok(PaymentOutcome::MissingPendingOrder);
    };

    if pending.provider != confirmation.provider() {
        log::error!(
            "Payment {payment_id} from {} does not match pending {} order",
            confirmation.provider(),
            pending.provider
        );
        return Ok(PaymentOutcome::Failed {
            message: "The payment does not match your pending order.".to_string(),
        });
    }

    let key = pending.idempotency_key;
    if let Err(err) = api.confirm_payment(&key, &confirmation).await {
        log::error!("Failed to confirm payment {payment_id}: {err}");
        return Ok(PaymentOutcome::Failed {
            message: err.user_message(),
        });
    }

    let request = OrderRequest {
        order: &pending.order,
        payment: &confirmation,
    };
    let order = match api.create_order(&key, &request).await {
        Ok(order) => order,
        Err(err) => {
            log::error!("Failed to create order for payment {payment_id}: {err}");
            return Ok(PaymentOutcome::Failed {
                message: err.user_message(),
            });
        }
    };

    storage.mark_processed(&payment_id)?;
    storage.clear_pending_order();
    log::info!("Created order {} for payment {payment_id}", order.id);

    Ok(PaymentOutcome::Completed { order })
}

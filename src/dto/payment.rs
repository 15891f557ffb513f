//! DTOs used by the payment return pages.

use serde::Serialize;

use crate::domain::payment::{PaymentOutcome, PaymentProvider};

/// Page customers land on when a payment could not be turned into an order.
pub const ORDER_STATUS_PATH: &str = "/orders/status";

/// Data required to render `payment/result.html`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PaymentResultView {
    /// `completed`, `already_processed`, `failed` or `missing`.
    pub status: &'static str,
    pub provider: &'static str,
    pub title: String,
    pub message: String,
    pub order_number: Option<String>,
    /// Delayed redirect target, rendered as a meta refresh.
    pub redirect_to: Option<&'static str>,
    pub redirect_delay_secs: u64,
}

impl PaymentResultView {
    pub fn new(provider: PaymentProvider, outcome: &PaymentOutcome, redirect_delay_secs: u64) -> Self {
        let (status, title, message, order_number, redirect_to) = match outcome {
            PaymentOutcome::Completed { order } => (
                "completed",
                "Thank you for your order".to_string(),
                format!("Your order {} has been placed.", order.display_number()),
                Some(order.display_number().to_string()),
                None,
            ),
            PaymentOutcome::AlreadyProcessed => (
                "already_processed",
                "Payment already processed".to_string(),
                "This payment has already been processed. Your order is confirmed.".to_string(),
                None,
                None,
            ),
            PaymentOutcome::Failed { message } => (
                "failed",
                "Payment failed".to_string(),
                message.clone(),
                None,
                Some(ORDER_STATUS_PATH),
            ),
            PaymentOutcome::MissingPendingOrder => (
                "missing",
                "Order not found".to_string(),
                "We could not find the order for this payment.".to_string(),
                None,
                Some(ORDER_STATUS_PATH),
            ),
        };

        Self {
            status,
            provider: provider.label(),
            title,
            message,
            order_number,
            redirect_to,
            redirect_delay_secs,
        }
    }

    /// Failure page for return parameters that could not be read.
    pub fn invalid_return(provider: PaymentProvider, redirect_delay_secs: u64) -> Self {
        Self::new(
            provider,
            &PaymentOutcome::Failed {
                message: "The payment details returned by the provider are incomplete."
                    .to_string(),
            },
            redirect_delay_secs,
        )
    }
}

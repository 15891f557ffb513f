//! Payment-provider return flow: pending orders and confirmations.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{IdempotencyKey, PaymentId, TypeConstraintError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Paypal,
    Razorpay,
}

impl PaymentProvider {
    pub const fn slug(self) -> &'static str {
        match self {
            PaymentProvider::Paypal => "paypal",
            PaymentProvider::Razorpay => "razorpay",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PaymentProvider::Paypal => "PayPal",
            PaymentProvider::Razorpay => "Razorpay",
        }
    }
}

impl Display for PaymentProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PaymentProvider {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "paypal" => Ok(PaymentProvider::Paypal),
            "razorpay" => Ok(PaymentProvider::Razorpay),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Order payload saved in the session before redirecting to a provider.
///
/// The idempotency key is generated once here and sent with every backend
/// call made for this order, so a repeated return from the provider cannot
/// create a second order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub provider: PaymentProvider,
    pub idempotency_key: IdempotencyKey,
    pub order: Value,
    pub created_at: DateTime<Utc>,
}

impl PendingOrder {
    pub fn new(provider: PaymentProvider, order: Value) -> Self {
        Self {
            provider,
            idempotency_key: IdempotencyKey::generate(),
            order,
            created_at: Utc::now(),
        }
    }
}

/// Provider parameters read from a success redirect, sent to the backend for
/// verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum PaymentConfirmation {
    Paypal {
        #[serde(rename = "orderToken")]
        token: PaymentId,
        #[serde(rename = "payerId")]
        payer_id: String,
    },
    Razorpay {
        #[serde(rename = "razorpayPaymentId")]
        payment_id: PaymentId,
        #[serde(rename = "razorpayOrderId")]
        order_id: String,
        #[serde(rename = "razorpaySignature")]
        signature: String,
    },
}

impl PaymentConfirmation {
    pub fn provider(&self) -> PaymentProvider {
        match self {
            PaymentConfirmation::Paypal { .. } => PaymentProvider::Paypal,
            PaymentConfirmation::Razorpay { .. } => PaymentProvider::Razorpay,
        }
    }

    /// Identifier the processed-payment guard is keyed by.
    pub fn payment_id(&self) -> &PaymentId {
        match self {
            PaymentConfirmation::Paypal { token, .. } => token,
            PaymentConfirmation::Razorpay { payment_id, .. } => payment_id,
        }
    }
}

/// Body of the order-creation call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest<'a> {
    pub order: &'a Value,
    pub payment: &'a PaymentConfirmation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
}

impl CreatedOrder {
    /// Number shown to the customer, falling back to the record id.
    pub fn display_number(&self) -> &str {
        self.order_number.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// The payment id was already turned into an order in this session.
    AlreadyProcessed,
    Completed { order: CreatedOrder },
    Failed { message: String },
    /// No pending order in the session to attach the payment to.
    MissingPendingOrder,
}

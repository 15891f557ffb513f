//! Checkout submission and payment-provider return parameters.

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::domain::payment::PaymentConfirmation;
use crate::domain::types::PaymentId;
use crate::forms::FormError;

/// Order payload posted by the storefront before leaving for the provider.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutForm {
    /// JSON encoded order.
    #[validate(length(min = 2, max = 65536))]
    pub order: String,
}

impl TryFrom<CheckoutForm> for Value {
    type Error = FormError;

    fn try_from(form: CheckoutForm) -> Result<Self, Self::Error> {
        form.validate()?;
        match serde_json::from_str::<Value>(&form.order) {
            Ok(order @ Value::Object(_)) => Ok(order),
            _ => Err(FormError::InvalidOrder),
        }
    }
}

/// Query string of the PayPal success redirect. Missing parameters decode
/// as empty and fail validation.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PaypalReturn {
    #[validate(length(min = 1))]
    pub token: String,
    #[serde(rename = "PayerID")]
    #[validate(length(min = 1))]
    pub payer_id: String,
}

impl TryFrom<PaypalReturn> for PaymentConfirmation {
    type Error = FormError;

    fn try_from(params: PaypalReturn) -> Result<Self, Self::Error> {
        params.validate()?;
        Ok(PaymentConfirmation::Paypal {
            token: PaymentId::new(params.token).map_err(|_| FormError::InvalidPaymentId)?,
            payer_id: params.payer_id.trim().to_string(),
        })
    }
}

/// Query string of the Razorpay success redirect.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RazorpayReturn {
    #[validate(length(min = 1))]
    pub razorpay_payment_id: String,
    #[validate(length(min = 1))]
    pub razorpay_order_id: String,
    #[validate(length(min = 1))]
    pub razorpay_signature: String,
}

impl TryFrom<RazorpayReturn> for PaymentConfirmation {
    type Error = FormError;

    fn try_from(params: RazorpayReturn) -> Result<Self, Self::Error> {
        params.validate()?;
        Ok(PaymentConfirmation::Razorpay {
            payment_id: PaymentId::new(params.razorpay_payment_id)
                .map_err(|_| FormError::InvalidPaymentId)?,
            order_id: params.razorpay_order_id.trim().to_string(),
            signature: params.razorpay_signature.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_requires_json_object() {
        let valid = CheckoutForm {
            order: r#"{"items": [{"sku": "A1", "qty": 2}]}"#.to_string(),
        };
        let array = CheckoutForm {
            order: "[1, 2]".to_string(),
        };
        let garbage = CheckoutForm {
            order: "{not json".to_string(),
        };

        assert!(Value::try_from(valid).is_ok());
        assert!(matches!(Value::try_from(array), Err(FormError::InvalidOrder)));
        assert!(matches!(
            Value::try_from(garbage),
            Err(FormError::InvalidOrder)
        ));
    }

    #[test]
    fn paypal_return_reads_payer_id_key() {
        let params: PaypalReturn =
            serde_html_form::from_str("token=EC-123&PayerID=PAYER9").unwrap();

        let confirmation = PaymentConfirmation::try_from(params).unwrap();

        assert_eq!(confirmation.payment_id().as_str(), "EC-123");
        assert!(matches!(
            confirmation,
            PaymentConfirmation::Paypal { ref payer_id, .. } if payer_id == "PAYER9"
        ));
    }

    #[test]
    fn razorpay_return_requires_every_parameter() {
        let params = RazorpayReturn {
            razorpay_payment_id: "pay_1".to_string(),
            razorpay_order_id: String::new(),
            razorpay_signature: "sig".to_string(),
        };

        assert!(matches!(
            PaymentConfirmation::try_from(params),
            Err(FormError::Validation(_))
        ));
    }
}

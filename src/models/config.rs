//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::payment::PaymentProvider;

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_redirect_delay_secs() -> u64 {
    5
}

fn default_store_capacity() -> usize {
    crate::store::DEFAULT_STORE_CAPACITY
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// Base URL of the REST backend.
    pub api_url: String,
    pub templates_dir: String,
    pub secret: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    pub paypal_checkout_url: String,
    pub razorpay_checkout_url: String,
    /// Seconds a failed payment page waits before moving to the order
    /// status page.
    #[serde(default = "default_redirect_delay_secs")]
    pub redirect_delay_secs: u64,
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
}

impl ServerConfig {
    pub fn checkout_url(&self, provider: PaymentProvider) -> &str {
        match provider {
            PaymentProvider::Paypal => &self.paypal_checkout_url,
            PaymentProvider::Razorpay => &self.razorpay_checkout_url,
        }
    }
}

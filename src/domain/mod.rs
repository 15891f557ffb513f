//! Domain types shared by the admin console and the checkout callbacks.

pub mod payment;
pub mod resource;
pub mod types;

//! DTOs that bridge services with templates.

pub mod admin;
pub mod payment;

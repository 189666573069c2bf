//! HTTP inbound adapters (actix-web).

pub mod error;
pub mod health;
pub mod identify;
pub mod state;
pub(crate) mod validation;

pub use error::{ApiResult, ErrorBody};

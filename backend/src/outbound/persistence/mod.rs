//! PostgreSQL persistence adapters using Diesel.
//!
//! Thin adapters over the domain's ports: [`DieselContactStore`] implements
//! the contact store contract inside a transaction, and
//! [`DieselIdentifyService`] wraps each resolution in a transaction with
//! bounded retries. Diesel row structs and schema definitions stay internal
//! to this module.

mod contact_store;
mod identify_service;
mod models;
mod pool;
mod schema;

pub use contact_store::DieselContactStore;
pub use identify_service::DieselIdentifyService;
pub use pool::{DbPool, PoolConfig, PoolError};

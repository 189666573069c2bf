//! Ports connecting the domain to its adapters.

mod contact_store;
mod identify_service;
pub(crate) mod macros;

pub use contact_store::{ContactStore, ContactStoreError, NewContact};
#[cfg(test)]
pub use identify_service::MockIdentifyService;
pub use identify_service::IdentifyService;

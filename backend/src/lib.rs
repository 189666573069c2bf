//! Contact identity resolution service.
//!
//! Consolidates contact records that share an email address or phone number
//! into clusters with one primary record and linked secondaries. The core is
//! the resolver in [`domain::identity`]; everything else is adapters around
//! it: Diesel/PostgreSQL persistence in [`outbound::persistence`] and the
//! actix-web surface in [`inbound::http`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use doc::ApiDoc;

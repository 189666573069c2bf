//! Domain entities, the resolution algorithm, and ports.
//!
//! The domain is transport and storage agnostic: inbound adapters translate
//! HTTP requests into [`ports::IdentifyService`] calls, and the persistence
//! layer implements [`ports::ContactStore`] over PostgreSQL.

pub mod contact;
pub mod error;
pub mod identity;
pub mod ports;

pub use self::contact::{ConsolidatedContact, Contact, ContactId, LinkPrecedence};
pub use self::error::{Error, ErrorCode};
pub use self::identity::{resolve_identity, IdentifyQuery, ResolveError};

//! Driven port for contact persistence.
//!
//! One `ContactStore` instance represents one open unit of work: every call
//! made through it during a single resolution must be atomic with the rest,
//! so adapters bind an instance to a transaction rather than to a pool.

use async_trait::async_trait;

use crate::domain::contact::{Contact, ContactId, LinkPrecedence};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by contact store adapters.
    pub enum ContactStoreError {
        /// Uniqueness or serialisation conflict with a concurrent writer.
        /// The whole read-decide-write sequence may be re-run.
        Conflict => "contact store conflict: {message}",
        /// The store could not be reached or the connection was lost.
        Connection => "contact store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "contact store query failed: {message}",
    }
}

impl ContactStoreError {
    /// Whether re-running the resolution sequence may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Connection { .. })
    }
}

/// Payload for creating a contact; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub linked_id: Option<ContactId>,
    pub link_precedence: LinkPrecedence,
}

impl NewContact {
    /// A new primary contact carrying the submitted identifiers.
    #[must_use]
    pub fn primary(email: Option<&str>, phone_number: Option<&str>) -> Self {
        Self {
            email: email.map(str::to_owned),
            phone_number: phone_number.map(str::to_owned),
            linked_id: None,
            link_precedence: LinkPrecedence::Primary,
        }
    }

    /// A new secondary contact linked to `primary_id`.
    ///
    /// Both submitted identifiers are stored, including the one that already
    /// exists in the cluster, so every submission remains retrievable from
    /// the row it created.
    #[must_use]
    pub fn secondary(email: Option<&str>, phone_number: Option<&str>, primary_id: ContactId) -> Self {
        Self {
            email: email.map(str::to_owned),
            phone_number: phone_number.map(str::to_owned),
            linked_id: Some(primary_id),
            link_precedence: LinkPrecedence::Secondary,
        }
    }
}

/// Contact persistence operations required by the resolver.
///
/// All reads exclude soft-deleted rows and order results by
/// `(created_at, id)` ascending.
#[async_trait]
pub trait ContactStore: Send {
    /// Contacts whose email or phone number equals the given values. A side
    /// that is absent does not constrain the match.
    async fn find_matching(
        &mut self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError>;

    /// Insert a contact, assigning its id and creation timestamps.
    async fn insert(&mut self, contact: NewContact) -> Result<Contact, ContactStoreError>;

    /// Atomically set `link_precedence = secondary` and `linked_id` for every
    /// id in the set, advancing `updated_at`.
    async fn demote_many(
        &mut self,
        ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> Result<(), ContactStoreError>;

    /// The full cluster of `primary_id`: the primary itself plus every
    /// contact whose `linked_id` references it.
    async fn find_cluster(&mut self, primary_id: ContactId) -> Result<Vec<Contact>, ContactStoreError>;
}

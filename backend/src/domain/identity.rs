//! The identity resolution algorithm.
//!
//! Given a submitted email and/or phone number, locate or create the owning
//! identity cluster, grow it when the submission carries a value the cluster
//! has not seen, and merge clusters when the submission bridges two of them.
//!
//! The algorithm is a pure sequence of [`ContactStore`] calls. Atomicity is
//! the adapter's concern: the store handle passed in must represent a single
//! unit of work, so that a concurrent writer conflict rolls the whole
//! sequence back and the caller can re-run it from the first read.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::contact::{ConsolidatedContact, Contact, ContactId};
use crate::domain::ports::{ContactStore, ContactStoreError, NewContact};

/// Identifiers submitted to one resolution. Empty strings are treated as
/// absent by constructors; inbound adapters also validate syntax first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentifyQuery {
    email: Option<String>,
    phone_number: Option<String>,
}

impl IdentifyQuery {
    /// Build a query, discarding empty identifier strings.
    #[must_use]
    pub fn new(email: Option<String>, phone_number: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            email: non_empty(email),
            phone_number: non_empty(phone_number),
        }
    }

    /// Submitted email, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Submitted phone number, if any.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

/// Failures of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Neither an email nor a phone number was submitted.
    #[error("either an email or a phone number must be provided")]
    MissingIdentifiers,
    /// A fetched cluster does not contain exactly one primary contact.
    /// Indicates stored-data corruption; never repaired here.
    #[error("cluster around contact {contact_id} violates the single-primary invariant")]
    InvariantViolation { contact_id: ContactId },
    /// The store failed; [`ContactStoreError::is_transient`] distinguishes
    /// conflicts worth re-running from hard failures.
    #[error(transparent)]
    Store(#[from] ContactStoreError),
}

/// Resolve one submission against the store.
///
/// The store handle must span a single atomic unit of work; see the module
/// documentation.
///
/// # Errors
///
/// [`ResolveError::MissingIdentifiers`] when the query is empty,
/// [`ResolveError::InvariantViolation`] when a fetched cluster has no
/// unique primary, and [`ResolveError::Store`] for store failures.
pub async fn resolve_identity<S: ContactStore>(
    store: &mut S,
    query: &IdentifyQuery,
) -> Result<ConsolidatedContact, ResolveError> {
    let email = query.email();
    let phone = query.phone_number();
    if email.is_none() && phone.is_none() {
        return Err(ResolveError::MissingIdentifiers);
    }

    let matches = store.find_matching(email, phone).await?;
    if matches.is_empty() {
        let created = store.insert(NewContact::primary(email, phone)).await?;
        debug!(contact_id = created.id, "created primary contact for unseen identifiers");
        return consolidate(&[created]);
    }

    // Distinct primary identities touched by the matches: a matched primary
    // contributes itself, a matched secondary contributes its primary.
    let mut primary_ids = BTreeSet::new();
    for contact in &matches {
        if contact.is_primary() {
            primary_ids.insert(contact.id);
        } else {
            let linked = contact
                .linked_id
                .ok_or(ResolveError::InvariantViolation { contact_id: contact.id })?;
            primary_ids.insert(linked);
        }
    }

    let mut clusters = Vec::with_capacity(primary_ids.len());
    for primary_id in primary_ids {
        let cluster = store.find_cluster(primary_id).await?;
        let primary = cluster
            .iter()
            .find(|c| c.id == primary_id && c.is_primary())
            .cloned()
            .ok_or(ResolveError::InvariantViolation { contact_id: primary_id })?;
        clusters.push((primary, cluster));
    }
    clusters.sort_by_key(|(primary, _)| (primary.created_at, primary.id));

    let Some((survivor, _)) = clusters.first() else {
        // Unreachable: `matches` was non-empty, so at least one id was derived.
        return Err(ResolveError::MissingIdentifiers);
    };
    let survivor_id = survivor.id;

    if clusters.len() > 1 {
        // Bridging event: demote every losing primary and re-parent its
        // whole cluster onto the survivor in one batch, so no secondary is
        // ever left pointing at a demoted contact.
        let demoted: Vec<ContactId> = clusters
            .iter()
            .skip(1)
            .flat_map(|(_, cluster)| cluster.iter().map(|c| c.id))
            .collect();
        debug!(
            survivor_id,
            demoted = demoted.len(),
            "merging clusters under the oldest primary"
        );
        store.demote_many(&demoted, survivor_id).await?;
    }

    let mut cluster = store.find_cluster(survivor_id).await?;
    if introduces_new_identifier(&cluster, email, phone) {
        store
            .insert(NewContact::secondary(email, phone, survivor_id))
            .await?;
        cluster = store.find_cluster(survivor_id).await?;
    }

    consolidate(&cluster)
}

/// Whether the submission carries an identifier the cluster has not stored.
fn introduces_new_identifier(cluster: &[Contact], email: Option<&str>, phone: Option<&str>) -> bool {
    let new_email = email.is_some_and(|value| {
        !value.is_empty() && !cluster.iter().any(|c| c.email.as_deref() == Some(value))
    });
    let new_phone = phone.is_some_and(|value| {
        !value.is_empty() && !cluster.iter().any(|c| c.phone_number.as_deref() == Some(value))
    });
    new_email || new_phone
}

fn consolidate(cluster: &[Contact]) -> Result<ConsolidatedContact, ResolveError> {
    ConsolidatedContact::from_cluster(cluster).map_err(|_| ResolveError::InvariantViolation {
        contact_id: cluster.first().map_or(0, |c| c.id),
    })
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

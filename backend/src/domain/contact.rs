//! Contact entity and consolidated cluster views.
//!
//! A cluster is one primary contact plus every contact linked to it. The
//! consolidated view is the read model returned to callers of the identify
//! operation: the primary id, the distinct identifiers known across the
//! cluster, and the secondary ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned contact identifier. Monotonic with creation time.
pub type ContactId = i64;

/// Whether a contact is the canonical record of its cluster or linked to one.
///
/// The only permitted transition is `Primary` to `Secondary`, performed by
/// the resolver when two clusters merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkPrecedence {
    Primary,
    Secondary,
}

/// A single contact record.
///
/// `email` and `phone_number` are immutable once stored; new identifying
/// information always produces a new row. `linked_id` is present exactly
/// when the contact is secondary and references its cluster's primary
/// directly (never another secondary).
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub linked_id: Option<ContactId>,
    pub link_precedence: LinkPrecedence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Whether this contact is the canonical record of its cluster.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.link_precedence == LinkPrecedence::Primary
    }
}

/// Shape violations detected while building a consolidated view.
///
/// These indicate store-level corruption; the resolver surfaces them without
/// attempting repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClusterShapeError {
    /// The cluster contains no contact with primary precedence.
    #[error("cluster contains no primary contact")]
    NoPrimary,
    /// The cluster contains more than one contact with primary precedence.
    #[error("cluster contains more than one primary contact")]
    MultiplePrimaries,
}

/// Read model for one identity cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedContact {
    /// Id of the cluster's primary contact.
    pub primary_contact_id: ContactId,
    /// Distinct emails across the cluster, the primary's own email first,
    /// the rest in the creation order of the contact that introduced them.
    pub emails: Vec<String>,
    /// Distinct phone numbers, ordered like [`Self::emails`].
    pub phone_numbers: Vec<String>,
    /// Secondary contact ids, ascending creation order.
    pub secondary_contact_ids: Vec<ContactId>,
}

impl ConsolidatedContact {
    /// Build the consolidated view of a cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterShapeError`] when the cluster does not contain
    /// exactly one primary contact.
    pub fn from_cluster(cluster: &[Contact]) -> Result<Self, ClusterShapeError> {
        let mut ordered: Vec<&Contact> = cluster.iter().collect();
        ordered.sort_by_key(|c| (c.created_at, c.id));

        let mut primaries = ordered.iter().filter(|c| c.is_primary());
        let primary = primaries.next().ok_or(ClusterShapeError::NoPrimary)?;
        if primaries.next().is_some() {
            return Err(ClusterShapeError::MultiplePrimaries);
        }

        let emails = collect_distinct(primary.email.as_deref(), ordered.iter().map(|c| c.email.as_deref()));
        let phone_numbers = collect_distinct(
            primary.phone_number.as_deref(),
            ordered.iter().map(|c| c.phone_number.as_deref()),
        );
        let secondary_contact_ids = ordered
            .iter()
            .filter(|c| !c.is_primary())
            .map(|c| c.id)
            .collect();

        Ok(Self {
            primary_contact_id: primary.id,
            emails,
            phone_numbers,
            secondary_contact_ids,
        })
    }
}

/// Collect distinct non-empty values, the primary's own value first and the
/// rest in introduction order.
fn collect_distinct<'a>(
    primary_value: Option<&'a str>,
    values: impl Iterator<Item = Option<&'a str>>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if let Some(value) = primary_value.filter(|v| !v.is_empty()) {
        out.push(value.to_owned());
    }
    for value in values.flatten() {
        if !value.is_empty() && !out.iter().any(|seen| seen == value) {
            out.push(value.to_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).single().expect("valid timestamp")
    }

    fn contact(
        id: ContactId,
        email: Option<&str>,
        phone: Option<&str>,
        linked_id: Option<ContactId>,
        seconds: i64,
    ) -> Contact {
        let precedence = if linked_id.is_some() {
            LinkPrecedence::Secondary
        } else {
            LinkPrecedence::Primary
        };
        Contact {
            id,
            email: email.map(str::to_owned),
            phone_number: phone.map(str::to_owned),
            linked_id,
            link_precedence: precedence,
            created_at: at(seconds),
            updated_at: at(seconds),
        }
    }

    #[rstest]
    fn single_primary_view() {
        let cluster = vec![contact(1, Some("a@x.com"), Some("111"), None, 0)];
        let view = ConsolidatedContact::from_cluster(&cluster).expect("valid cluster");

        assert_eq!(view.primary_contact_id, 1);
        assert_eq!(view.emails, vec!["a@x.com"]);
        assert_eq!(view.phone_numbers, vec!["111"]);
        assert!(view.secondary_contact_ids.is_empty());
    }

    #[rstest]
    fn primary_values_come_first_and_duplicates_collapse() {
        let cluster = vec![
            contact(3, Some("b@x.com"), Some("222"), Some(1), 2),
            contact(1, Some("a@x.com"), Some("111"), None, 0),
            contact(2, Some("a@x.com"), Some("222"), Some(1), 1),
        ];
        let view = ConsolidatedContact::from_cluster(&cluster).expect("valid cluster");

        assert_eq!(view.primary_contact_id, 1);
        assert_eq!(view.emails, vec!["a@x.com", "b@x.com"]);
        assert_eq!(view.phone_numbers, vec!["111", "222"]);
        assert_eq!(view.secondary_contact_ids, vec![2, 3]);
    }

    #[rstest]
    fn missing_identifier_sides_are_skipped() {
        let cluster = vec![
            contact(1, None, Some("111"), None, 0),
            contact(2, Some("a@x.com"), None, Some(1), 1),
        ];
        let view = ConsolidatedContact::from_cluster(&cluster).expect("valid cluster");

        assert_eq!(view.emails, vec!["a@x.com"]);
        assert_eq!(view.phone_numbers, vec!["111"]);
    }

    #[rstest]
    fn no_primary_is_a_shape_error() {
        let cluster = vec![contact(2, Some("a@x.com"), None, Some(1), 1)];
        assert_eq!(
            ConsolidatedContact::from_cluster(&cluster),
            Err(ClusterShapeError::NoPrimary)
        );
    }

    #[rstest]
    fn multiple_primaries_are_a_shape_error() {
        let cluster = vec![
            contact(1, Some("a@x.com"), None, None, 0),
            contact(2, None, Some("111"), None, 1),
        ];
        assert_eq!(
            ConsolidatedContact::from_cluster(&cluster),
            Err(ClusterShapeError::MultiplePrimaries)
        );
    }

    #[rstest]
    fn empty_cluster_has_no_primary() {
        assert_eq!(
            ConsolidatedContact::from_cluster(&[]),
            Err(ClusterShapeError::NoPrimary)
        );
    }
}

//! Internal Diesel row structs for the contacts table.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Conversions into domain types validate the stored precedence
//! discriminant.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{Contact, LinkPrecedence};

use super::schema::contacts;

/// Row struct for reading from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: i64,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub linked_id: Option<i64>,
    pub link_precedence: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[expect(dead_code, reason = "reads filter on deleted_at at the query level")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating new contact records.
///
/// Timestamps and id are assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub phone_number: Option<&'a str>,
    pub email: Option<&'a str>,
    pub linked_id: Option<i64>,
    pub link_precedence: &'a str,
}

/// Stored discriminant for a precedence value.
pub(crate) fn precedence_to_db(precedence: LinkPrecedence) -> &'static str {
    match precedence {
        LinkPrecedence::Primary => "primary",
        LinkPrecedence::Secondary => "secondary",
    }
}

/// Parse a stored precedence discriminant.
pub(crate) fn precedence_from_db(value: &str) -> Option<LinkPrecedence> {
    match value {
        "primary" => Some(LinkPrecedence::Primary),
        "secondary" => Some(LinkPrecedence::Secondary),
        _ => None,
    }
}

impl ContactRow {
    /// Convert into the domain entity, rejecting unknown precedence values.
    pub(crate) fn into_contact(self) -> Result<Contact, String> {
        let link_precedence = precedence_from_db(&self.link_precedence)
            .ok_or_else(|| format!("contact {}: unknown link_precedence {:?}", self.id, self.link_precedence))?;
        Ok(Contact {
            id: self.id,
            email: self.email,
            phone_number: self.phone_number,
            linked_id: self.linked_id,
            link_precedence,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

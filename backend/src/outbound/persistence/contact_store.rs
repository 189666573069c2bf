//! PostgreSQL-backed [`ContactStore`] implementation using Diesel.
//!
//! The store handle borrows the connection of an open transaction, so one
//! handle spans exactly one resolution sequence and rolls back as a unit.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::identity::ResolveError;
use crate::domain::ports::{ContactStore, ContactStoreError, NewContact};
use crate::domain::{Contact, ContactId};

use super::models::{precedence_to_db, ContactRow, NewContactRow};
use super::schema::contacts;

/// [`ContactStore`] bound to one transaction's connection.
pub struct DieselContactStore<'a> {
    conn: &'a mut AsyncPgConnection,
}

impl<'a> DieselContactStore<'a> {
    /// Bind a store handle to an open transaction.
    pub fn new(conn: &'a mut AsyncPgConnection) -> Self {
        Self { conn }
    }
}

/// Map Diesel errors to port errors.
///
/// Unique violations and serialisation failures are the expected outcome of
/// losing a concurrent-writer race; they map to the retryable `Conflict`.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> ContactStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(message = info.message(), "unique violation, concurrent writer won");
            ContactStoreError::conflict(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, info) => {
            ContactStoreError::conflict(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            ContactStoreError::connection(info.message().to_owned())
        }
        other => ContactStoreError::query(other.to_string()),
    }
}

impl From<diesel::result::Error> for ResolveError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Store(map_diesel_error(error))
    }
}

fn rows_to_contacts(rows: Vec<ContactRow>) -> Result<Vec<Contact>, ContactStoreError> {
    rows.into_iter()
        .map(|row| row.into_contact().map_err(ContactStoreError::query))
        .collect()
}

#[async_trait]
impl ContactStore for DieselContactStore<'_> {
    async fn find_matching(
        &mut self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError> {
        use self::contacts::dsl as c;

        let base = c::contacts
            .filter(c::deleted_at.is_null())
            .order((c::created_at.asc(), c::id.asc()))
            .select(ContactRow::as_select())
            .into_boxed();

        let query = match (email, phone_number) {
            (Some(e), Some(p)) => base.filter(c::email.eq(e).or(c::phone_number.eq(p))),
            (Some(e), None) => base.filter(c::email.eq(e)),
            (None, Some(p)) => base.filter(c::phone_number.eq(p)),
            (None, None) => return Ok(Vec::new()),
        };

        let rows = query.load::<ContactRow>(&mut *self.conn).await.map_err(map_diesel_error)?;
        rows_to_contacts(rows)
    }

    async fn insert(&mut self, contact: NewContact) -> Result<Contact, ContactStoreError> {
        use self::contacts::dsl as c;

        let new_row = NewContactRow {
            phone_number: contact.phone_number.as_deref(),
            email: contact.email.as_deref(),
            linked_id: contact.linked_id,
            link_precedence: precedence_to_db(contact.link_precedence),
        };

        let row = diesel::insert_into(c::contacts)
            .values(&new_row)
            .returning(ContactRow::as_returning())
            .get_result::<ContactRow>(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;

        row.into_contact().map_err(ContactStoreError::query)
    }

    async fn demote_many(
        &mut self,
        ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> Result<(), ContactStoreError> {
        use self::contacts::dsl as c;

        if ids.is_empty() {
            return Ok(());
        }

        diesel::update(c::contacts.filter(c::id.eq_any(ids)))
            .set((
                c::link_precedence.eq(precedence_to_db(crate::domain::LinkPrecedence::Secondary)),
                c::linked_id.eq(new_linked_id),
                c::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_cluster(&mut self, primary_id: ContactId) -> Result<Vec<Contact>, ContactStoreError> {
        use self::contacts::dsl as c;

        let rows = c::contacts
            .filter(c::deleted_at.is_null())
            .filter(c::id.eq(primary_id).or(c::linked_id.eq(primary_id)))
            .order((c::created_at.asc(), c::id.asc()))
            .select(ContactRow::as_select())
            .load::<ContactRow>(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_contacts(rows)
    }
}

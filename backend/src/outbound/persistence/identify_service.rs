//! Database-backed [`IdentifyService`] implementation.
//!
//! Each identify call runs the full read-decide-write resolution sequence
//! inside one serializable transaction. Two conflict shapes exist: duplicate
//! primary creation trips the partial unique indexes, and interleaved merges
//! (which write disjoint rows and never touch a unique index) trip the
//! serializable-isolation check instead. Either way the losing transaction
//! rolls back in full and the whole sequence is re-run from the first read,
//! a bounded number of times.

use std::future::Future;

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::{error, warn};

use crate::domain::identity::{resolve_identity, IdentifyQuery, ResolveError};
use crate::domain::ports::{ContactStoreError, IdentifyService};
use crate::domain::{ConsolidatedContact, Error};

use super::contact_store::DieselContactStore;
use super::pool::DbPool;

/// Attempts per identify call, counting the first.
const MAX_ATTEMPTS: u32 = 3;

/// Diesel-backed implementation of the identify driving port.
#[derive(Clone)]
pub struct DieselIdentifyService {
    pool: DbPool,
}

impl DieselIdentifyService {
    /// Create a new service with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// One transactional resolution attempt.
    async fn attempt(&self, query: &IdentifyQuery) -> Result<ConsolidatedContact, ResolveError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ResolveError::Store(ContactStoreError::connection(err.to_string())))?;

        conn.build_transaction()
            .serializable()
            .run(|conn| {
                async move {
                    let mut store = DieselContactStore::new(conn);
                    resolve_identity(&mut store, query).await
                }
                .scope_boxed()
            })
            .await
    }
}

fn is_transient(error: &ResolveError) -> bool {
    matches!(error, ResolveError::Store(store) if store.is_transient())
}

/// Re-run `attempt_fn` on transient failures, up to `max_attempts` in total.
async fn run_with_retries<T, F, Fut>(max_attempts: u32, mut attempt_fn: F) -> Result<T, ResolveError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ResolveError>>,
{
    let mut attempt = 1;
    loop {
        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) && attempt < max_attempts => {
                warn!(attempt, error = %err, "transient store failure, re-running resolution");
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn map_resolve_error(error: ResolveError) -> Error {
    match error {
        ResolveError::MissingIdentifiers => Error::invalid_request(error.to_string()),
        ResolveError::InvariantViolation { contact_id } => {
            error!(contact_id, "stored cluster violates the single-primary invariant");
            Error::internal(error.to_string())
        }
        ResolveError::Store(store) if store.is_transient() => {
            Error::service_unavailable(store.to_string())
        }
        ResolveError::Store(store) => Error::internal(store.to_string()),
    }
}

#[async_trait]
impl IdentifyService for DieselIdentifyService {
    #[tracing::instrument(
        name = "identify",
        skip_all,
        fields(has_email = email.is_some(), has_phone_number = phone_number.is_some())
    )]
    async fn identify(
        &self,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Result<ConsolidatedContact, Error> {
        let query = IdentifyQuery::new(email, phone_number);
        run_with_retries(MAX_ATTEMPTS, || self.attempt(&query))
            .await
            .map_err(map_resolve_error)
    }
}

#[cfg(test)]
mod tests {
    //! Retry and error-mapping coverage. Transactional behaviour against a
    //! live database is out of scope for the unit suite.

    use std::sync::atomic::{AtomicU32, Ordering};

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn conflict() -> ResolveError {
        ResolveError::Store(ContactStoreError::conflict("duplicate key"))
    }

    #[tokio::test]
    async fn first_success_needs_no_retry() {
        let calls = AtomicU32::new(0);
        let result = run_with_retries(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ResolveError>(42) }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn losing_writer_re_runs_the_sequence() {
        let calls = AtomicU32::new(0);
        let result = run_with_retries(3, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(conflict())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn interleaved_merges_retry_on_serialization_failure() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        // Concurrent merges write disjoint rows, so the only signal that one
        // of them must lose is the serialisation failure raised at commit.
        let failure = || {
            ResolveError::from(DieselError::DatabaseError(
                DatabaseErrorKind::SerializationFailure,
                Box::new("could not serialize access due to concurrent update".to_owned()),
            ))
        };
        assert!(is_transient(&failure()));

        let calls = AtomicU32::new(0);
        let result = run_with_retries(3, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(failure())
                } else {
                    Ok(11)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(11));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn persistent_conflict_stops_after_the_bound() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = run_with_retries(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(conflict()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_errors_fail_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = run_with_retries(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ResolveError::MissingIdentifiers) }
        })
        .await;

        assert_eq!(result, Err(ResolveError::MissingIdentifiers));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[case(ResolveError::MissingIdentifiers, ErrorCode::InvalidRequest)]
    #[case(ResolveError::InvariantViolation { contact_id: 7 }, ErrorCode::InternalError)]
    #[case(conflict(), ErrorCode::ServiceUnavailable)]
    #[case(
        ResolveError::Store(ContactStoreError::connection("refused")),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        ResolveError::Store(ContactStoreError::query("syntax error")),
        ErrorCode::InternalError
    )]
    fn resolve_errors_map_to_domain_codes(#[case] error: ResolveError, #[case] code: ErrorCode) {
        assert_eq!(map_resolve_error(error).code(), code);
    }
}

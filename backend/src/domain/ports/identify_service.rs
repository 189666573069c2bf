//! Driving port for identity resolution, consumed by inbound adapters.

use async_trait::async_trait;

use crate::domain::contact::ConsolidatedContact;
use crate::domain::Error;

/// Resolve submitted identifiers to a consolidated identity cluster.
///
/// Implementations own the atomicity and retry discipline around the
/// resolution algorithm; callers see a single logical operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentifyService: Send + Sync {
    /// Locate or create the cluster owning the submitted identifiers and
    /// return its consolidated view.
    async fn identify(
        &self,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Result<ConsolidatedContact, Error>;
}

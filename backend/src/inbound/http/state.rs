//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::IdentifyService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Identity resolution use-case.
    pub identify: Arc<dyn IdentifyService>,
}

impl HttpState {
    /// Create the handler state from port implementations.
    pub fn new(identify: Arc<dyn IdentifyService>) -> Self {
        Self { identify }
    }
}

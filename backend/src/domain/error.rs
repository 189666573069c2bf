//! Domain-level error type.
//!
//! Transport agnostic: inbound adapters map these errors to HTTP responses;
//! nothing in the domain knows about status codes or wire envelopes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or carries no usable identifier.
    InvalidRequest,
    /// The contact store is unreachable or persistently contended.
    ServiceUnavailable,
    /// An unexpected failure, including stored-data invariant violations.
    InternalError,
}

/// Domain error payload carried from services to inbound adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

impl Error {
    /// Create an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Caller error: malformed or unusable request.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// The backing store cannot be reached right now.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Unexpected internal failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Error::invalid_request("missing identifiers"), ErrorCode::InvalidRequest)]
    #[case(Error::service_unavailable("pool exhausted"), ErrorCode::ServiceUnavailable)]
    #[case(Error::internal("corrupt cluster"), ErrorCode::InternalError)]
    fn constructors_set_codes(#[case] error: Error, #[case] code: ErrorCode) {
        assert_eq!(error.code(), code);
    }

    #[rstest]
    fn display_uses_the_message() {
        let error = Error::invalid_request("missing identifiers");
        assert_eq!(error.to_string(), "missing identifiers");
    }

    #[rstest]
    fn serialises_with_snake_case_code() {
        let error = Error::invalid_request("bad");
        let json = serde_json::to_value(&error).expect("serialises");
        assert_eq!(json["code"], "invalid_request");
        assert_eq!(json["message"], "bad");
    }
}

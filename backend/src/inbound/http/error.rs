//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while giving every endpoint the
//! same wire envelope: `{"error": <category>, "message": <detail>}` with 400
//! for caller errors and 500 for everything else.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Wire envelope for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Failure category: `"Bad request"` or `"Internal server error"`.
    #[schema(example = "Bad request")]
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        // The wire contract admits only 400 and 500; store unavailability is
        // not distinguished from other internal failures on this surface.
        ErrorCode::ServiceUnavailable | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn category_for(status: StatusCode) -> &'static str {
    if status == StatusCode::BAD_REQUEST {
        "Bad request"
    } else {
        "Internal server error"
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.code(), message = self.message(), "request failed");
        }
        HttpResponse::build(status).json(ErrorBody {
            error: category_for(status).to_owned(),
            message: self.message().to_owned(),
        })
    }
}

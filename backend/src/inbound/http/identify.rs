//! Identify API handler.
//!
//! ```text
//! POST /identify {"email":"a@x.com","phoneNumber":"111"}
//! ```
//!
//! Validates identifier syntax, then delegates to the identify port. At
//! least one of the two fields must be present and non-empty.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ConsolidatedContact, Error};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{is_valid_email, is_valid_phone_number, normalise};
use crate::inbound::http::ApiResult;

/// Identify request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
    /// Email address to resolve, if known.
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    /// Phone number to resolve, if known.
    #[schema(example = "111222333")]
    pub phone_number: Option<String>,
}

/// Identify response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdentifyResponse {
    /// Consolidated view of the owning cluster.
    pub contact: ConsolidatedContact,
}

/// Normalise and validate the submitted identifiers.
fn validated_identifiers(
    request: IdentifyRequest,
) -> Result<(Option<String>, Option<String>), Error> {
    let email = normalise(request.email);
    let phone_number = normalise(request.phone_number);

    if email.is_none() && phone_number.is_none() {
        return Err(Error::invalid_request(
            "at least one of email or phoneNumber must be provided",
        ));
    }
    if let Some(value) = &email {
        if !is_valid_email(value) {
            return Err(Error::invalid_request("email is not a valid address"));
        }
    }
    if let Some(value) = &phone_number {
        if !is_valid_phone_number(value) {
            return Err(Error::invalid_request("phoneNumber is not a valid phone number"));
        }
    }
    Ok((email, phone_number))
}

/// Resolve submitted identifiers to their identity cluster.
#[utoipa::path(
    post,
    path = "/identify",
    request_body = IdentifyRequest,
    responses(
        (status = 200, description = "Consolidated contact", body = IdentifyResponse),
        (status = 400, description = "Bad request", body = crate::inbound::http::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::inbound::http::ErrorBody)
    ),
    tags = ["identify"],
    operation_id = "identify"
)]
#[tracing::instrument(name = "identify_request", skip_all)]
#[post("/identify")]
pub async fn identify(
    state: web::Data<HttpState>,
    payload: web::Json<IdentifyRequest>,
) -> ApiResult<web::Json<IdentifyResponse>> {
    let (email, phone_number) = validated_identifiers(payload.into_inner())?;
    let contact = state.identify.identify(email, phone_number).await?;
    Ok(web::Json(IdentifyResponse { contact }))
}

#[cfg(test)]
#[path = "identify_tests.rs"]
mod tests;

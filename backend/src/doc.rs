//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the identify endpoint and the health probes. The generated document backs
//! Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::ConsolidatedContact;
use crate::inbound::http::identify::{IdentifyRequest, IdentifyResponse};
use crate::inbound::http::ErrorBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contact identity resolution API",
        description = "Resolves submitted emails and phone numbers to consolidated contact clusters."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::identify::identify,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        IdentifyRequest,
        IdentifyResponse,
        ConsolidatedContact,
        ErrorBody,
    )),
    tags(
        (name = "identify", description = "Identity resolution"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_contains_the_identify_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/identify"));
        assert!(doc.paths.paths.contains_key("/readyz"));
        assert!(doc.paths.paths.contains_key("/livez"));
    }
}

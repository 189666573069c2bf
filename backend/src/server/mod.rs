//! Server construction and wiring.
//!
//! Builds the connection pool, wires the Diesel-backed identify service into
//! the HTTP state, and runs the actix server. Connection lifecycle is owned
//! here, never by the resolver.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::identify::identify;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{DbPool, DieselIdentifyService};
#[cfg(debug_assertions)]
use backend::ApiDoc;

/// Build the pool and serve until shutdown.
///
/// # Errors
///
/// Returns an error when the pool cannot be built or the listen address
/// cannot be bound.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let pool = DbPool::new(config.pool().clone())
        .await
        .map_err(std::io::Error::other)?;

    let http_state = web::Data::new(HttpState::new(Arc::new(DieselIdentifyService::new(pool))));
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .service(identify)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr())?;

    // Fail the liveness probe as soon as shutdown starts, so load balancers
    // stop routing to this instance while actix drains in-flight requests.
    let drain_state = health_state.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            drain_state.mark_unhealthy();
        }
    });

    health_state.mark_ready();
    server.run().await
}

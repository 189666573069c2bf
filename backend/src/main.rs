//! Service entry-point: configuration, migrations, and server start.

mod server;

use std::net::SocketAddr;

use clap::Parser;
use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::outbound::persistence::PoolConfig;
use server::ServerConfig;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Contact identity resolution service.
#[derive(Debug, Parser)]
#[command(name = "backend", about)]
struct Cli {
    /// Address and port to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: SocketAddr,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Maximum number of connections in the database pool.
    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 10)]
    database_pool_size: u32,
}

/// Apply pending migrations before accepting traffic.
async fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url)
            .map_err(|e| std::io::Error::other(format!("connect for migrations: {e}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(format!("run migrations: {e}")))
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();

    run_migrations(&cli.database_url).await?;
    info!(bind_addr = %cli.bind_addr, "starting contact identity service");

    let pool = PoolConfig::new(&cli.database_url).with_max_size(cli.database_pool_size);
    server::run(ServerConfig::new(cli.bind_addr, pool)).await
}

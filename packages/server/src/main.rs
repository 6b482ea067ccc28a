use std::net::SocketAddr;

use anyhow::Context;
use tracing::{Level, info};

use quizmatics::config::AppConfig;
use quizmatics::database::init_db;
use quizmatics::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    let level: Level = config
        .server
        .log_level
        .parse()
        .with_context(|| format!("invalid log level {:?}", config.server.log_level))?;
    tracing_subscriber::fmt().with_max_level(level).init();

    let db = init_db(&config.database)
        .await
        .context("failed to initialise the database")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;
    let app = quizmatics::build_router(AppState { db, config });

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

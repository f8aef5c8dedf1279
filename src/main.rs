// src/main.rs

use cs_revision::config::Config;
use cs_revision::routes;
use cs_revision::state::AppState;
use cs_revision::store::{MemoryQuestionStore, PgQuestionStore};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let state = match config.database_url.as_deref() {
        Some(url) => AppState::new(PgQuestionStore::connect(url).await?, config.clone()),
        None => {
            tracing::warn!("DATABASE_URL not set, questions are kept in memory and lost on exit");
            AppState::new(MemoryQuestionStore::new(), config.clone())
        }
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}

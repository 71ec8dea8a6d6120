mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use scribe_api::AppStateInner;
use scribe_core::{Argon2Hasher, Blog, Sha256Hasher};
use scribe_db::Database;

use crate::config::{Config, HasherKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe=debug,scribe_api=debug,scribe_core=debug,scribe_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Database::open(&config.db_path)?;

    let blog = match config.hasher {
        HasherKind::Argon2 => Blog::new(db, Argon2Hasher::default()),
        HasherKind::Sha256 => Blog::new(db, Sha256Hasher),
    };
    info!(hasher = ?config.hasher, "password hashing configured");

    let state = Arc::new(AppStateInner {
        blog,
        jwt_secret: config.jwt_secret,
    });

    let app = scribe_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Scribe server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod auth;
mod config;
mod db;
mod enrich;
mod entities;
mod error;
mod genres;
mod models;
mod routes;
mod slug;
mod store;
mod templates;
mod tmdb;

use std::sync::Arc;

use crate::{config::Config, genres::GenreCache, store::MovieStore, tmdb::TmdbClient};

pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
    pub tmdb: Arc<TmdbClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,reelvault=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("reelvault/0.1")
        .timeout(tmdb::METADATA_TIMEOUT)
        .build()?;

    let store = match db::connect_and_migrate(db::connect_options(&config)).await {
        Ok(conn) => MovieStore::new(conn, config.db_read_timeout),
        Err(err) => {
            tracing::warn!(error = %err, "database unreachable, will reconnect on demand");
            MovieStore::lazy(db::connect_options(&config), config.db_read_timeout)
        },
    };

    let genres = Arc::new(GenreCache::default());
    let tmdb = TmdbClient::new(
        http,
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_image_base.clone(),
        config.tmdb_rps,
        genres.clone(),
    );

    // Written once here, read-only once requests are served.
    genres.fetch_genres(&tmdb).await;

    tracing::info!(
        store = store.is_connected(),
        tmdb = config.has_tmdb_credential(),
        genres = genres.is_loaded(),
        "startup complete"
    );

    let state = Arc::new(AppState { config: config.clone(), store, tmdb: Arc::new(tmdb) });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

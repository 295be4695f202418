use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub db_connect_timeout: Duration,
    pub db_read_timeout: Duration,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base: String,
    pub tmdb_rps: u32,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://reelvault.db?mode=rwc".to_string());

        let db_connect_timeout_secs: u64 = std::env::var("DB_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let db_read_timeout_secs: u64 =
            std::env::var("DB_READ_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(10);

        let tmdb_api_key = std::env::var("TMDB_API_KEY").unwrap_or_default().trim().to_string();
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_base = std::env::var("TMDB_IMAGE_BASE")
            .unwrap_or_else(|_| "https://image.tmdb.org/t/p/w500".to_string());

        let tmdb_rps: u32 =
            std::env::var("TMDB_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_default();

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            db_connect_timeout: Duration::from_secs(db_connect_timeout_secs),
            db_read_timeout: Duration::from_secs(db_read_timeout_secs),
            tmdb_api_key,
            tmdb_base_url,
            tmdb_image_base,
            tmdb_rps,
            admin_username,
            admin_password,
        })
    }

    pub fn has_tmdb_credential(&self) -> bool {
        !self.tmdb_api_key.is_empty()
    }
}

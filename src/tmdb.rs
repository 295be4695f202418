use std::{collections::HashMap, num::NonZeroU32, sync::Arc, time::Duration};

use anyhow::Context;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{enrich::MetadataSource, genres::GenreCache, models::MovieMetadata};

/// Upper bound on every call to TMDB.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base: String,
    timeout: Duration,
    genres: Arc<GenreCache>,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        image_base: String,
        rps: u32,
        genres: Arc<GenreCache>,
    ) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no TMDB_API_KEY provided, metadata enrichment disabled");
        }

        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        Self {
            client,
            api_key: api_key.trim().to_string(),
            base_url,
            image_base,
            timeout: METADATA_TIMEOUT,
            genres,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn genres(&self) -> &GenreCache {
        &self.genres
    }

    /// Fetches TMDB's movie genre table.
    pub async fn list_genres(&self) -> anyhow::Result<HashMap<u32, String>> {
        let resp: GenreListResponse = self.get_json("/genre/movie/list", &[]).await?;
        Ok(resp.genres.into_iter().map(|g| (g.id, g.name)).collect())
    }

    async fn lookup(&self, title: &str) -> anyhow::Result<MovieMetadata> {
        let search: SearchResponse = self.get_json("/search/movie", &[("query", title)]).await?;

        let Some(hit) = search.results.into_iter().next() else {
            debug!(title, "no TMDB match");
            return Ok(MovieMetadata::default());
        };

        let details: MovieDetails = self.get_json(&format!("/movie/{}", hit.id), &[]).await?;

        let year: String = details.release_date.unwrap_or_default().chars().take(4).collect();

        let poster = details
            .poster_path
            .filter(|p| !p.trim().is_empty())
            .map(|p| format!("{}{}", self.image_base, p))
            .unwrap_or_default();

        let genre = match details.genres {
            Some(genres) if !genres.is_empty() => {
                genres.into_iter().map(|g| g.name).collect::<Vec<_>>().join(", ")
            },
            _ => self.genres.names_for(&hit.genre_ids).join(", "),
        };

        Ok(MovieMetadata { year, plot: details.overview.unwrap_or_default(), poster, genre })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .with_context(|| format!("request {path}"))?
            .error_for_status()
            .with_context(|| format!("status {path}"))?;

        resp.json().await.with_context(|| format!("decode {path}"))
    }
}

#[async_trait::async_trait]
impl MetadataSource for TmdbClient {
    fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_and_fetch(&self, title: &str) -> MovieMetadata {
        if !self.has_credential() || title.trim().is_empty() {
            return MovieMetadata::default();
        }

        match self.lookup(title.trim()).await {
            Ok(meta) => {
                if meta.is_empty() {
                    debug!(title, "TMDB returned no usable fields");
                }
                meta
            },
            Err(err) => {
                warn!(title, error = %format!("{err:#}"), "TMDB lookup failed");
                MovieMetadata::default()
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchMovie>,
}

#[derive(Debug, Deserialize)]
struct SearchMovie {
    id: u64,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    genres: Option<Vec<Genre>>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    id: u32,
    name: String,
}

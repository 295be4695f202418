use std::{collections::HashMap, sync::OnceLock};

use tracing::{info, warn};

use crate::{enrich::MetadataSource, tmdb::TmdbClient};

/// TMDB genre id to display name, written at most once during startup and
/// read without locking afterwards.
#[derive(Debug, Default)]
pub struct GenreCache {
    table: OnceLock<HashMap<u32, String>>,
}

impl GenreCache {
    /// Loads the genre table. Does nothing if the table is already loaded or
    /// no credential is configured; failures are logged and leave the cache
    /// empty.
    pub async fn fetch_genres(&self, tmdb: &TmdbClient) {
        if self.table.get().is_some() || !tmdb.has_credential() {
            return;
        }

        match tmdb.list_genres().await {
            Ok(table) => {
                let count = table.len();
                if self.table.set(table).is_ok() {
                    info!(count, "genre cache loaded");
                }
            },
            Err(err) => warn!(error = %format!("{err:#}"), "failed to load TMDB genres"),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.table.get()?.get(&id).map(String::as_str)
    }

    /// Names for `ids`, skipping ids the table does not know.
    pub fn names_for(&self, ids: &[u32]) -> Vec<String> {
        ids.iter().filter_map(|id| self.name(*id)).map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use crate::tmdb::tests::{client, serve};

    fn counting_genre_service(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/genre/movie/list",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "genres": [{"id": 18, "name": "Drama"}, {"id": 35, "name": "Comedy"}]
                    }))
                }
            }),
        )
    }

    #[tokio::test]
    async fn loads_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(counting_genre_service(hits.clone())).await;
        let tmdb = client(base, "secret");

        tmdb.genres().fetch_genres(&tmdb).await;
        tmdb.genres().fetch_genres(&tmdb).await;

        assert!(tmdb.genres().is_loaded());
        assert_eq!(tmdb.genres().name(18), Some("Drama"));
        assert_eq!(tmdb.genres().names_for(&[35, 404, 18]), ["Comedy", "Drama"]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn skipped_without_credential() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(counting_genre_service(hits.clone())).await;
        let tmdb = client(base, "");

        tmdb.genres().fetch_genres(&tmdb).await;

        assert!(!tmdb.genres().is_loaded());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_leaves_cache_empty() {
        let router =
            Router::new().fallback(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") });
        let base = serve(router).await;
        let tmdb = client(base, "secret");

        tmdb.genres().fetch_genres(&tmdb).await;

        assert!(!tmdb.genres().is_loaded());
        assert_eq!(tmdb.genres().name(18), None);
        assert!(tmdb.genres().names_for(&[18]).is_empty());
    }
}

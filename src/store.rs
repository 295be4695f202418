use std::{future::Future, sync::Arc, time::Duration};

use sea_orm::{
    ColumnTrait, ConnectOptions, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{
    db,
    entities::movie,
    error::{StoreError, StoreResult},
    models::{MovieRecord, MovieSubmission},
    slug,
};

/// Persistence for movie records.
///
/// Reads never fail: an unreachable or erroring store yields empty results.
/// Writes report every failure to the caller.
#[derive(Clone, Debug)]
pub struct MovieStore {
    db: Arc<OnceCell<DatabaseConnection>>,
    reconnect: Option<ConnectOptions>,
    read_timeout: Duration,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection, read_timeout: Duration) -> Self {
        Self { db: Arc::new(OnceCell::new_with(Some(db))), reconnect: None, read_timeout }
    }

    /// A store that connects on first use and keeps trying on later
    /// operations until a connection succeeds.
    pub fn lazy(opts: ConnectOptions, read_timeout: Duration) -> Self {
        Self { db: Arc::new(OnceCell::new()), reconnect: Some(opts), read_timeout }
    }

    /// A store with no backing connection and no way to get one.
    #[cfg(test)]
    pub fn disconnected(read_timeout: Duration) -> Self {
        Self { db: Arc::new(OnceCell::new()), reconnect: None, read_timeout }
    }

    pub fn is_connected(&self) -> bool {
        self.db.initialized()
    }

    /// The live connection, connecting first if the store was created lazily.
    /// Each attempt is bounded by the read timeout.
    async fn conn(&self) -> StoreResult<&DatabaseConnection> {
        if let Some(db) = self.db.get() {
            return Ok(db);
        }
        let Some(opts) = &self.reconnect else {
            return Err(StoreError::Unavailable);
        };

        self.db
            .get_or_try_init(|| async {
                let db = self.bounded(db::connect_and_migrate(opts.clone())).await?;
                info!("database connection established");
                Ok::<_, StoreError>(db)
            })
            .await
    }

    /// Validates the submission, derives a fresh slug and persists the record.
    pub async fn create(&self, submission: MovieSubmission) -> StoreResult<MovieRecord> {
        if submission.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let slug = slug::generate(&submission.title);
        let record = submission.into_record(slug);
        self.insert(&record).await?;
        info!(slug = %record.slug, title = %record.title, "movie created");
        Ok(record)
    }

    async fn insert(&self, record: &MovieRecord) -> StoreResult<()> {
        let db = self.conn().await?;

        let model = movie::ActiveModel {
            id: Default::default(),
            slug: Set(record.slug.clone()),
            title: Set(record.title.clone()),
            year: Set(record.year.clone()),
            genre: Set(record.genre.clone()),
            plot: Set(record.plot.clone()),
            poster: Set(record.poster.clone()),
            telegram_link: Set(record.telegram_link.clone()),
            terabox_link: Set(record.terabox_link.clone()),
            created_at: Set(jiff::Timestamp::now().as_second()),
        };

        self.bounded(movie::Entity::insert(model).exec(db)).await.map_err(|err| match err {
            StoreError::Db(db_err)
                if matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                StoreError::DuplicateSlug(record.slug.clone())
            },
            other => other,
        })?;

        Ok(())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Option<MovieRecord> {
        let found = match self.conn().await {
            Ok(db) => {
                self.bounded(movie::Entity::find().filter(movie::Column::Slug.eq(slug)).one(db))
                    .await
            },
            Err(err) => Err(err),
        };

        match found {
            Ok(model) => model.map(MovieRecord::from),
            Err(err) => {
                warn!(slug, error = %err, "movie lookup failed");
                None
            },
        }
    }

    /// Up to `limit` records, most recently inserted first.
    pub async fn list_recent(&self, limit: u64) -> Vec<MovieRecord> {
        let rows = match self.conn().await {
            Ok(db) => {
                let query = movie::Entity::find()
                    .order_by_desc(movie::Column::CreatedAt)
                    .order_by_desc(movie::Column::Id)
                    .limit(limit);
                self.bounded(query.all(db)).await
            },
            Err(err) => Err(err),
        };

        match rows {
            Ok(rows) => rows.into_iter().map(MovieRecord::from).collect(),
            Err(err) => {
                warn!(error = %err, "listing recent movies failed");
                Vec::new()
            },
        }
    }

    #[cfg(test)]
    pub async fn count(&self) -> StoreResult<u64> {
        use sea_orm::PaginatorTrait;

        let db = self.conn().await?;
        self.bounded(movie::Entity::find().count(db)).await
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T, DbErr>>) -> StoreResult<T> {
        match tokio::time::timeout(self.read_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use sea_orm::TransactionTrait;

    use super::*;

    fn memory_options() -> ConnectOptions {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        opts
    }

    pub(crate) async fn memory_store() -> MovieStore {
        let conn = db::connect_and_migrate(memory_options()).await.unwrap();
        MovieStore::new(conn, Duration::from_secs(5))
    }

    fn submission(title: &str) -> MovieSubmission {
        MovieSubmission { title: title.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn create_then_get_by_slug() {
        let store = memory_store().await;
        let created = store
            .create(MovieSubmission {
                title: "Inception".to_string(),
                year: "2010".to_string(),
                telegram_link: "https://t.me/example".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(created.slug.starts_with("inception-"));

        let fetched = store.get_by_slug(&created.slug).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.plot, "");
        assert_eq!(fetched.terabox_link, "");
    }

    #[tokio::test]
    async fn empty_title_is_rejected_without_write() {
        let store = memory_store().await;

        let err = store.create(submission("   ")).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyTitle));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_slug_is_none() {
        let store = memory_store().await;
        store.create(submission("Heat")).await.unwrap();

        assert_eq!(store.get_by_slug("does-not-exist").await, None);
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected_by_store() {
        let store = memory_store().await;
        let record = MovieRecord {
            slug: "heat-deadbeef".to_string(),
            title: "Heat".to_string(),
            ..Default::default()
        };
        store.insert(&record).await.unwrap();

        let err = store.insert(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug(ref s) if s == "heat-deadbeef"), "{err:?}");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_recent_returns_newest_first() {
        let store = memory_store().await;
        for title in ["One", "Two", "Three", "Four", "Five"] {
            store.create(submission(title)).await.unwrap();
        }

        let titles: Vec<String> =
            store.list_recent(3).await.into_iter().map(|m| m.title).collect();
        assert_eq!(titles, ["Five", "Four", "Three"]);
    }

    #[tokio::test]
    async fn list_recent_on_empty_store() {
        let store = memory_store().await;
        assert!(store.list_recent(20).await.is_empty());
    }

    #[tokio::test]
    async fn disconnected_store_degrades() {
        let store = MovieStore::disconnected(Duration::from_secs(1));

        assert!(store.list_recent(20).await.is_empty());
        assert_eq!(store.get_by_slug("anything").await, None);
        let err = store.create(submission("Inception")).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));
    }

    #[tokio::test]
    async fn bounded_gives_up_on_a_stalled_query() {
        let store = MovieStore { read_timeout: Duration::from_millis(50), ..memory_store().await };

        let err = store.bounded(std::future::pending::<Result<(), DbErr>>()).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout), "{err:?}");
    }

    #[tokio::test]
    async fn reads_degrade_when_the_pool_is_busy() {
        let store = MovieStore { read_timeout: Duration::from_millis(50), ..memory_store().await };
        let heat = store.create(submission("Heat")).await.unwrap();

        // The pool holds a single connection; the open transaction keeps it.
        let txn = store.conn().await.unwrap().begin().await.unwrap();

        let started = std::time::Instant::now();
        assert!(store.list_recent(20).await.is_empty());
        assert_eq!(store.get_by_slug(&heat.slug).await, None);
        assert!(matches!(store.create(submission("Ronin")).await, Err(StoreError::Timeout)));
        assert!(started.elapsed() < Duration::from_secs(5));

        txn.rollback().await.unwrap();
        assert_eq!(store.get_by_slug(&heat.slug).await, Some(heat));
    }

    #[tokio::test]
    async fn lazy_store_connects_on_first_use() {
        let store = MovieStore::lazy(memory_options(), Duration::from_secs(5));
        assert!(!store.is_connected());

        assert!(store.list_recent(20).await.is_empty());
        assert!(store.is_connected());

        let created = store.create(submission("Inception")).await.unwrap();
        assert_eq!(store.list_recent(20).await, [created]);
    }

    #[tokio::test]
    async fn lazy_store_stays_degraded_while_unreachable() {
        let mut opts = ConnectOptions::new("sqlite:///reelvault-missing-dir/none/movies.db");
        opts.connect_timeout(Duration::from_millis(200)).sqlx_logging(false);
        let store = MovieStore::lazy(opts, Duration::from_secs(2));

        assert!(store.list_recent(20).await.is_empty());
        assert_eq!(store.get_by_slug("heat-12345678").await, None);
        assert!(store.create(submission("Heat")).await.is_err());
        assert!(!store.is_connected());
    }
}

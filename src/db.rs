use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr,
    Statement,
};

use crate::config::Config;

pub fn connect_options(config: &Config) -> ConnectOptions {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.connect_timeout(config.db_connect_timeout)
        .acquire_timeout(config.db_connect_timeout)
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);
    opts
}

pub async fn connect_and_migrate(opts: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(opts).await?;

    if db.get_database_backend() == DatabaseBackend::Sqlite {
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}

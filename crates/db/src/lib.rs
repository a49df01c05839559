use std::str::FromStr;

use sqlx::{
    ConnectOptions, Error, Pool, Sqlite, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

pub mod models;
pub mod validator;

#[derive(Clone)]
pub struct DBService {
    pub pool: Pool<Sqlite>,
}

impl DBService {
    /// Connects to `database_url`, creating the file when missing, and applies
    /// the embedded migrations. `log_statements` echoes every SQL statement
    /// through the `log`/`tracing` bridge.
    pub async fn new(database_url: &str, log_statements: bool) -> Result<DBService, Error> {
        let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        if !log_statements {
            options = options.disable_statement_logging();
        }
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        run_migrations(&pool).await?;
        info!(database_url, "database ready");
        Ok(DBService { pool })
    }

    /// Private in-memory database. SQLite gives every connection its own
    /// `:memory:` database, so the pool is pinned to a single connection that
    /// never expires.
    pub async fn new_in_memory() -> Result<DBService, Error> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:")?.disable_statement_logging();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        run_migrations(&pool).await?;
        Ok(DBService { pool })
    }

    /// Waits for checked-out connections to be returned, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database connection closed");
    }
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

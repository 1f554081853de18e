//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Blocking Diesel calls isolated on the tokio blocking pool
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tracing::{debug, info};

use crate::api::{Fact, FactId};
use crate::db::repository::{
    fact_not_found, facts_not_found, ErrorContext, FactRepository, RepositoryError,
    RepositoryResult,
};

mod models;
mod schema;

use models::{FactRow, NewFactRow};
use schema::facts;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_pool_size);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.min_pool_size);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.connection_timeout_sec);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.idle_timeout_sec);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
///
/// Clones share one pool. After [`FactRepository::close`] every call fails
/// with a connection error.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: Arc<RwLock<Option<PgPool>>>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(max_pool_size = config.max_pool_size, "Postgres repository ready");
        Ok(Self {
            pool: Arc::new(RwLock::new(Some(pool))),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run a Diesel operation on a pooled connection off the async runtime.
    ///
    /// Failures are reported as-is; there is no retry.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.read().clone().ok_or_else(|| {
            RepositoryError::connection_with_context(
                "Connection pool is closed",
                ErrorContext::new("get_connection"),
            )
        })?;

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection"),
                )
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

#[async_trait]
impl FactRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_fact(&self, fact_id: FactId) -> RepositoryResult<String> {
        self.with_conn(move |conn| {
            facts::table
                .find(fact_id.value())
                .select(facts::fact)
                .first::<String>(conn)
                .optional()
                .map_err(|e| map_diesel_error(e).with_operation("get_fact"))?
                .ok_or_else(|| fact_not_found("get_fact", fact_id))
        })
        .await
    }

    async fn get_facts(&self, ids: Option<&[FactId]>) -> RepositoryResult<Vec<Fact>> {
        let ids: Option<Vec<FactId>> = ids.map(<[FactId]>::to_vec);
        self.with_conn(move |conn| {
            let mut query = facts::table
                .select(FactRow::as_select())
                .order(facts::id.asc())
                .into_boxed();
            if let Some(ref ids) = ids {
                let raw: Vec<i64> = ids.iter().map(FactId::value).collect();
                query = query.filter(facts::id.eq_any(raw));
            }

            let rows = query
                .load::<FactRow>(conn)
                .map_err(|e| map_diesel_error(e).with_operation("get_facts"))?;
            debug!(count = rows.len(), "Loaded fact rows");

            match ids {
                Some(ids) if rows.is_empty() => Err(facts_not_found(&ids)),
                _ => Ok(rows.into_iter().map(Fact::from).collect()),
            }
        })
        .await
    }

    async fn insert_fact(&self, text: &str) -> RepositoryResult<Fact> {
        let new_row = NewFactRow {
            fact: text.to_string(),
        };
        self.with_conn(move |conn| {
            diesel::insert_into(facts::table)
                .values(&new_row)
                .returning(FactRow::as_returning())
                .get_result::<FactRow>(conn)
                .map(Fact::from)
                .map_err(|e| map_diesel_error(e).with_operation("insert_fact"))
        })
        .await
    }

    async fn update_fact(&self, fact_id: FactId, text: &str) -> RepositoryResult<()> {
        let text = text.to_string();
        self.with_conn(move |conn| {
            let updated = diesel::update(facts::table.find(fact_id.value()))
                .set(facts::fact.eq(text))
                .execute(conn)
                .map_err(|e| map_diesel_error(e).with_operation("update_fact"))?;
            if updated == 0 {
                return Err(fact_not_found("update_fact", fact_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_fact(&self, fact_id: FactId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(facts::table.find(fact_id.value()))
                .execute(conn)
                .map_err(|e| map_diesel_error(e).with_operation("delete_fact"))?;
            if deleted == 0 {
                return Err(fact_not_found("delete_fact", fact_id));
            }
            Ok(())
        })
        .await
    }

    async fn close(&self) -> RepositoryResult<()> {
        let Some(pool) = self.pool.write().take() else {
            return Ok(());
        };
        let state = pool.state();
        info!(
            connections = state.connections,
            idle_connections = state.idle_connections,
            "Releasing Postgres connection pool"
        );
        // Connections still checked out by running queries close when those
        // queries return their handle.
        drop(pool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_url_keeps_pool_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/facts");
        assert_eq!(config.database_url, "postgres://localhost/facts");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
        assert_eq!(config.connection_timeout_sec, 30);
        assert_eq!(config.idle_timeout_sec, 600);
    }
}

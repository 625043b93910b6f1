//! MySQL connection pool
//!
//! Sized and timed from [`DatabaseConfig`]. Statements are logged at debug,
//! anything slower than [`SLOW_STATEMENT_THRESHOLD`] at warn.

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySqlPool,
};
use std::{fmt, str::FromStr, time::Duration};
use tracing::log::LevelFilter;

use orchid_shared::DatabaseConfig;

use crate::InfrastructureError;

pub const SLOW_STATEMENT_THRESHOLD: Duration = Duration::from_secs(1);

/// Shared handle to the pool plus the settings it was built from
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
    config: DatabaseConfig,
}

impl DatabasePool {
    /// Connects eagerly so a bad URL or unreachable server fails at startup.
    ///
    /// ```no_run
    /// use orchid_infra::DatabasePool;
    /// use orchid_shared::DatabaseConfig;
    ///
    /// # async fn run() -> Result<(), orchid_infra::InfrastructureError> {
    /// let pool = DatabasePool::new(DatabaseConfig::new("mysql://orchid@localhost/orchid")).await?;
    /// pool.run_migrations().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let options = Self::connect_options(&config)?;

        tracing::info!(
            max_connections = config.max_connections,
            connect_timeout_secs = config.connect_timeout,
            "Connecting to MySQL"
        );

        let pool = MySqlPoolOptions::new()
            .min_connections(1)
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout)))
            .max_lifetime(Some(Duration::from_secs(config.max_lifetime)))
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "MySQL connection failed");
                InfrastructureError::Database(e)
            })?;

        Ok(Self { pool, config })
    }

    /// Parses the URL and attaches statement logging
    pub(crate) fn connect_options(
        config: &DatabaseConfig,
    ) -> Result<MySqlConnectOptions, InfrastructureError> {
        let options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

        Ok(options
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, SLOW_STATEMENT_THRESHOLD))
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Round-trips `SELECT 1`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let value: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Database health check failed");
                InfrastructureError::Database(e)
            })?;

        Ok(value == 1)
    }

    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    pub async fn close(&self) {
        tracing::info!(stats = %self.get_statistics(), "Closing database pool");
        self.pool.close().await;
    }

    /// Applies the migrations embedded from `infra/migrations`
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatistics {
    pub connections: u32,
    pub idle_connections: usize,
    pub max_connections: u32,
}

impl fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}

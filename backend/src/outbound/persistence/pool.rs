//! Shared `bb8` pool of `diesel-async` PostgreSQL connections.
//!
//! The `clinica` server uses [`DbPool::lazy`] so it boots while PostgreSQL is
//! down and the login page can say so. `provision-doctor` uses
//! [`DbPool::new`] and gives up at once if the database is unreachable.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Pool failures, carried as text so ports can map them without bb8 types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available before the checkout timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// bb8's description of the failure.
        message: String,
    },

    /// The eager pool could not open its first connections.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// bb8's description of the failure.
        message: String,
    },
}

impl PoolError {
    /// Checkout failure with `message`.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Build failure with `message`.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Sizing and timeout knobs for [`DbPool`].
///
/// Starts at ten connections with two kept idle and a thirty second
/// checkout timeout.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Settings for the database at `database_url`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(2),
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Idle connections bb8 keeps open; `None` opens them only on demand.
    #[must_use]
    pub const fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// How long a checkout waits before failing.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Cloneable handle to the clinic's connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool and its idle connections before returning.
    ///
    /// # Errors
    ///
    /// [`PoolError::Build`] when PostgreSQL rejects or never answers.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(Self::manager(&config))
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Build the pool without touching the database.
    #[must_use]
    pub fn lazy(config: &PoolConfig) -> Self {
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build_unchecked(Self::manager(config));
        Self { inner }
    }

    fn manager(config: &PoolConfig) -> AsyncDieselConnectionManager<AsyncPgConnection> {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url)
    }

    /// Borrow a connection for one unit of work.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] after the configured timeout, which is also
    /// how an unreachable database shows up on a lazy pool.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

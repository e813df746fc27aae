// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite store keeping catalog, groups, ledger and assignments in one database.
use std::sync::Arc;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, migrate};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tracing::warn;

use crate::traits::Transaction;

/// Configures and opens a [`SqliteStore`].
///
/// Defaults to a private in-memory database with the stewardship tables migrated.
#[derive(Debug)]
pub struct SqliteStoreBuilder {
    url: String,
    max_connections: u32,
    create_database: bool,
    run_migrations: bool,
}

impl Default for SqliteStoreBuilder {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 16,
            create_database: true,
            run_migrations: true,
        }
    }
}

impl SqliteStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an in-memory database with a random name.
    ///
    /// sqlx shares unnamed in-memory databases between pools of the same process, see
    /// https://github.com/launchbadge/sqlx/issues/2510. Tests running in parallel need their own.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn random_memory_url(mut self) -> Self {
        self.url = format!(
            "sqlite://stewardship{}?mode=memory&cache=private",
            rand::random::<u32>()
        );
        self
    }

    pub fn database_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Create the database file when it is missing.
    pub fn create_database(mut self, create_database: bool) -> Self {
        self.create_database = create_database;
        self
    }

    /// Apply pending migrations of the stewardship tables when opening the store.
    pub fn run_migrations(mut self, run_migrations: bool) -> Self {
        self.run_migrations = run_migrations;
        self
    }

    pub async fn build(self) -> Result<SqliteStore, SqliteError> {
        if self.create_database && !Sqlite::database_exists(&self.url).await? {
            Sqlite::create_database(&self.url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.url)
            .await?;

        if self.run_migrations {
            migrate!().run(&pool).await?;
        }

        Ok(SqliteStore::new(pool))
    }
}

/// SQLite store with a connection pool and at most one open transaction.
///
/// Clones share the pool and the open transaction. Beginning a transaction hands out a
/// [`TransactionPermit`], every other caller of `begin` waits until that permit was given back
/// through `commit` or `rollback`. This way two concurrent trust expressions for the same trustee
/// can't both observe the trust count from before the grant.
///
/// A transaction whose permit was dropped without commit or rollback, for example because the
/// future of the operation was cancelled, is rolled back by the next `begin`.
///
/// Writes require an open transaction. Reads go through the open transaction when there is one,
/// so they see the uncommitted changes of the running operation, and through the pool otherwise.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    tx: Arc<Mutex<Option<sqlx::Transaction<'static, Sqlite>>>>,
    pool: SqlitePool,
    semaphore: Arc<Semaphore>,
}

impl SqliteStore {
    fn new(pool: SqlitePool) -> Self {
        Self {
            tx: Arc::default(),
            pool,
            // SQLite allows only one writer at a time.
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    /// Run a write inside the open transaction.
    ///
    /// Fails with [`SqliteError::TransactionMissing`] when `begin` wasn't called before. Rolling
    /// back after a failed write is up to the caller.
    pub async fn tx<F, R>(&self, f: F) -> Result<R, SqliteError>
    where
        F: AsyncFnOnce(&mut SqliteConnection) -> Result<R, SqliteError>,
    {
        let mut tx = self.tx.lock().await;
        let tx = tx.as_mut().ok_or(SqliteError::TransactionMissing)?;
        f(&mut **tx).await
    }

    /// Run a read, inside the open transaction if there is one.
    pub async fn read<F, R>(&self, f: F) -> Result<R, SqliteError>
    where
        F: AsyncFnOnce(&mut SqliteConnection) -> Result<R, SqliteError>,
    {
        let mut tx = self.tx.lock().await;
        match tx.as_mut() {
            Some(tx) => f(&mut **tx).await,
            None => {
                let mut conn = self.pool.acquire().await?;
                f(&mut *conn).await
            }
        }
    }

    async fn finish(&self, permit: TransactionPermit, commit: bool) -> Result<(), SqliteError> {
        let Some(tx) = self.tx.lock().await.take() else {
            panic!("transaction permit was handed out without a transaction")
        };

        let result = if commit {
            tx.commit().await
        } else {
            tx.rollback().await
        };

        // The permit is released in both cases, also when finishing failed.
        drop(permit);
        Ok(result?)
    }
}

impl Transaction for SqliteStore {
    type Error = SqliteError;

    type Permit = TransactionPermit;

    async fn begin(&self) -> Result<TransactionPermit, SqliteError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("if semaphore is closed then the whole struct is gone as well");

        let mut tx = self.tx.lock().await;

        // The previous holder was dropped before it could commit or roll back.
        if let Some(abandoned) = tx.take() {
            warn!("rolling back transaction of a cancelled operation");
            abandoned.rollback().await?;
        }

        tx.replace(self.pool.begin().await?);

        Ok(TransactionPermit(permit))
    }

    async fn rollback(&self, permit: TransactionPermit) -> Result<(), SqliteError> {
        self.finish(permit, false).await
    }

    async fn commit(&self, permit: TransactionPermit) -> Result<(), SqliteError> {
        self.finish(permit, true).await
    }
}

/// Proof of holding the transaction of a [`SqliteStore`].
#[allow(unused)]
#[derive(Debug)]
pub struct TransactionPermit(OwnedSemaphorePermit);

#[derive(Debug, Error)]
pub enum SqliteError {
    /// A write was attempted without calling `begin` first.
    #[error("no transaction was started")]
    TransactionMissing,

    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A stored value doesn't fit the model anymore.
    #[error("could not decode '{0}' from the database: {1}")]
    Decode(String, DecodeError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown variant")]
    FromStr,

    #[error("integer out of range")]
    OutOfRange,
}

/// Decode an enum stored as text.
pub(crate) fn decode_str<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, SqliteError> {
    value
        .parse()
        .map_err(|_| SqliteError::Decode(field.to_string(), DecodeError::FromStr))
}

/// Decode a counter stored as signed integer.
pub(crate) fn decode_u32(field: &str, value: i64) -> Result<u32, SqliteError> {
    u32::try_from(value).map_err(|_| SqliteError::Decode(field.to_string(), DecodeError::OutOfRange))
}

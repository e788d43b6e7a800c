//! Ownership of the database handle.
//!
//! The engine never keeps an ambient connection around. Every unit of work
//! acquires a [`Lease`] from [`Storage`] and releases it when done: a
//! per-operation lease opens its own connection and closes it on release, a
//! shared lease borrows the connection that lives as long as the engine.

use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use serde::Deserialize;

use crate::ResultEngine;

/// Where the `financial_data` table lives.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(PathBuf),
}

impl Database {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::Sqlite(path.into())
    }

    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::Sqlite(path) => format!("sqlite:{}?mode=rwc", path.display()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Memory => None,
            Self::Sqlite(path) => Some(path),
        }
    }
}

pub(crate) async fn connect(database: &Database) -> ResultEngine<DatabaseConnection> {
    let mut options = ConnectOptions::new(database.url());
    options.sqlx_logging(false);
    if *database == Database::Memory {
        // Every pooled connection would get its own empty in-memory database.
        options.max_connections(1).min_connections(1);
    }
    Ok(SeaDatabase::connect(options).await?)
}

#[derive(Debug)]
pub(crate) enum Storage {
    /// Open, use and close a connection for every operation.
    PerOperation(Database),
    /// One connection for the lifetime of the engine.
    Shared(DatabaseConnection),
}

impl Storage {
    pub(crate) async fn acquire(&self) -> ResultEngine<Lease<'_>> {
        match self {
            Self::PerOperation(database) => {
                tracing::debug!("opening connection to {}", database.url());
                Ok(Lease::Owned(connect(database).await?))
            }
            Self::Shared(db) => Ok(Lease::Borrowed(db)),
        }
    }
}

pub(crate) enum Lease<'a> {
    Owned(DatabaseConnection),
    Borrowed(&'a DatabaseConnection),
}

impl Lease<'_> {
    pub(crate) async fn release(self) -> ResultEngine<()> {
        if let Self::Owned(db) = self {
            tracing::debug!("closing connection");
            db.close().await?;
        }
        Ok(())
    }
}

impl Deref for Lease<'_> {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Owned(db) => db,
            Self::Borrowed(db) => db,
        }
    }
}

/// Run a block with a leased connection, releasing it afterwards whether or
/// not the block succeeded.
macro_rules! with_db {
    ($self:expr, |$db:ident| $body:expr) => {{
        let lease = $self.storage.acquire().await?;
        let result = {
            let $db: &sea_orm::DatabaseConnection = &lease;
            $body
        };
        let released = lease.release().await;
        let value = result?;
        released?;
        Ok::<_, crate::EngineError>(value)
    }};
}

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($db:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin($db).await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_db;
pub(crate) use with_tx;

//! Storage and bookkeeping logic for AutoBooks.
//!
//! The [`Engine`] owns the `financial_data` table: it migrates the schema at
//! startup and then saves, lists, deletes and exports [`FinancialRecord`]s.
//! What it does at startup and how it treats input depends on the
//! [`Variant`] it was built with.
use std::io::ErrorKind;

use migration::{Migrator, MigratorTrait};

pub use error::EngineError;
pub use money::Amount;
pub use ops::{
    ChartPoint, ChartSeries, DateRange, EntryForm, ExportRequest, ExportSummary, TableView,
};
pub use records::{DATE_FORMAT, FinancialRecord, NewRecord, parse_date};
pub use storage::Database;
pub use variant::Variant;

use storage::Storage;

mod error;
mod money;
mod ops;
mod records;
mod storage;
mod variant;

type ResultEngine<T> = Result<T, EngineError>;

/// Database file used when the builder is not given one.
pub const DEFAULT_DATABASE_PATH: &str = "accounting.db";

#[derive(Debug)]
pub struct Engine {
    variant: Variant,
    database: Database,
    storage: Storage,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

/// The builder for `Engine`
#[derive(Debug, Default)]
pub struct EngineBuilder {
    database: Option<Database>,
    variant: Variant,
}

impl EngineBuilder {
    /// Pass the database location (default: [`DEFAULT_DATABASE_PATH`]).
    pub fn database(mut self, database: Database) -> EngineBuilder {
        self.database = Some(database);
        self
    }

    pub fn variant(mut self, variant: Variant) -> EngineBuilder {
        self.variant = variant;
        self
    }

    /// Construct `Engine`, preparing the database first.
    ///
    /// The ephemeral variant deletes an existing database file before
    /// anything else: all data from previous runs is lost.
    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self
            .database
            .unwrap_or_else(|| Database::sqlite(DEFAULT_DATABASE_PATH));

        if self.variant == Variant::Ephemeral {
            discard_previous(&database)?;
        }

        let db = storage::connect(&database).await?;
        Migrator::up(&db, None).await?;
        tracing::info!(
            variant = self.variant.as_str(),
            "financial_data ready at {}",
            database.url()
        );

        let storage = match (self.variant, &database) {
            (Variant::Persistent, Database::Sqlite(_)) => {
                db.close().await?;
                Storage::PerOperation(database.clone())
            }
            _ => Storage::Shared(db),
        };

        Ok(Engine {
            variant: self.variant,
            database,
            storage,
        })
    }
}

fn discard_previous(database: &Database) -> ResultEngine<()> {
    let Some(path) = database.path() else {
        return Ok(());
    };

    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::warn!("discarded previous database {}", path.display());
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!("no previous database at {}", path.display());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

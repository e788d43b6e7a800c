//! Schema ledger for the `financial_data` table.
//!
//! Every step checks its own precondition before touching the schema, so the
//! whole ledger can run against a fresh file, a current file or any of the
//! legacy layouts older releases left behind.
pub use sea_orm_migration::prelude::*;

use sea_orm::{ConnectionTrait, DbErr, Statement};

mod m20240105_000000_financial_data;
mod m20240212_000000_expense_type;
mod m20240318_000000_drop_data_collection;

/// Name of the only table the application owns.
pub const FINANCIAL_DATA: &str = "financial_data";

/// Columns `financial_data` has, in declaration order, once the ledger has run.
pub const CANONICAL_COLUMNS: [&str; 6] =
    ["id", "date", "revenue", "expenses", "expense_type", "profit"];

/// Scratch table the canonical layout is copied into while rebuilding.
pub(crate) const REBUILD_TABLE: &str = "financial_data_rebuild";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240105_000000_financial_data::Migration),
            Box::new(m20240212_000000_expense_type::Migration),
            Box::new(m20240318_000000_drop_data_collection::Migration),
        ]
    }
}

#[derive(Iden)]
pub(crate) enum FinancialData {
    Table,
    Id,
    Date,
    Revenue,
    Expenses,
    ExpenseType,
    Profit,
}

/// Canonical `CREATE TABLE` for `financial_data`, usable under another name
/// while the table is being rebuilt.
pub(crate) fn financial_data_table<T>(table: T) -> TableCreateStatement
where
    T: IntoTableRef,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(FinancialData::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(FinancialData::Date).text().not_null())
        .col(
            ColumnDef::new(FinancialData::Revenue)
                .custom(Alias::new("REAL"))
                .not_null(),
        )
        .col(
            ColumnDef::new(FinancialData::Expenses)
                .custom(Alias::new("REAL"))
                .not_null(),
        )
        .col(ColumnDef::new(FinancialData::ExpenseType).text().not_null())
        .col(
            ColumnDef::new(FinancialData::Profit)
                .custom(Alias::new("REAL"))
                .not_null(),
        )
        .to_owned()
}

/// Returns the column names of `financial_data` in declaration order.
///
/// The result is empty when the table does not exist.
pub async fn financial_data_columns<C>(db: &C) -> Result<Vec<String>, DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    let rows = db
        .query_all(Statement::from_string(
            backend,
            format!("PRAGMA table_info({FINANCIAL_DATA});"),
        ))
        .await?;

    rows.iter()
        .map(|row| row.try_get::<String>("", "name"))
        .collect()
}

pub(crate) async fn count_rows<C>(db: &C, table: &str) -> Result<i64, DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS row_count FROM {table};"),
        ))
        .await?
        .ok_or_else(|| DbErr::Custom(format!("cannot count rows of {table}")))?;

    row.try_get("", "row_count")
}

/// Puts back a rebuild that stopped between dropping `financial_data` and
/// renaming the copy into place.
///
/// The copy is only trusted when `financial_data` is gone or empty; next to
/// a populated source it is a partial leftover and is dropped.
pub(crate) async fn restore_interrupted_rebuild(
    manager: &SchemaManager<'_>,
) -> Result<(), DbErr> {
    if !manager.has_table(REBUILD_TABLE).await? {
        return Ok(());
    }

    let db = manager.get_connection();
    if manager.has_table(FINANCIAL_DATA).await? && count_rows(db, FINANCIAL_DATA).await? > 0 {
        tracing::info!("dropping stale {REBUILD_TABLE}");
        return manager
            .drop_table(Table::drop().table(Alias::new(REBUILD_TABLE)).to_owned())
            .await;
    }

    let rows = count_rows(db, REBUILD_TABLE).await?;
    manager
        .drop_table(
            Table::drop()
                .table(FinancialData::Table)
                .if_exists()
                .to_owned(),
        )
        .await?;
    manager
        .rename_table(
            Table::rename()
                .table(Alias::new(REBUILD_TABLE), FinancialData::Table)
                .to_owned(),
        )
        .await?;

    tracing::warn!(rows, "restored {FINANCIAL_DATA} from an interrupted rebuild");
    Ok(())
}

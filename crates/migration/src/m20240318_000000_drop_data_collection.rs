//! Brings `financial_data` to the canonical layout.
//!
//! Drops the legacy `data_collection` column and restores the canonical
//! column order (a legacy `ADD COLUMN expense_type` appends it last). The
//! table is rebuilt inside one transaction: the canonical columns are copied
//! into a fresh table, the copy is checked against the source row count, and
//! only then is the old table dropped and the new one renamed into place.
use sea_orm::{ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait};
use sea_orm_migration::prelude::*;

use crate::{
    CANONICAL_COLUMNS, FINANCIAL_DATA, FinancialData, REBUILD_TABLE, count_rows,
    financial_data_columns, financial_data_table, restore_interrupted_rebuild,
};

const LEGACY_COLUMN: &str = "data_collection";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        restore_interrupted_rebuild(manager).await?;

        let columns = financial_data_columns(manager.get_connection()).await?;
        if columns.is_empty() || columns == CANONICAL_COLUMNS {
            return Ok(());
        }

        let txn = manager.get_connection().begin().await?;
        let rows = rebuild(&txn).await?;
        txn.commit().await?;

        if columns.iter().any(|c| c == LEGACY_COLUMN) {
            tracing::info!(rows, "dropped legacy {LEGACY_COLUMN} column from {FINANCIAL_DATA}");
        } else {
            tracing::info!(rows, "reordered {FINANCIAL_DATA} columns");
        }
        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // The legacy column carried no data the application reads.
        Ok(())
    }
}

async fn rebuild(txn: &DatabaseTransaction) -> Result<i64, DbErr> {
    let manager = SchemaManager::new(txn);

    manager
        .create_table(financial_data_table(Alias::new(REBUILD_TABLE)))
        .await?;

    let columns = CANONICAL_COLUMNS.join(", ");
    txn.execute(Statement::from_string(
        txn.get_database_backend(),
        format!("INSERT INTO {REBUILD_TABLE} ({columns}) SELECT {columns} FROM {FINANCIAL_DATA};"),
    ))
    .await?;

    let source_rows = count_rows(txn, FINANCIAL_DATA).await?;
    let copied_rows = count_rows(txn, REBUILD_TABLE).await?;
    if source_rows != copied_rows {
        return Err(DbErr::Custom(format!(
            "cannot rebuild {FINANCIAL_DATA}: copied {copied_rows} of {source_rows} rows"
        )));
    }

    manager
        .drop_table(Table::drop().table(FinancialData::Table).to_owned())
        .await?;
    manager
        .rename_table(
            Table::rename()
                .table(Alias::new(REBUILD_TABLE), FinancialData::Table)
                .to_owned(),
        )
        .await?;

    Ok(copied_rows)
}

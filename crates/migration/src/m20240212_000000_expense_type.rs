//! Adds `expense_type` to tables created before the column existed.
//!
//! SQLite refuses `ADD COLUMN ... NOT NULL` without a default, so legacy rows
//! receive an empty expense type. Their stored profit is left as it was.
use sea_orm_migration::prelude::*;

use crate::{FINANCIAL_DATA, FinancialData};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.has_column(FINANCIAL_DATA, "expense_type").await? {
            return Ok(());
        }

        tracing::info!("adding missing expense_type column to {FINANCIAL_DATA}");
        manager
            .alter_table(
                Table::alter()
                    .table(FinancialData::Table)
                    .add_column(
                        ColumnDef::new(FinancialData::ExpenseType)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // The column is part of the canonical schema; nothing to undo.
        Ok(())
    }
}

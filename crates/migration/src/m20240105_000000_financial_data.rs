use sea_orm_migration::prelude::*;

use crate::{FinancialData, financial_data_table, restore_interrupted_rebuild};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        restore_interrupted_rebuild(manager).await?;
        manager
            .create_table(financial_data_table(FinancialData::Table))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FinancialData::Table).to_owned())
            .await
    }
}

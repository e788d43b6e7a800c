use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    Engine, EngineError, ResultEngine, Variant, records,
    storage::{with_db, with_tx},
};

impl Engine {
    /// Deletes what the user selected in the table, `selection` being the
    /// 0-based display row.
    ///
    /// - persistent: the row position is resolved to its id against a fresh
    ///   id-ordered query and exactly that record is removed.
    /// - ephemeral: the row position is resolved to its date and **every**
    ///   record on that date is removed.
    ///
    /// Returns the number of deleted records.
    pub async fn delete_selected(&self, selection: Option<usize>) -> ResultEngine<u64> {
        let row = selection.ok_or(EngineError::NoSelection)?;

        let deleted = match self.variant {
            Variant::Persistent => with_db!(self, |db| delete_row_id(db, row).await)?,
            Variant::Ephemeral => with_db!(self, |db| delete_row_date(db, row).await)?,
        };

        if deleted > 1 {
            tracing::warn!("deleted {deleted} records sharing the date of row {row}");
        } else {
            tracing::info!("deleted record at row {row}");
        }
        Ok(deleted)
    }

    /// Deletes the record with `id`, if any.
    pub async fn delete_by_id(&self, id: i32) -> ResultEngine<u64> {
        with_db!(self, |db| delete_id(db, id).await)
    }

    /// Deletes every record dated `date`.
    pub async fn delete_by_date(&self, date: NaiveDate) -> ResultEngine<u64> {
        let date = date.format(crate::DATE_FORMAT).to_string();
        with_db!(self, |db| delete_date(db, &date).await)
    }
}

async fn delete_row_id(db: &DatabaseConnection, row: usize) -> ResultEngine<u64> {
    let ids: Vec<i32> = records::Entity::find()
        .select_only()
        .column(records::Column::Id)
        .order_by_asc(records::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let id = ids.get(row).copied().ok_or(EngineError::RowNotFound(row))?;
    delete_id(db, id).await
}

async fn delete_row_date(db: &DatabaseConnection, row: usize) -> ResultEngine<u64> {
    let dates: Vec<String> = records::Entity::find()
        .select_only()
        .column(records::Column::Date)
        .order_by_asc(records::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let date = dates.get(row).ok_or(EngineError::RowNotFound(row))?;
    delete_date(db, date).await
}

async fn delete_id(db: &DatabaseConnection, id: i32) -> ResultEngine<u64> {
    with_tx!(db, |tx| {
        let result = records::Entity::delete_by_id(id).exec(&tx).await?;
        Ok(result.rows_affected)
    })
}

async fn delete_date(db: &DatabaseConnection, date: &str) -> ResultEngine<u64> {
    with_tx!(db, |tx| {
        let result = records::Entity::delete_many()
            .filter(records::Column::Date.eq(date))
            .exec(&tx)
            .await?;
        Ok(result.rows_affected)
    })
}

use std::{io::Write, path::PathBuf};

use chrono::NaiveDate;
use csv::WriterBuilder;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use serde::Serialize;

use crate::{
    DATE_FORMAT, Engine, EngineError, FinancialRecord, ResultEngine, Variant, records,
    storage::with_db,
};

/// Inclusive date range, compared on the stored `YYYY-MM-DD` text.
///
/// A range whose start is after its end matches nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportRequest {
    /// `None` exports every record.
    pub range: Option<DateRange>,
    /// `None` falls back to the variant's default path, if it has one.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: i32,
    date: String,
    revenue: String,
    expenses: String,
    expense_type: &'a str,
    profit: String,
}

impl<'a> From<&'a FinancialRecord> for ExportRow<'a> {
    fn from(record: &'a FinancialRecord) -> Self {
        Self {
            id: record.id,
            date: record.date_text(),
            revenue: record.revenue.to_string(),
            expenses: record.expenses.to_string(),
            expense_type: &record.expense_type,
            profit: record.profit.to_string(),
        }
    }
}

impl Engine {
    /// Writes the matching records to a CSV file, replacing it if present.
    ///
    /// The whole file is built in memory before anything touches the disk.
    pub async fn export(&self, request: &ExportRequest) -> ResultEngine<ExportSummary> {
        let path = request
            .path
            .clone()
            .or_else(|| self.variant.default_export_path().map(PathBuf::from))
            .ok_or(EngineError::MissingExportPath)?;

        let mut data = Vec::new();
        let rows = self.export_to_writer(request.range, &mut data).await?;
        std::fs::write(&path, data)?;

        tracing::info!(rows, "exported records to {}", path.display());
        Ok(ExportSummary { path, rows })
    }

    /// Writes the matching records as CSV to `writer`, returning how many
    /// records were written. The header row is always present.
    pub async fn export_to_writer<W>(
        &self,
        range: Option<DateRange>,
        writer: W,
    ) -> ResultEngine<usize>
    where
        W: Write,
    {
        let records = with_db!(self, |db| load_range(db, range).await)?;
        write_csv(self.variant, &records, writer)?;
        Ok(records.len())
    }
}

async fn load_range<C>(db: &C, range: Option<DateRange>) -> ResultEngine<Vec<FinancialRecord>>
where
    C: ConnectionTrait,
{
    let mut query = records::Entity::find();
    if let Some(range) = range {
        query = query.filter(records::Column::Date.between(
            range.start.format(DATE_FORMAT).to_string(),
            range.end.format(DATE_FORMAT).to_string(),
        ));
    }

    query
        .order_by_asc(records::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(FinancialRecord::try_from)
        .collect()
}

fn write_csv<W>(variant: Variant, records: &[FinancialRecord], writer: W) -> ResultEngine<()>
where
    W: Write,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(variant.export_headers())?;
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

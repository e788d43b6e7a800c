use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, QueryOrder, prelude::*};
use serde::Serialize;

use crate::{
    Engine, FinancialRecord, ResultEngine, Variant, records,
    storage::with_db,
};

/// The table as the user sees it: one header row and one row of cells per
/// record, in storage order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_records(variant: Variant, records: &[FinancialRecord]) -> Self {
        let headers = variant
            .table_headers()
            .iter()
            .map(ToString::to_string)
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                let mut cells = Vec::with_capacity(6);
                if variant == Variant::Persistent {
                    cells.push(record.id.to_string());
                }
                cells.push(record.date_text());
                cells.push(record.revenue.to_string());
                cells.push(record.expenses.to_string());
                cells.push(record.expense_type.clone());
                cells.push(record.profit.to_string());
                cells
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One x position on the trend charts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

/// Revenue, expenses and profit plotted against date, in table order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub const REVENUE_TREND: &'static str = "Revenue Trend";
    pub const EXPENSES_TREND: &'static str = "Expenses Trend";
    pub const PROFIT_TREND: &'static str = "Profit Trend";

    pub fn from_records(records: &[FinancialRecord]) -> Self {
        let points = records
            .iter()
            .map(|record| ChartPoint {
                date: record.date,
                revenue: record.revenue.to_units(),
                expenses: record.expenses.to_units(),
                profit: record.profit.to_units(),
            })
            .collect();
        Self { points }
    }

    pub fn revenue(&self) -> Vec<(NaiveDate, f64)> {
        self.series(|p| p.revenue)
    }

    pub fn expenses(&self) -> Vec<(NaiveDate, f64)> {
        self.series(|p| p.expenses)
    }

    pub fn profit(&self) -> Vec<(NaiveDate, f64)> {
        self.series(|p| p.profit)
    }

    /// The three charts with their titles.
    pub fn trends(&self) -> [(&'static str, Vec<(NaiveDate, f64)>); 3] {
        [
            (Self::REVENUE_TREND, self.revenue()),
            (Self::EXPENSES_TREND, self.expenses()),
            (Self::PROFIT_TREND, self.profit()),
        ]
    }

    fn series(&self, value: impl Fn(&ChartPoint) -> f64) -> Vec<(NaiveDate, f64)> {
        self.points.iter().map(|p| (p.date, value(p))).collect()
    }
}

impl Engine {
    /// Full scan of `financial_data` in insertion order.
    pub async fn records(&self) -> ResultEngine<Vec<FinancialRecord>> {
        with_db!(self, |db| load_records(db).await)
    }

    /// Re-reads the whole table for display.
    pub async fn table(&self) -> ResultEngine<TableView> {
        let records = self.records().await?;
        Ok(TableView::from_records(self.variant, &records))
    }

    /// Re-reads the whole table for the trend charts.
    pub async fn chart_series(&self) -> ResultEngine<ChartSeries> {
        let records = self.records().await?;
        Ok(ChartSeries::from_records(&records))
    }
}

pub(crate) async fn load_records<C>(db: &C) -> ResultEngine<Vec<FinancialRecord>>
where
    C: ConnectionTrait,
{
    records::Entity::find()
        .order_by_asc(records::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(FinancialRecord::try_from)
        .collect()
}

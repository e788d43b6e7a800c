//! Financial record primitives.
//!
//! A `FinancialRecord` is one revenue/expense entry. Its profit is computed
//! once, when the record is written, and read back as stored.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{Amount, EngineError};

/// Storage format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinancialRecord {
    pub id: i32,
    pub date: NaiveDate,
    pub revenue: Amount,
    pub expenses: Amount,
    pub expense_type: String,
    pub profit: Amount,
}

impl FinancialRecord {
    /// ISO-8601 date as it is stored in the table.
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A validated record that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRecord {
    pub date: NaiveDate,
    pub revenue: Amount,
    pub expenses: Amount,
    pub expense_type: String,
}

impl NewRecord {
    pub fn profit(&self) -> Amount {
        self.revenue - self.expenses
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "financial_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: String,
    pub revenue: f64,
    pub expenses: f64,
    pub expense_type: String,
    pub profit: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&NewRecord> for ActiveModel {
    fn from(record: &NewRecord) -> Self {
        Self {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(record.date.format(DATE_FORMAT).to_string()),
            revenue: ActiveValue::Set(record.revenue.to_units()),
            expenses: ActiveValue::Set(record.expenses.to_units()),
            expense_type: ActiveValue::Set(record.expense_type.clone()),
            profit: ActiveValue::Set(record.profit().to_units()),
        }
    }
}

impl TryFrom<Model> for FinancialRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let date = parse_date(&model.date).map_err(|_| EngineError::CorruptRecord {
            id: model.id,
            date: model.date.clone(),
        })?;

        Ok(Self {
            id: model.id,
            date,
            revenue: Amount::from_units(model.revenue),
            expenses: Amount::from_units(model.expenses),
            expense_type: model.expense_type,
            profit: Amount::from_units(model.profit),
        })
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("\"{}\" is not YYYY-MM-DD", value.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_profit_is_revenue_minus_expenses() {
        let record = NewRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            revenue: Amount::new(1000_00),
            expenses: Amount::new(400_00),
            expense_type: "Payroll".to_string(),
        };
        assert_eq!(record.profit(), Amount::new(600_00));

        let model = ActiveModel::from(&record);
        assert_eq!(model.date, ActiveValue::Set("2024-01-01".to_string()));
        assert_eq!(model.profit, ActiveValue::Set(600.0));
    }

    #[test]
    fn model_converts_stored_profit_without_recomputing() {
        let model = Model {
            id: 3,
            date: "2023-02-28".to_string(),
            revenue: 10.0,
            expenses: 2.5,
            expense_type: String::new(),
            profit: 99.0,
        };
        let record = FinancialRecord::try_from(model).unwrap();
        assert_eq!(record.profit, Amount::new(99_00));
        assert_eq!(record.date_text(), "2023-02-28");
    }

    #[test]
    fn unreadable_stored_date_is_a_storage_error() {
        let model = Model {
            id: 5,
            date: "03/04/2024".to_string(),
            revenue: 1.0,
            expenses: 0.0,
            expense_type: "Sales".to_string(),
            profit: 1.0,
        };
        let err = FinancialRecord::try_from(model).unwrap_err();
        assert_eq!(
            err,
            EngineError::CorruptRecord {
                id: 5,
                date: "03/04/2024".to_string()
            }
        );
        assert!(!err.is_input_error());
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("01/02/2024").is_err());
        assert_eq!(
            parse_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}

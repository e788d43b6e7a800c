use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, prelude::*};

use crate::{
    Amount, Engine, EngineError, FinancialRecord, NewRecord, ResultEngine, Variant, records,
    storage::{with_db, with_tx},
};

const ENTER_BOTH_AMOUNTS: &str = "Please enter valid revenue and expenses values.";
const ENTER_ANY_AMOUNT: &str = "Please enter at least revenue or expenses data.";

/// Raw values of the entry form, before validation.
///
/// Amounts are kept as the text the user typed: whether an empty field is an
/// error or a zero depends on the engine's [`Variant`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryForm {
    pub date: NaiveDate,
    pub revenue: String,
    pub expenses: String,
    pub expense_type: String,
}

impl EntryForm {
    pub fn new(
        date: NaiveDate,
        revenue: impl Into<String>,
        expenses: impl Into<String>,
        expense_type: impl Into<String>,
    ) -> Self {
        Self {
            date,
            revenue: revenue.into(),
            expenses: expenses.into(),
            expense_type: expense_type.into(),
        }
    }

    /// Validates the form under `variant`'s input policy.
    ///
    /// - persistent: both amounts are required and must parse.
    /// - ephemeral: a blank amount is zero; only both being zero is rejected.
    pub fn validate(&self, variant: Variant) -> ResultEngine<NewRecord> {
        let (revenue, expenses) = match variant {
            Variant::Persistent => {
                let parsed = self
                    .revenue
                    .parse::<Amount>()
                    .and_then(|revenue| Ok((revenue, self.expenses.parse::<Amount>()?)));
                match parsed {
                    Ok(amounts) => amounts,
                    Err(err) => {
                        tracing::debug!("rejected entry form: {err}");
                        return Err(EngineError::IncompleteEntry(ENTER_BOTH_AMOUNTS.to_string()));
                    }
                }
            }
            Variant::Ephemeral => {
                let revenue = Amount::parse_or_zero(&self.revenue)?;
                let expenses = Amount::parse_or_zero(&self.expenses)?;
                if revenue.is_zero() && expenses.is_zero() {
                    return Err(EngineError::IncompleteEntry(ENTER_ANY_AMOUNT.to_string()));
                }
                (revenue, expenses)
            }
        };

        Ok(NewRecord {
            date: self.date,
            revenue,
            expenses,
            expense_type: variant.expense_type(&self.expense_type)?.to_string(),
        })
    }
}

impl Engine {
    /// Validates `form`, computes the profit and stores one new row.
    ///
    /// Identical forms saved twice produce two rows.
    pub async fn save(&self, form: &EntryForm) -> ResultEngine<FinancialRecord> {
        let record = form.validate(self.variant)?;
        let saved = with_db!(self, |db| insert_record(db, &record).await)?;

        tracing::info!(
            id = saved.id,
            date = %saved.date,
            profit = %saved.profit,
            "saved {} record",
            saved.expense_type
        );
        Ok(saved)
    }
}

async fn insert_record(
    db: &DatabaseConnection,
    record: &NewRecord,
) -> ResultEngine<FinancialRecord> {
    with_tx!(db, |tx| {
        let model = records::ActiveModel::from(record).insert(&tx).await?;
        FinancialRecord::try_from(model)
    })
}

//! Application variants.
//!
//! Both variants share the table layout; they differ in startup behaviour,
//! input policy, expense-type catalogue, table columns, delete semantics and
//! export defaults.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

const PERSISTENT_EXPENSE_TYPES: &[&str] = &[
    "Advertising",
    "Payroll",
    "Marketing",
    "Utilities",
    "Office Supplies",
    "Sales",
    "Inventory",
    "Customer Data",
];

const EPHEMERAL_EXPENSE_TYPES: &[&str] = &[
    "Advertising",
    "Payroll",
    "Rent",
    "Utilities",
    "Inventory",
    "Car Purchase",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Keeps the database between runs and migrates it in place at startup.
    /// Every operation opens and closes its own connection.
    #[default]
    #[serde(alias = "v1")]
    Persistent,
    /// Deletes the database file at startup and keeps one connection for
    /// the whole process. Nothing survives a restart.
    #[serde(alias = "v2")]
    Ephemeral,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Persistent => "persistent",
            Self::Ephemeral => "ephemeral",
        }
    }

    /// Expense types offered to the user, in display order.
    pub fn expense_types(self) -> &'static [&'static str] {
        match self {
            Self::Persistent => PERSISTENT_EXPENSE_TYPES,
            Self::Ephemeral => EPHEMERAL_EXPENSE_TYPES,
        }
    }

    /// Matches `label` against the catalogue ignoring case and surrounding
    /// whitespace, returning the canonical spelling.
    pub fn expense_type(self, label: &str) -> ResultEngine<&'static str> {
        let wanted = label.trim();
        self.expense_types()
            .iter()
            .find(|known| known.eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| EngineError::UnknownExpenseType(wanted.to_string()))
    }

    /// Column headers of the table view.
    pub fn table_headers(self) -> &'static [&'static str] {
        match self {
            Self::Persistent => &migration::CANONICAL_COLUMNS,
            Self::Ephemeral => &["Date", "Revenue", "Expenses", "Expense Type", "Profit"],
        }
    }

    /// Header row of exported CSV files.
    pub fn export_headers(self) -> &'static [&'static str] {
        match self {
            Self::Persistent => &migration::CANONICAL_COLUMNS,
            Self::Ephemeral => &["ID", "Date", "Revenue", "Expenses", "Expense Type", "Profit"],
        }
    }

    /// Export target used when the caller does not choose one.
    pub fn default_export_path(self) -> Option<&'static str> {
        match self {
            Self::Persistent => Some("financial_data.csv"),
            Self::Ephemeral => None,
        }
    }
}

impl TryFrom<&str> for Variant {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "persistent" | "v1" => Ok(Self::Persistent),
            "ephemeral" | "v2" => Ok(Self::Ephemeral),
            other => Err(format!("unknown variant: {other}")),
        }
    }
}

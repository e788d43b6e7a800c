//! The module contains the errors the engine can return.
//!
//! Input errors ([`InvalidAmount`], [`IncompleteEntry`], [`UnknownExpenseType`],
//! [`InvalidDate`]) and selection errors ([`NoSelection`], [`RowNotFound`])
//! are meant to be shown to the user, who can correct them and retry.
//! Storage errors come from the database, the filesystem or the CSV writer,
//! or from a stored row the engine cannot read back.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`IncompleteEntry`]: EngineError::IncompleteEntry
//!  [`UnknownExpenseType`]: EngineError::UnknownExpenseType
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`NoSelection`]: EngineError::NoSelection
//!  [`RowNotFound`]: EngineError::RowNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("{0}")]
    IncompleteEntry(String),
    #[error("Unknown expense type: \"{0}\"")]
    UnknownExpenseType(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Please select a row to delete.")]
    NoSelection,
    #[error("Row {0} not found!")]
    RowNotFound(usize),
    #[error("An export path is required")]
    MissingExportPath,
    #[error("Stored record {id} has an unreadable date \"{date}\"")]
    CorruptRecord { id: i32, date: String },
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl EngineError {
    /// Returns `true` for errors caused by user input rather than by storage.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            Self::CorruptRecord { .. } | Self::Database(_) | Self::Io(_) | Self::Csv(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::IncompleteEntry(a), Self::IncompleteEntry(b)) => a == b,
            (Self::UnknownExpenseType(a), Self::UnknownExpenseType(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::NoSelection, Self::NoSelection) => true,
            (Self::RowNotFound(a), Self::RowNotFound(b)) => a == b,
            (Self::MissingExportPath, Self::MissingExportPath) => true,
            (
                Self::CorruptRecord { id: a, date: x },
                Self::CorruptRecord { id: b, date: y },
            ) => a == b && x == y,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

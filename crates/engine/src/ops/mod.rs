mod delete;
mod export;
mod read;
mod save;

pub use export::{DateRange, ExportRequest, ExportSummary};
pub use read::{ChartPoint, ChartSeries, TableView};
pub use save::EntryForm;

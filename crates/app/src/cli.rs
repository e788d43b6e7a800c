use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::Variant;

#[derive(Parser, Debug)]
#[command(name = "autobooks")]
#[command(about = "Record revenue and expenses, chart them and export them to CSV")]
#[command(
    after_help = "The ephemeral variant (v2) DELETES the database file every time it starts: \
                  nothing is kept between runs. Use `autobooks --variant ephemeral shell` to work \
                  with it."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the SQLite database file.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
    /// Override the variant: persistent (v1) or ephemeral (v2).
    #[arg(long, global = true, value_parser = parse_variant)]
    pub variant: Option<Variant>,
    /// Override the log level.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// A command typed at the interactive prompt: same grammar, no program name.
#[derive(Parser, Debug)]
#[command(name = "autobooks", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Save a new record; the profit is computed from revenue and expenses.
    Save(SaveArgs),
    /// Show every record.
    List(ListArgs),
    /// Delete the record shown at a table row.
    Delete(DeleteArgs),
    /// Export records to CSV.
    Export(ExportArgs),
    /// Show revenue, expenses and profit trends.
    Chart,
    /// List the expense types of the current variant.
    Types,
    /// Read commands from standard input until `quit`.
    Shell,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct SaveArgs {
    /// Entry date (YYYY-MM-DD), today when omitted.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub revenue: String,
    #[arg(long, default_value = "")]
    pub expenses: String,
    /// One of `autobooks types`; the first one when omitted.
    #[arg(long)]
    pub expense_type: Option<String>,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct ListArgs {
    /// Print the records as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct DeleteArgs {
    /// 0-based row as shown by `list`.
    #[arg(long)]
    pub row: Option<usize>,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct ExportArgs {
    /// First date to export (inclusive).
    #[arg(long, value_parser = parse_date, requires = "to")]
    pub from: Option<NaiveDate>,
    /// Last date to export (inclusive).
    #[arg(long, value_parser = parse_date, requires = "from")]
    pub to: Option<NaiveDate>,
    /// Output file; defaults to the configured export path.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn parse_variant(raw: &str) -> Result<Variant, String> {
    Variant::try_from(raw)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    engine::parse_date(raw).map_err(|err| err.to_string())
}

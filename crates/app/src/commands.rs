use std::io::Write;

use chrono::Local;
use engine::{DateRange, Engine, EntryForm, ExportRequest};

use crate::{
    cli::{Command, DeleteArgs, ExportArgs, SaveArgs},
    error::Result,
    render,
    settings::Settings,
};

/// Runs one command against `engine`, writing user-facing output to `out`.
///
/// Saving and deleting print the re-read table afterwards.
pub async fn execute<W: Write>(
    engine: &Engine,
    settings: &Settings,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Save(args) => {
            let form = entry_form(engine, args);
            let record = engine.save(&form).await?;
            writeln!(
                out,
                "saved record {} ({}, profit {})",
                record.id, record.date, record.profit
            )?;
            refresh(engine, out).await
        }
        Command::List(args) => {
            if args.json {
                let records = engine.records().await?;
                serde_json::to_writer_pretty(&mut *out, &records)?;
                writeln!(out)?;
                Ok(())
            } else {
                refresh(engine, out).await
            }
        }
        Command::Delete(DeleteArgs { row }) => {
            let deleted = engine.delete_selected(row).await?;
            writeln!(out, "deleted {deleted} record(s)")?;
            refresh(engine, out).await
        }
        Command::Export(args) => {
            let request = export_request(settings, args);
            let summary = engine.export(&request).await?;
            writeln!(
                out,
                "exported {} record(s) to {}",
                summary.rows,
                summary.path.display()
            )?;
            Ok(())
        }
        Command::Chart => {
            let series = engine.chart_series().await?;
            render::write_charts(out, &series)?;
            Ok(())
        }
        Command::Types => {
            for label in engine.variant().expense_types() {
                writeln!(out, "{label}")?;
            }
            Ok(())
        }
        Command::Shell => {
            writeln!(out, "already in the shell")?;
            Ok(())
        }
    }
}

async fn refresh<W: Write>(engine: &Engine, out: &mut W) -> Result<()> {
    let view = engine.table().await?;
    render::write_table(out, &view)?;
    Ok(())
}

fn entry_form(engine: &Engine, args: SaveArgs) -> EntryForm {
    let expense_type = args.expense_type.unwrap_or_else(|| {
        engine
            .variant()
            .expense_types()
            .first()
            .map(ToString::to_string)
            .unwrap_or_default()
    });

    EntryForm::new(
        args.date.unwrap_or_else(|| Local::now().date_naive()),
        args.revenue,
        args.expenses,
        expense_type,
    )
}

fn export_request(settings: &Settings, args: ExportArgs) -> ExportRequest {
    let range = match (args.from, args.to) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)),
        _ => None,
    };

    ExportRequest {
        range,
        path: args.output.or_else(|| settings.storage.export_path.clone()),
    }
}

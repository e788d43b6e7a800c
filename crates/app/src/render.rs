//! Plain-text rendering of the table view and the trend charts.

use std::io::{self, Write};

use engine::{ChartSeries, TableView};

const BAR_WIDTH: usize = 24;

/// Writes `view` as aligned columns with a leading row index, the index
/// `delete --row` expects.
pub fn write_table<W: Write>(out: &mut W, view: &TableView) -> io::Result<()> {
    let index_width = view.rows.len().saturating_sub(1).to_string().len().max(3);
    let mut widths: Vec<usize> = view.headers.iter().map(|h| h.chars().count()).collect();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write!(out, "{:>index_width$}", "row")?;
    for (header, width) in view.headers.iter().zip(&widths) {
        write!(out, "  {header:<width$}")?;
    }
    writeln!(out)?;

    for (index, row) in view.rows.iter().enumerate() {
        write!(out, "{index:>index_width$}")?;
        for (cell, width) in row.iter().zip(&widths) {
            write!(out, "  {cell:<width$}")?;
        }
        writeln!(out)?;
    }

    if view.is_empty() {
        writeln!(out, "(no records)")?;
    }
    Ok(())
}

/// Writes the three trends, one line per point with a bar scaled to the
/// largest absolute value of its series.
pub fn write_charts<W: Write>(out: &mut W, series: &ChartSeries) -> io::Result<()> {
    for (title, points) in series.trends() {
        writeln!(out, "{title}")?;
        if points.is_empty() {
            writeln!(out, "  (no data)")?;
        }

        let max = points.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
        for (date, value) in &points {
            let sign = if *value < 0.0 { '-' } else { ' ' };
            writeln!(
                out,
                "  {date}  {value:>12.2}  {sign}{}",
                ascii_bar(value.abs(), max, BAR_WIDTH)
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Creates a simple horizontal bar for inline use.
///
/// Returns a string like `████████░░░░░░░░░░░░` representing the ratio.
#[must_use]
pub fn ascii_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }

    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

//! Tabular output of extracted records.
//!
//! Columns always follow [`Record::COLUMNS`]; an empty table still gets a
//! header row.

use crate::{Error, Record, Result};
use std::io::Write;

/// Write records as CSV with a header row.
///
/// Absent identifiers become empty cells.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(Record::COLUMNS)
        .map_err(|e| Error::ExportError(format!("Failed to write CSV header: {}", e)))?;

    for record in records {
        csv.serialize(record)
            .map_err(|e| Error::ExportError(format!("Failed to write CSV row: {}", e)))?;
    }

    csv.flush()?;
    Ok(())
}

/// Write records as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[Record], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(|e| Error::ExportError(format!("Failed to write JSON: {}", e)))?;
    writeln!(writer)?;
    Ok(())
}

/// Render records as an aligned plain-text table for terminal display.
///
/// Multi-line textbox content is folded onto one line.
pub fn render_table(records: &[Record]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            r.cells()
                .into_iter()
                .map(|cell| cell.lines().collect::<Vec<_>>().join(" / "))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = Record::COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = Record::COLUMNS.iter().map(|c| c.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(format_row(&header));
    out.push(format_row(&rule));
    out.extend(rows.iter().map(|row| format_row(row)));

    let mut table = out.join("\n");
    table.push('\n');
    table
}

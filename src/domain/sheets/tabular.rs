use error_stack::{report, ResultExt};
use thiserror::Error;
use tracing::{instrument, warn};

use super::{
    cell_value::{convert_cell, infer_column_kind},
    read_options::{OnBadLines, ReadOptions},
    table::{Table, TableColumn},
};

#[derive(Error, Debug)]
pub enum TabularError {
    #[error("No columns to parse from file")]
    NoColumns,
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    BadLine {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Malformed CSV content")]
    MalformedCsv,
    #[error("Parsed rows do not form a table")]
    InvalidTable,
}

/// One raw record and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<String>,
}

/// Parses CSV text (a public sheet export) into a [`Table`].
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_csv(text: &str, options: &ReadOptions) -> error_stack::Result<Table, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        // The header row is picked by `options.header_row`, not by the reader.
        .has_headers(false)
        // Width mismatches are handled by the bad-lines policy.
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .change_context(TabularError::MalformedCsv)
            .attach_printable_lazy(|| format!("Failed to read CSV record {}", index + 1))?;
        let line = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);
        rows.push(RawRow {
            line,
            cells: record.iter().map(str::to_owned).collect(),
        });
    }

    tabulate(rows, options)
}

/// Parses the cell grid of a worksheet (as returned by the Sheets API) into a [`Table`].
///
/// The API drops trailing blank cells, so every row is first padded to the widest one.
#[instrument(skip(values), fields(rows = values.len()))]
pub fn parse_values(
    values: Vec<Vec<String>>,
    options: &ReadOptions,
) -> error_stack::Result<Table, TabularError> {
    let width = values.iter().map(Vec::len).max().unwrap_or(0);
    let rows = values
        .into_iter()
        .map(|mut cells| {
            cells.resize(width, String::new());
            cells
        })
        .enumerate()
        .map(|(index, cells)| RawRow {
            line: index + 1,
            cells,
        })
        .collect();
    tabulate(rows, options)
}

pub fn tabulate(
    mut rows: Vec<RawRow>,
    options: &ReadOptions,
) -> error_stack::Result<Table, TabularError> {
    let (names, data) = match options.header_row {
        Some(header_index) => {
            if rows.len() <= header_index {
                return Err(report!(TabularError::NoColumns)).attach_printable_lazy(|| {
                    format!(
                        "Header row {} requested but only {} rows found",
                        header_index,
                        rows.len()
                    )
                });
            }
            let data = rows.split_off(header_index + 1);
            let header = rows.pop().map(|row| row.cells).unwrap_or_default();
            (header_names(header), data)
        }
        None => {
            let width = rows.first().map_or(0, |row| row.cells.len());
            ((0..width).map(|index| index.to_string()).collect(), rows)
        }
    };

    if names.is_empty() {
        return Err(report!(TabularError::NoColumns));
    }

    let expected = names.len();
    let mut kept: Vec<Vec<String>> = Vec::with_capacity(data.len());
    for row in data {
        let found = row.cells.len();
        if found > expected {
            match options.on_bad_lines {
                OnBadLines::Error => {
                    return Err(report!(TabularError::BadLine {
                        line: row.line,
                        expected,
                        found,
                    }));
                }
                OnBadLines::Warn => {
                    warn!(
                        line = row.line,
                        expected, found, "Skipping line with too many fields"
                    );
                    continue;
                }
                OnBadLines::Skip => continue,
            }
        }

        let mut cells = row.cells;
        cells.resize(expected, String::new());
        kept.push(cells);
    }

    let columns = names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let kind = infer_column_kind(
                kept.iter().map(|cells| cells[index].as_str()),
                options.parse_dates,
            );
            let values = kept
                .iter()
                .map(|cells| convert_cell(&cells[index], kind))
                .collect();
            TableColumn::new(name, values)
        })
        .collect();

    Table::new(columns).change_context(TabularError::InvalidTable)
}

/// Blank header cells become `Unnamed: {index}`, repeated names get `.1`, `.2`, ...
fn header_names(cells: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());
    for (index, cell) in cells.into_iter().enumerate() {
        let base = if cell.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            cell
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }
    names
}

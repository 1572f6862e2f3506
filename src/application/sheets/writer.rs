use error_stack::{report, ResultExt};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::error::{wrap_report, SheetsError, CLEAR_ERROR_PREFIX, WRITE_ERROR_PREFIX};
use crate::domain::sheets::{
    a1_notation::{AnchoredBlock, ToA1Notation},
    cell_value::literal_text,
    sheet_reference::SheetReference,
    table::Table,
};
use crate::ports::worksheet::Worksheet;

#[derive(Error, Debug)]
enum WriteFailure {
    #[error("Failed to grow the worksheet grid")]
    Resize,
    #[error("Failed to update the worksheet values")]
    Update,
    #[error("The sheet holds more cells than a worksheet can address")]
    TooLarge,
}

/// Lays out the full value grid: `header_row` blank rows, the column names, then the data.
fn value_grid(table: &Table, header_row: Option<usize>) -> Vec<Vec<Value>> {
    let width = table.column_count();
    let mut grid = Vec::with_capacity(header_row.map_or(0, |n| n + 1) + table.row_count());

    if let Some(blank_rows) = header_row {
        grid.extend((0..blank_rows).map(|_| vec![Value::String(String::new()); width]));
        grid.push(
            table
                .column_names()
                .map(literal_text)
                .collect(),
        );
    }

    grid.extend((0..table.row_count()).map(|index| {
        table
            .columns()
            .iter()
            .map(|column| column.values[index].to_json())
            .collect()
    }));
    grid
}

async fn write_grid(
    worksheet: &dyn Worksheet,
    grid: Vec<Vec<Value>>,
    column_count: usize,
) -> error_stack::Result<(), WriteFailure> {
    let block = AnchoredBlock {
        row_count: u32::try_from(grid.len()).change_context(WriteFailure::TooLarge)?,
        column_count: u32::try_from(column_count).change_context(WriteFailure::TooLarge)?,
    };
    worksheet
        .ensure_grid(block.row_count, block.column_count)
        .await
        .change_context(WriteFailure::Resize)?;

    let range = block.to_a1_notation(Some(worksheet.title()));
    worksheet
        .update(&range, grid)
        .await
        .change_context(WriteFailure::Update)
        .attach_printable_lazy(|| format!("Range {}", range))
}

/// Replaces the whole content of a private worksheet with `table`.
///
/// The sheet is cleared first. When growing the grid or writing fails afterwards, the sheet
/// stays cleared; nothing is rolled back.
#[instrument(
    skip(reference, table),
    fields(%reference, rows = table.row_count(), columns = table.column_count())
)]
pub async fn overwrite_table(
    reference: SheetReference,
    table: &Table,
    header_row: Option<usize>,
) -> error_stack::Result<bool, SheetsError> {
    let worksheet = match reference {
        SheetReference::PublicUrl(url) => {
            return Err(report!(SheetsError::Write(format!(
                "{} - a public sheet export is read-only",
                WRITE_ERROR_PREFIX
            )))
            .attach_printable(url));
        }
        SheetReference::PrivateWorksheet(worksheet) => worksheet,
    };

    worksheet
        .clear()
        .await
        .map_err(|report| wrap_report(report, CLEAR_ERROR_PREFIX, SheetsError::Clear))?;
    debug!(title = worksheet.title(), "Cleared worksheet");

    if table.column_count() == 0 {
        debug!("Nothing to write");
        return Ok(true);
    }

    let grid = value_grid(table, header_row);
    write_grid(worksheet.as_ref(), grid, table.column_count())
        .await
        .map_err(|report| {
            wrap_report(
                report,
                &format!("{} (the sheet was left cleared)", WRITE_ERROR_PREFIX),
                SheetsError::Write,
            )
        })?;

    debug!("Wrote worksheet");
    Ok(true)
}

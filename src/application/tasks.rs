//! Entry points an orchestrator runs as tasks. Each one validates its parameters, resolves the
//! sheet and performs exactly one read or one overwrite.

use indexmap::IndexMap;
use tracing::{info, instrument};

use crate::domain::error::SheetsError;
use crate::domain::sheets::{cell_value::CellValue, sheet_reference::SheetReference, table::Table};
use crate::domain::task_params::SheetTaskParams;

use super::sheets::{reader::read_table, resolve::resolve_reference, writer::overwrite_table};

async fn resolve(params: &SheetTaskParams) -> error_stack::Result<SheetReference, SheetsError> {
    let coordinates = params.validate()?;
    resolve_reference(
        coordinates.is_public,
        coordinates.service_account,
        coordinates.sheet_key,
        coordinates.sheet_name,
    )
    .await
}

#[instrument(
    skip_all,
    fields(
        sheet_key = params.google_sheet_key.as_deref(),
        sheet_name = params.google_sheet_name.as_deref(),
        public = params.is_public_sheet,
    )
)]
pub async fn read_google_sheet_as_table(
    params: &SheetTaskParams,
) -> error_stack::Result<Table, SheetsError> {
    let reference = resolve(params).await?;
    let table = read_table(reference, &params.read_options()).await?;
    info!(rows = table.row_count(), "Read Google Sheet as table");
    Ok(table)
}

/// Data rows only; the header row never shows up in the result.
#[instrument(
    skip_all,
    fields(
        sheet_key = params.google_sheet_key.as_deref(),
        sheet_name = params.google_sheet_name.as_deref(),
        public = params.is_public_sheet,
    )
)]
pub async fn read_google_sheet_as_list_of_lists(
    params: &SheetTaskParams,
) -> error_stack::Result<Vec<Vec<CellValue>>, SheetsError> {
    let reference = resolve(params).await?;
    let rows = read_table(reference, &params.read_options())
        .await?
        .into_rows();
    info!(rows = rows.len(), "Read Google Sheet as list of lists");
    Ok(rows)
}

#[instrument(
    skip_all,
    fields(
        sheet_key = params.google_sheet_key.as_deref(),
        sheet_name = params.google_sheet_name.as_deref(),
        public = params.is_public_sheet,
    )
)]
pub async fn read_google_sheet_as_dict_of_lists(
    params: &SheetTaskParams,
) -> error_stack::Result<IndexMap<String, Vec<CellValue>>, SheetsError> {
    let reference = resolve(params).await?;
    let columns = read_table(reference, &params.read_options())
        .await?
        .into_column_map();
    info!(columns = columns.len(), "Read Google Sheet as dict of lists");
    Ok(columns)
}

/// Clears the worksheet and writes `table` into it, header first when `first_row_header` is set.
#[instrument(
    skip_all,
    fields(
        sheet_key = params.google_sheet_key.as_deref(),
        sheet_name = params.google_sheet_name.as_deref(),
        rows = table.row_count(),
    )
)]
pub async fn overwrite_google_sheet_with_table(
    table: &Table,
    params: &SheetTaskParams,
) -> error_stack::Result<bool, SheetsError> {
    let reference = resolve(params).await?;
    let written = overwrite_table(reference, table, params.header_row()).await?;
    info!("Overwrote Google Sheet");
    Ok(written)
}

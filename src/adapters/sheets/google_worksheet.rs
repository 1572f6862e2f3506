use error_stack::{report, ResultExt};
use google_sheets4::{
    api::{AppendDimensionRequest, BatchUpdateSpreadsheetRequest, ClearValuesRequest, Request, ValueRange},
    Sheets,
};
use serde_json::Value;
use std::fmt::Debug;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::domain::sheets::a1_notation::{whole_sheet, A1Notation};
use crate::ports::worksheet::{Worksheet, WorksheetError};

use super::{
    auth::{GoogleCredentials, GOOGLE_CREDENTIALS_SCOPES},
    http_client::HttpsConnector,
    value_range_factory::{IntoCellStrings, ValueRangeFactory},
};

pub type SheetsHub = Sheets<HttpsConnector>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridSize {
    rows: u32,
    columns: u32,
}

/// A worksheet reached through the Sheets API v4.
pub struct GoogleWorksheet {
    hub: SheetsHub,
    spreadsheet_id: String,
    sheet_id: i32,
    title: String,
    grid: RwLock<GridSize>,
}

impl Debug for GoogleWorksheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GoogleWorksheet {{ spreadsheet_id: {:?}, sheet_id: {}, title: {:?} }}",
            self.spreadsheet_id, self.sheet_id, self.title
        )
    }
}

fn to_grid_dimension(value: Option<i32>) -> u32 {
    value.map_or(0, |v| u32::try_from(v).unwrap_or(0))
}

fn append_dimension(sheet_id: i32, dimension: &str, length: u32) -> Request {
    Request {
        append_dimension: Some(AppendDimensionRequest {
            dimension: Some(dimension.to_string()),
            length: Some(i32::try_from(length).unwrap_or(i32::MAX)),
            sheet_id: Some(sheet_id),
        }),
        ..Default::default()
    }
}

impl GoogleWorksheet {
    /// Opens the spreadsheet by key and selects the worksheet titled `title`.
    #[instrument(name = "GoogleWorksheet::open")]
    pub async fn open(
        credentials: GoogleCredentials,
        spreadsheet_id: &str,
        title: &str,
    ) -> error_stack::Result<Self, WorksheetError> {
        let (client, authenticator) = credentials.into_parts();
        let hub: SheetsHub = Sheets::new(client, authenticator);

        let response = hub
            .spreadsheets()
            .get(spreadsheet_id)
            .add_scopes(GOOGLE_CREDENTIALS_SCOPES)
            .doit()
            .await
            .change_context(WorksheetError::FailedToOpenSpreadsheet)
            .attach_printable_lazy(|| {
                format!("Spreadsheet {} could not be opened", spreadsheet_id)
            })?;

        let properties = response
            .1
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties)
            .find(|properties| properties.title.as_deref() == Some(title))
            .ok_or_else(|| report!(WorksheetError::WorksheetNotFound(title.to_string())))
            .attach_printable_lazy(|| {
                format!(
                    "No worksheet titled {} in spreadsheet {}",
                    title, spreadsheet_id
                )
            })?;

        let grid = properties.grid_properties.as_ref();
        let size = GridSize {
            rows: to_grid_dimension(grid.and_then(|g| g.row_count)),
            columns: to_grid_dimension(grid.and_then(|g| g.column_count)),
        };
        debug!(?size, "Opened worksheet");

        Ok(GoogleWorksheet {
            hub,
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_id: properties.sheet_id.unwrap_or(0),
            title: title.to_string(),
            grid: RwLock::new(size),
        })
    }
}

#[async_trait::async_trait]
impl Worksheet for GoogleWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    #[instrument]
    async fn get_all_values(&self) -> error_stack::Result<Vec<Vec<String>>, WorksheetError> {
        let range = whole_sheet(&self.title);
        let response = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, range.as_ref())
            .value_render_option("FORMATTED_VALUE")
            .major_dimension("ROWS")
            .add_scopes(GOOGLE_CREDENTIALS_SCOPES)
            .doit()
            .await
            .change_context(WorksheetError::FailedToFetchValues)
            .attach_printable_lazy(|| format!("Failed to fetch values for range {}", range))?;

        Ok(response.1.values.unwrap_or_default().into_cell_strings())
    }

    #[instrument]
    async fn clear(&self) -> error_stack::Result<(), WorksheetError> {
        let range = whole_sheet(&self.title);
        self.hub
            .spreadsheets()
            .values_clear(ClearValuesRequest::default(), &self.spreadsheet_id, range.as_ref())
            .add_scopes(GOOGLE_CREDENTIALS_SCOPES)
            .doit()
            .await
            .map(|_| ())
            .change_context(WorksheetError::FailedToClear)
            .attach_printable_lazy(|| format!("Failed to clear range {}", range))
    }

    #[instrument]
    async fn ensure_grid(
        &self,
        row_count: u32,
        column_count: u32,
    ) -> error_stack::Result<(), WorksheetError> {
        let current = *self.grid.read().await;

        let mut requests = Vec::new();
        if row_count > current.rows {
            requests.push(append_dimension(
                self.sheet_id,
                "ROWS",
                row_count - current.rows,
            ));
        }
        if column_count > current.columns {
            requests.push(append_dimension(
                self.sheet_id,
                "COLUMNS",
                column_count - current.columns,
            ));
        }
        if requests.is_empty() {
            return Ok(());
        }

        self.hub
            .spreadsheets()
            .batch_update(
                BatchUpdateSpreadsheetRequest {
                    requests: Some(requests),
                    ..Default::default()
                },
                &self.spreadsheet_id,
            )
            .add_scopes(GOOGLE_CREDENTIALS_SCOPES)
            .doit()
            .await
            .change_context(WorksheetError::FailedToResize)
            .attach_printable_lazy(|| {
                format!(
                    "Failed to grow worksheet {} to {}x{}",
                    self.title, row_count, column_count
                )
            })?;

        let mut guard = self.grid.write().await;
        *guard = GridSize {
            rows: current.rows.max(row_count),
            columns: current.columns.max(column_count),
        };
        Ok(())
    }

    #[instrument(skip(rows))]
    async fn update(
        &self,
        range: &A1Notation,
        rows: Vec<Vec<Value>>,
    ) -> error_stack::Result<(), WorksheetError> {
        self.hub
            .spreadsheets()
            .values_update(ValueRange::from_rows(rows), &self.spreadsheet_id, range.as_ref())
            .value_input_option("USER_ENTERED")
            .add_scopes(GOOGLE_CREDENTIALS_SCOPES)
            .doit()
            .await
            .map(|_| ())
            .change_context(WorksheetError::FailedToWriteRange)
            .attach_printable_lazy(|| format!("Failed to write to range {} ", range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_dimension_request() {
        let request = append_dimension(7, "ROWS", 12);
        let append = request.append_dimension.unwrap();
        assert_eq!(append.dimension.as_deref(), Some("ROWS"));
        assert_eq!(append.length, Some(12));
        assert_eq!(append.sheet_id, Some(7));
    }

    #[test]
    fn test_to_grid_dimension() {
        assert_eq!(to_grid_dimension(Some(1000)), 1000);
        assert_eq!(to_grid_dimension(Some(-1)), 0);
        assert_eq!(to_grid_dimension(None), 0);
    }
}

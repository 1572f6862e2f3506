use std::sync::Arc;

use error_stack::report;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::sheets::a1_notation::{quote_sheet_title, A1Notation};
use crate::ports::worksheet::{Worksheet, WorksheetError};

use super::value_range_factory::IntoCellStrings;

const DEFAULT_ROWS: u32 = 1000;
const DEFAULT_COLUMNS: u32 = 26;

#[derive(Debug, Default)]
struct Grid {
    cells: Vec<Vec<String>>,
    rows: u32,
    columns: u32,
}

/// A worksheet kept in memory, with the same grid rules as a real one: writes outside the
/// grid fail until it is grown.
///
/// Clones share the same cells, so a caller can keep a handle after moving one into a
/// [`SheetReference`](crate::domain::sheets::sheet_reference::SheetReference).
#[derive(Debug, Clone)]
pub struct InMemoryWorksheet {
    title: String,
    grid: Arc<RwLock<Grid>>,
}

impl InMemoryWorksheet {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self::with_rows(title, Vec::<Vec<String>>::new())
    }

    pub fn with_rows<S, C>(title: S, rows: Vec<Vec<C>>) -> Self
    where
        S: Into<String>,
        C: Into<String>,
    {
        let cells: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let widest = cells.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let grid = Grid {
            rows: DEFAULT_ROWS.max(cells.len() as u32),
            columns: DEFAULT_COLUMNS.max(widest),
            cells,
        };
        InMemoryWorksheet {
            title: title.into(),
            grid: Arc::new(RwLock::new(grid)),
        }
    }

    /// Overrides the grid size (never below the data already held).
    pub async fn resize(&self, rows: u32, columns: u32) {
        let mut grid = self.grid.write().await;
        let widest = grid.cells.iter().map(Vec::len).max().unwrap_or(0) as u32;
        grid.rows = rows.max(grid.cells.len() as u32);
        grid.columns = columns.max(widest);
    }

    pub async fn grid_size(&self) -> (u32, u32) {
        let grid = self.grid.read().await;
        (grid.rows, grid.columns)
    }

    /// Raw cells, without the trimming `get_all_values` does.
    pub async fn snapshot(&self) -> Vec<Vec<String>> {
        self.grid.read().await.cells.clone()
    }

    fn local_range<'a>(&self, range: &'a A1Notation) -> &'a str {
        let prefix = format!("{}!", quote_sheet_title(&self.title));
        range.as_ref().strip_prefix(prefix.as_str()).unwrap_or(range.as_ref())
    }
}

/// A leading `'` only marks the input as literal text; the sheet does not store it.
fn user_entered(value: Value) -> Value {
    match value {
        Value::String(text) => match text.strip_prefix('\'') {
            Some(literal) => Value::String(literal.to_string()),
            None => Value::String(text),
        },
        other => other,
    }
}

fn trim_trailing_blanks(mut cells: Vec<Vec<String>>) -> Vec<Vec<String>> {
    for row in cells.iter_mut() {
        while row.last().is_some_and(String::is_empty) {
            row.pop();
        }
    }
    while cells.last().is_some_and(Vec::is_empty) {
        cells.pop();
    }
    cells
}

#[async_trait::async_trait]
impl Worksheet for InMemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn get_all_values(&self) -> error_stack::Result<Vec<Vec<String>>, WorksheetError> {
        Ok(trim_trailing_blanks(self.snapshot().await))
    }

    async fn clear(&self) -> error_stack::Result<(), WorksheetError> {
        self.grid.write().await.cells.clear();
        Ok(())
    }

    async fn ensure_grid(
        &self,
        row_count: u32,
        column_count: u32,
    ) -> error_stack::Result<(), WorksheetError> {
        let mut grid = self.grid.write().await;
        grid.rows = grid.rows.max(row_count);
        grid.columns = grid.columns.max(column_count);
        Ok(())
    }

    async fn update(
        &self,
        range: &A1Notation,
        rows: Vec<Vec<Value>>,
    ) -> error_stack::Result<(), WorksheetError> {
        if !self.local_range(range).starts_with("A1") {
            return Err(report!(WorksheetError::FailedToWriteRange)
                .attach_printable(format!("Range {} is not anchored at A1", range)));
        }

        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(user_entered).collect())
            .collect::<Vec<Vec<Value>>>()
            .into_cell_strings();
        let mut grid = self.grid.write().await;

        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        if height > grid.rows || width > grid.columns {
            return Err(report!(WorksheetError::FailedToWriteRange).attach_printable(format!(
                "Range {} exceeds grid limits {}x{}",
                range, grid.rows, grid.columns
            )));
        }

        for (index, row) in rows.into_iter().enumerate() {
            if grid.cells.len() <= index {
                grid.cells.resize(index + 1, Vec::new());
            }
            let target = &mut grid.cells[index];
            if target.len() < row.len() {
                target.resize(row.len(), String::new());
            }
            for (column, value) in row.into_iter().enumerate() {
                target[column] = value;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_all_values_trims_trailing_blanks() {
        let worksheet = InMemoryWorksheet::with_rows(
            "Data",
            vec![vec!["a", "", ""], vec!["b", "c", ""], vec!["", "", ""]],
        );
        assert_eq!(
            worksheet.get_all_values().await.unwrap(),
            vec![vec!["a".to_string()], vec!["b".to_string(), "c".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_clones_share_cells() {
        let worksheet = InMemoryWorksheet::with_rows("Data", vec![vec!["a"]]);
        let handle = worksheet.clone();
        worksheet.clear().await.unwrap();
        assert!(handle.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_writes_from_a1() {
        let worksheet = InMemoryWorksheet::new("Data");
        worksheet
            .update(
                &A1Notation("'Data'!A1:B2".to_string()),
                vec![vec![json!("x"), json!(1)], vec![json!("y"), json!(2)]],
            )
            .await
            .unwrap();
        assert_eq!(
            worksheet.snapshot().await,
            vec![
                vec!["x".to_string(), "1".to_string()],
                vec!["y".to_string(), "2".to_string()]
            ]
        );
    }

    #[tokio::test]
    async fn test_update_stores_literal_text_without_apostrophe() {
        let worksheet = InMemoryWorksheet::new("Data");
        worksheet
            .update(
                &A1Notation("'Data'!A1:B1".to_string()),
                vec![vec![json!("'00123"), json!("''quoted")]],
            )
            .await
            .unwrap();
        assert_eq!(
            worksheet.snapshot().await,
            vec![vec!["00123".to_string(), "'quoted".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_update_outside_grid_fails_until_grown() {
        let worksheet = InMemoryWorksheet::new("Data");
        worksheet.resize(1, 1).await;
        let range = A1Notation("'Data'!A1:B1".to_string());

        let report = worksheet
            .update(&range, vec![vec![json!("x"), json!("y")]])
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &WorksheetError::FailedToWriteRange);

        worksheet.ensure_grid(1, 2).await.unwrap();
        assert_eq!(worksheet.grid_size().await, (1, 2));
        worksheet
            .update(&range, vec![vec![json!("x"), json!("y")]])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_rejects_unanchored_range() {
        let worksheet = InMemoryWorksheet::new("Data");
        let report = worksheet
            .update(&A1Notation("'Data'!B2:C3".to_string()), vec![])
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &WorksheetError::FailedToWriteRange);
    }
}

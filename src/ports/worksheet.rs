use std::fmt::Debug;

use serde_json::Value;
use thiserror::Error;

use crate::domain::sheets::a1_notation::A1Notation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorksheetError {
    #[error("Failed to open spreadsheet")]
    FailedToOpenSpreadsheet,
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),
    #[error("Failed to fetch worksheet values")]
    FailedToFetchValues,
    #[error("Failed to clear worksheet")]
    FailedToClear,
    #[error("Failed to resize worksheet")]
    FailedToResize,
    #[error("Failed to write range")]
    FailedToWriteRange,
}

/// One worksheet of one spreadsheet, already authorized.
#[async_trait::async_trait]
pub trait Worksheet: Send + Sync + Debug {
    fn title(&self) -> &str;

    /// Every cell as displayed in the sheet, row-major. Rows may have different lengths.
    async fn get_all_values(&self) -> error_stack::Result<Vec<Vec<String>>, WorksheetError>;

    /// Empties every cell, keeping the grid size and formatting.
    async fn clear(&self) -> error_stack::Result<(), WorksheetError>;

    /// Grows the grid so it holds at least `row_count` x `column_count` cells. Never shrinks.
    async fn ensure_grid(
        &self,
        row_count: u32,
        column_count: u32,
    ) -> error_stack::Result<(), WorksheetError>;

    async fn update(
        &self,
        range: &A1Notation,
        rows: Vec<Vec<Value>>,
    ) -> error_stack::Result<(), WorksheetError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use error_stack::report;

    /// Which call of a [`BrokenWorksheet`] fails. Every other call succeeds and does nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum FailOn {
        Fetch,
        Clear,
        Resize,
        Update,
    }

    #[derive(Debug)]
    pub(crate) struct BrokenWorksheet(pub FailOn);

    #[async_trait::async_trait]
    impl Worksheet for BrokenWorksheet {
        fn title(&self) -> &str {
            "Broken"
        }

        async fn get_all_values(&self) -> error_stack::Result<Vec<Vec<String>>, WorksheetError> {
            match self.0 {
                FailOn::Fetch => Err(report!(WorksheetError::FailedToFetchValues)),
                _ => Ok(Vec::new()),
            }
        }

        async fn clear(&self) -> error_stack::Result<(), WorksheetError> {
            match self.0 {
                FailOn::Clear => Err(report!(WorksheetError::FailedToClear)),
                _ => Ok(()),
            }
        }

        async fn ensure_grid(&self, _: u32, _: u32) -> error_stack::Result<(), WorksheetError> {
            match self.0 {
                FailOn::Resize => Err(report!(WorksheetError::FailedToResize)),
                _ => Ok(()),
            }
        }

        async fn update(
            &self,
            _: &A1Notation,
            _: Vec<Vec<Value>>,
        ) -> error_stack::Result<(), WorksheetError> {
            match self.0 {
                FailOn::Update => Err(report!(WorksheetError::FailedToWriteRange)),
                _ => Ok(()),
            }
        }
    }
}

use error_stack::{Context, Report};
use thiserror::Error;

pub const MISSING_SERVICE_ACCOUNT: &str = "Missing Google Service Account information.";
pub const MISSING_SHEET_KEY: &str = "Missing the Google Sheet key identifier.";
pub const MISSING_SHEET_NAME: &str = "Missing the Google Sheet name identifier.";
pub const WRONG_SERVICE_ACCOUNT_TYPE: &str =
    "Wrong type for the Google Service Account param. Valid ones: dict, str";

pub const CREDENTIALS_ERROR_PREFIX: &str = "An error occurred while retrieving Google credentials";
pub const OPEN_ERROR_PREFIX: &str = "Error while opening the Sheet";
pub const READ_ERROR_PREFIX: &str = "Error while reading the Sheet";
pub const CLEAR_ERROR_PREFIX: &str = "Error while clearing the Sheet";
pub const WRITE_ERROR_PREFIX: &str = "Error while writing the Sheet";

/// Every failure a task can surface to its caller.
///
/// The variant says which stage failed; the message is meant for humans. Lower level errors
/// (HTTP, CSV, Sheets API) are kept below this context in the [`Report`], never returned as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetsError {
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    ServiceAccount(String),
    #[error("{0}")]
    Reference(String),
    #[error("{0}")]
    Read(String),
    #[error("{0}")]
    Clear(String),
    #[error("{0}")]
    Write(String),
}

impl SheetsError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        SheetsError::Configuration(message.into())
    }

    pub fn service_account<S: Into<String>>(message: S) -> Self {
        SheetsError::ServiceAccount(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            SheetsError::Configuration(message)
            | SheetsError::ServiceAccount(message)
            | SheetsError::Reference(message)
            | SheetsError::Read(message)
            | SheetsError::Clear(message)
            | SheetsError::Write(message) => message,
        }
    }
}

/// Re-roots a lower level report under a [`SheetsError`], folding the whole context chain of
/// the original report into the message as `"<prefix> - <chain>"`.
pub(crate) fn wrap_report<C: Context>(
    report: Report<C>,
    prefix: &str,
    kind: fn(String) -> SheetsError,
) -> Report<SheetsError> {
    let message = format!("{} - {:#}", prefix, report);
    report.change_context(kind(message))
}

use error_stack::report;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{SheetsError, MISSING_SERVICE_ACCOUNT, MISSING_SHEET_KEY, MISSING_SHEET_NAME};
use super::sheets::read_options::{OnBadLines, ReadOptions};

/// Keyword parameters shared by every sheet task, as an orchestrator passes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetTaskParams {
    pub is_public_sheet: bool,
    /// Service account key, either as a JSON object or as JSON text.
    pub google_service_account: Option<Value>,
    pub google_sheet_key: Option<String>,
    pub google_sheet_name: Option<String>,
    pub first_row_header: bool,
    pub on_bad_lines: OnBadLines,
    pub clean: bool,
}

impl Default for SheetTaskParams {
    fn default() -> Self {
        SheetTaskParams {
            is_public_sheet: false,
            google_service_account: None,
            google_sheet_key: None,
            google_sheet_name: None,
            first_row_header: true,
            on_bad_lines: OnBadLines::default(),
            clean: false,
        }
    }
}

/// Validated coordinates, borrowed from the params they came from.
#[derive(Debug, Clone, Copy)]
pub struct SheetCoordinates<'a> {
    pub is_public: bool,
    pub service_account: Option<&'a Value>,
    pub sheet_key: &'a str,
    pub sheet_name: &'a str,
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().map_or(false, |n| n == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

impl SheetTaskParams {
    /// Checks, in order, the service account (private sheets only), the sheet key and the
    /// sheet name. The first missing one is reported.
    pub fn validate(&self) -> error_stack::Result<SheetCoordinates<'_>, SheetsError> {
        let service_account = self.google_service_account.as_ref().filter(|v| !is_falsy(v));
        if !self.is_public_sheet && service_account.is_none() {
            return Err(report!(SheetsError::configuration(MISSING_SERVICE_ACCOUNT)));
        }

        let sheet_key = non_empty(&self.google_sheet_key)
            .ok_or_else(|| report!(SheetsError::configuration(MISSING_SHEET_KEY)))?;
        let sheet_name = non_empty(&self.google_sheet_name)
            .ok_or_else(|| report!(SheetsError::configuration(MISSING_SHEET_NAME)))?;

        Ok(SheetCoordinates {
            is_public: self.is_public_sheet,
            service_account,
            sheet_key,
            sheet_name,
        })
    }

    pub fn header_row(&self) -> Option<usize> {
        ReadOptions::header_row_for(self.first_row_header)
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            header_row: self.header_row(),
            parse_dates: true,
            on_bad_lines: self.on_bad_lines,
            clean: self.clean,
        }
    }
}

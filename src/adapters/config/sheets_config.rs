use error_stack::ResultExt;
use serde_json::Value;

use crate::domain::sheets::read_options::OnBadLines;

use super::app_config::ConfigError;

fn default_true() -> bool {
    true
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SheetsConfig {
    #[serde(default)]
    pub is_public_sheet: bool,
    /// Path to the service account JSON key. Not needed for public sheets.
    #[serde(default)]
    pub service_account_path: Option<String>,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    #[serde(default = "default_true")]
    pub first_row_header: bool,
    #[serde(default)]
    pub on_bad_lines: OnBadLines,
    #[serde(default)]
    pub clean: bool,
}

impl SheetsConfig {
    /// The key file contents as a JSON string, the same shape an orchestrator would pass.
    pub fn service_account(&self) -> error_stack::Result<Option<Value>, ConfigError> {
        let Some(path) = &self.service_account_path else {
            return Ok(None);
        };
        let contents = std::fs::read_to_string(path)
            .change_context_lazy(|| ConfigError::ServiceAccountFile(path.clone()))?;
        Ok(Some(Value::String(contents)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(service_account_path: Option<String>) -> SheetsConfig {
        SheetsConfig {
            is_public_sheet: false,
            service_account_path,
            spreadsheet_id: "1AbC".to_string(),
            sheet_name: "Sheet1".to_string(),
            first_row_header: true,
            on_bad_lines: OnBadLines::Error,
            clean: false,
        }
    }

    #[test]
    fn test_service_account_is_read_as_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"type": "service_account"}"#).unwrap();

        let value = config(Some(file.path().to_string_lossy().into_owned()))
            .service_account()
            .unwrap();
        assert_eq!(
            value,
            Some(Value::String(r#"{"type": "service_account"}"#.to_string()))
        );
    }

    #[test]
    fn test_service_account_absent_or_unreadable() {
        assert_eq!(config(None).service_account().unwrap(), None);

        let report = config(Some("/nonexistent/key.json".to_string()))
            .service_account()
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            ConfigError::ServiceAccountFile(_)
        ));
    }
}

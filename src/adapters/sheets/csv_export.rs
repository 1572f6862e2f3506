use error_stack::ResultExt;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum CsvExportError {
    #[error("Failed to fetch the CSV export")]
    FailedToFetch,
    #[error("CSV export answered with an error status")]
    ErrorStatus,
    #[error("Failed to read the CSV export body")]
    FailedToReadBody,
}

/// Downloads the CSV export of a public worksheet.
#[instrument]
pub async fn fetch_csv(url: &str) -> error_stack::Result<String, CsvExportError> {
    let response = reqwest::get(url)
        .await
        .change_context(CsvExportError::FailedToFetch)
        .attach_printable_lazy(|| format!("GET {}", url))?;

    let response = response
        .error_for_status()
        .change_context(CsvExportError::ErrorStatus)?;

    let body = response
        .text()
        .await
        .change_context(CsvExportError::FailedToReadBody)?;

    debug!(bytes = body.len(), "Fetched CSV export");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_fails_to_fetch() {
        let report = fetch_csv("http://127.0.0.1:1/export?format=csv&sheet=x")
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            CsvExportError::FailedToFetch
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_to_fetch() {
        let report = fetch_csv("not a url").await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            CsvExportError::FailedToFetch
        ));
    }
}

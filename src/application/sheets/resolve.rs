use error_stack::report;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::adapters::sheets::{auth::build_credentials, google_worksheet::GoogleWorksheet};
use crate::domain::error::{wrap_report, SheetsError, MISSING_SERVICE_ACCOUNT, OPEN_ERROR_PREFIX};
use crate::domain::sheets::sheet_reference::{public_export_url, SheetReference};

/// Turns sheet coordinates into something the reader or writer can consume.
///
/// Public sheets never look at `service_account`, whatever it holds. Private sheets build fresh
/// credentials, open the spreadsheet and select the worksheet; failing to open either is a
/// [`SheetsError::Reference`].
#[instrument(skip(service_account))]
pub async fn resolve_reference(
    is_public: bool,
    service_account: Option<&Value>,
    sheet_key: &str,
    sheet_name: &str,
) -> error_stack::Result<SheetReference, SheetsError> {
    if is_public {
        let url = public_export_url(sheet_key, sheet_name);
        debug!(url, "Resolved public sheet");
        return Ok(SheetReference::PublicUrl(url));
    }

    let service_account = service_account
        .ok_or_else(|| report!(SheetsError::configuration(MISSING_SERVICE_ACCOUNT)))?;

    let credentials = build_credentials(service_account).await?;
    let worksheet = GoogleWorksheet::open(credentials, sheet_key, sheet_name)
        .await
        .map_err(|report| wrap_report(report, OPEN_ERROR_PREFIX, SheetsError::Reference))?;

    debug!("Resolved private worksheet");
    Ok(SheetReference::PrivateWorksheet(Box::new(worksheet)))
}

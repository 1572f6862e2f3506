use std::borrow::Cow;
use std::fmt::Debug;

use error_stack::{report, Report};
use google_sheets4::oauth2::{self, authenticator::Authenticator, ServiceAccountKey};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::error::{
    wrap_report, SheetsError, CREDENTIALS_ERROR_PREFIX, WRONG_SERVICE_ACCOUNT_TYPE,
};

use super::http_client::{http_client, HttpClient, HttpsConnector};

pub const GOOGLE_CREDENTIALS_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/spreadsheets",
    "https://spreadsheets.google.com/feeds",
];

/// A service account identity limited to [`GOOGLE_CREDENTIALS_SCOPES`], with the HTTP client
/// its tokens are fetched through.
pub struct GoogleCredentials {
    authenticator: Authenticator<HttpsConnector>,
    client: HttpClient,
    client_email: String,
}

impl Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GoogleCredentials {{ client_email: {:?}, scopes: {:?} }}",
            self.client_email,
            self.scopes()
        )
    }
}

impl GoogleCredentials {
    pub fn scopes(&self) -> &'static [&'static str] {
        &GOOGLE_CREDENTIALS_SCOPES
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub(crate) fn into_parts(self) -> (HttpClient, Authenticator<HttpsConnector>) {
        (self.client, self.authenticator)
    }
}

fn credentials_error<C: error_stack::Context>(error: C) -> Report<SheetsError> {
    wrap_report(
        Report::new(error),
        CREDENTIALS_ERROR_PREFIX,
        SheetsError::ServiceAccount,
    )
}

/// Reads a service account descriptor: a JSON object, or a string holding one.
///
/// No I/O happens here, so a descriptor of the wrong shape is rejected before any client or
/// connection is created.
pub fn service_account_key(
    service_account: &Value,
) -> error_stack::Result<ServiceAccountKey, SheetsError> {
    let payload = match service_account {
        Value::Object(_) => Cow::Borrowed(service_account),
        Value::String(text) => {
            Cow::Owned(serde_json::from_str::<Value>(text).map_err(credentials_error)?)
        }
        _ => {
            return Err(report!(SheetsError::service_account(
                WRONG_SERVICE_ACCOUNT_TYPE
            )))
        }
    };

    if !payload.is_object() {
        return Err(report!(SheetsError::service_account(format!(
            "{} - the service account JSON must be an object",
            CREDENTIALS_ERROR_PREFIX
        ))));
    }

    ServiceAccountKey::deserialize(&*payload).map_err(credentials_error)
}

/// Builds fresh credentials from a service account descriptor. Nothing is cached.
#[instrument(skip(service_account))]
pub async fn build_credentials(
    service_account: &Value,
) -> error_stack::Result<GoogleCredentials, SheetsError> {
    let key = service_account_key(service_account)?;
    let client_email = key.client_email.clone();

    let client = http_client();
    let authenticator = oauth2::ServiceAccountAuthenticator::with_client(key, client.clone())
        .build()
        .await
        .map_err(credentials_error)?;

    debug!(client_email = %client_email, "Built service account credentials");
    Ok(GoogleCredentials {
        authenticator,
        client,
        client_email,
    })
}

use std::fmt::Formatter;

use reqwest::Url;

use crate::ports::worksheet::Worksheet;

const EXPORT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Where a read or write goes. Built by the resolver, consumed by exactly one read or write.
pub enum SheetReference {
    PublicUrl(String),
    PrivateWorksheet(Box<dyn Worksheet>),
}

impl std::fmt::Display for SheetReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetReference::PublicUrl(url) => write!(f, "{}", url),
            SheetReference::PrivateWorksheet(worksheet) => {
                write!(f, "worksheet '{}'", worksheet.title())
            }
        }
    }
}

impl std::fmt::Debug for SheetReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetReference::PublicUrl(url) => f.debug_tuple("PublicUrl").field(url).finish(),
            SheetReference::PrivateWorksheet(worksheet) => {
                f.debug_tuple("PrivateWorksheet").field(worksheet).finish()
            }
        }
    }
}

/// CSV export URL of one worksheet of a link-shared spreadsheet.
///
/// Purely syntactic: nothing checks that the key or the worksheet exist.
pub fn public_export_url(sheet_key: &str, sheet_name: &str) -> String {
    let base = format!("{}/{}/export", EXPORT_BASE_URL, sheet_key);
    match Url::parse_with_params(&base, &[("format", "csv"), ("sheet", sheet_name)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}?format=csv&sheet={}", base, sheet_name),
    }
}

use serde::{Deserialize, Serialize};

/// What to do with a row holding more fields than the header.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OnBadLines {
    #[default]
    Error,
    Warn,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Index of the row holding column names. Rows above it are discarded.
    pub header_row: Option<usize>,
    pub parse_dates: bool,
    pub on_bad_lines: OnBadLines,
    /// Drop fully empty columns and rows after parsing.
    pub clean: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            header_row: Some(0),
            parse_dates: true,
            on_bad_lines: OnBadLines::Error,
            clean: false,
        }
    }
}

impl ReadOptions {
    pub fn header_row_for(first_row_header: bool) -> Option<usize> {
        first_row_header.then_some(0)
    }
}

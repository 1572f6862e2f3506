use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The value as sent to the Sheets API with `USER_ENTERED` input. Only dates and date-times
    /// are left for the sheet to interpret.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Empty => Value::String(String::new()),
            CellValue::Bool(value) => Value::Bool(*value),
            CellValue::Integer(value) => Value::from(*value),
            CellValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(value.to_string())),
            CellValue::Date(value) => Value::String(value.format("%Y-%m-%d").to_string()),
            CellValue::DateTime(value) => {
                Value::String(value.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            CellValue::Text(value) => literal_text(value),
        }
    }
}

/// Text as a `USER_ENTERED` value that the sheet keeps verbatim: the leading `'` stops it
/// from being read as a formula, number or date, and is not part of the stored cell.
pub fn literal_text(text: &str) -> Value {
    if text.is_empty() {
        Value::String(String::new())
    } else {
        Value::String(format!("'{}", text))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_owned())
        }
    }
}

/// The type a whole column settles on after looking at every non-empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Date,
    DateTime,
    Text,
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Picks the narrowest kind every non-empty cell of the column fits in.
///
/// Dates are only considered when `parse_dates` is set; a column mixing plain dates and
/// date-times becomes [`ColumnKind::DateTime`].
pub fn infer_column_kind<'a, I>(cells: I, parse_dates: bool) -> ColumnKind
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    if cells.clone().into_iter().all(str::is_empty) {
        return ColumnKind::Text;
    }

    let all = |predicate: &dyn Fn(&str) -> bool| {
        cells
            .clone()
            .into_iter()
            .filter(|cell| !cell.is_empty())
            .all(predicate)
    };

    if all(&|cell| cell.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if all(&|cell| parse_float(cell).is_some()) {
        ColumnKind::Float
    } else if all(&|cell| parse_bool(cell).is_some()) {
        ColumnKind::Bool
    } else if parse_dates && all(&|cell| parse_date(cell).is_some()) {
        ColumnKind::Date
    } else if parse_dates
        && all(&|cell| parse_date(cell).is_some() || parse_date_time(cell).is_some())
    {
        ColumnKind::DateTime
    } else {
        ColumnKind::Text
    }
}

/// Converts one raw cell to the column's kind. Cells that do not fit stay text.
pub fn convert_cell(raw: &str, kind: ColumnKind) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }

    let converted = match kind {
        ColumnKind::Integer => raw.parse::<i64>().ok().map(CellValue::Integer),
        ColumnKind::Float => parse_float(raw).map(CellValue::Float),
        ColumnKind::Bool => parse_bool(raw).map(CellValue::Bool),
        ColumnKind::Date => parse_date(raw).map(CellValue::Date),
        ColumnKind::DateTime => parse_date_time(raw)
            .or_else(|| parse_date(raw).and_then(|date| date.and_hms_opt(0, 0, 0)))
            .map(CellValue::DateTime),
        ColumnKind::Text => None,
    };

    converted.unwrap_or_else(|| CellValue::text(raw))
}

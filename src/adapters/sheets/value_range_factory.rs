use google_sheets4::api::ValueRange;
use serde_json::Value;

pub trait ValueRangeFactory {
    fn from_rows(rows: Vec<Vec<Value>>) -> Self;
}

impl ValueRangeFactory for ValueRange {
    fn from_rows(rows: Vec<Vec<Value>>) -> Self {
        ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(rows),
        }
    }
}

pub trait IntoCellStrings {
    fn into_cell_strings(self) -> Vec<Vec<String>>;
}

impl IntoCellStrings for Vec<Vec<Value>> {
    fn into_cell_strings(self) -> Vec<Vec<String>> {
        self.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| match value {
                        Value::String(text) => text,
                        Value::Null => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

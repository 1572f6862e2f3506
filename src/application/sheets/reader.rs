use error_stack::ResultExt;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::adapters::sheets::csv_export::fetch_csv;
use crate::domain::error::{wrap_report, SheetsError, READ_ERROR_PREFIX};
use crate::domain::sheets::{
    read_options::ReadOptions,
    sheet_reference::SheetReference,
    table::Table,
    tabular::{parse_csv, parse_values},
};

#[derive(Error, Debug)]
enum ReadFailure {
    #[error("Failed to fetch the sheet contents")]
    Fetch,
    #[error("Failed to parse the sheet contents")]
    Parse,
}

async fn fetch_and_parse(
    reference: SheetReference,
    options: &ReadOptions,
) -> error_stack::Result<Table, ReadFailure> {
    match reference {
        SheetReference::PublicUrl(url) => {
            let text = fetch_csv(&url).await.change_context(ReadFailure::Fetch)?;
            parse_csv(&text, options).change_context(ReadFailure::Parse)
        }
        SheetReference::PrivateWorksheet(worksheet) => {
            let values = worksheet
                .get_all_values()
                .await
                .change_context(ReadFailure::Fetch)
                .attach_printable_lazy(|| format!("Worksheet {}", worksheet.title()))?;
            parse_values(values, options).change_context(ReadFailure::Parse)
        }
    }
}

/// Reads the whole sheet behind `reference` into a [`Table`].
///
/// Fetch and parse failures both come back as [`SheetsError::Read`].
#[instrument(
    skip_all,
    fields(%reference, header_row = ?options.header_row, clean = options.clean)
)]
pub async fn read_table(
    reference: SheetReference,
    options: &ReadOptions,
) -> error_stack::Result<Table, SheetsError> {
    let mut table = fetch_and_parse(reference, options)
        .await
        .map_err(|report| wrap_report(report, READ_ERROR_PREFIX, SheetsError::Read))?;

    if options.clean {
        table.drop_empty();
    }

    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Read sheet"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sheets::memory_worksheet::InMemoryWorksheet;
    use crate::domain::sheets::cell_value::CellValue;
    use crate::ports::worksheet::testing::{BrokenWorksheet, FailOn};

    fn private(worksheet: InMemoryWorksheet) -> SheetReference {
        SheetReference::PrivateWorksheet(Box::new(worksheet))
    }

    #[tokio::test]
    async fn test_read_without_header() {
        let worksheet = InMemoryWorksheet::with_rows("Sheet1", vec![vec!["foo"], vec!["bar"]]);
        let options = ReadOptions {
            header_row: None,
            ..ReadOptions::default()
        };

        let table = read_table(private(worksheet), &options).await.unwrap();
        assert_eq!(
            table.rows(),
            vec![vec![CellValue::text("foo")], vec![CellValue::text("bar")]]
        );
    }

    #[tokio::test]
    async fn test_read_with_header_as_column_map() {
        let worksheet = InMemoryWorksheet::with_rows(
            "Sheet1",
            vec![vec!["col_1", "col_2"], vec!["foo", "bar"]],
        );

        let table = read_table(private(worksheet), &ReadOptions::default())
            .await
            .unwrap();
        let map = table.into_column_map();

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["col_1", "col_2"]);
        assert_eq!(map["col_1"], vec![CellValue::text("foo")]);
        assert_eq!(map["col_2"], vec![CellValue::text("bar")]);
    }

    #[tokio::test]
    async fn test_read_header_with_trailing_blank_cell() {
        let worksheet =
            InMemoryWorksheet::with_rows("Sheet1", vec![vec!["name", ""], vec!["x", "y"]]);

        let table = read_table(private(worksheet), &ReadOptions::default())
            .await
            .unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["name", "Unnamed: 1"]
        );
        assert_eq!(
            table.rows(),
            vec![vec![CellValue::text("x"), CellValue::text("y")]]
        );
    }

    #[tokio::test]
    async fn test_clean_drops_empty_column_and_row() {
        let worksheet = InMemoryWorksheet::with_rows(
            "Sheet1",
            vec![
                vec!["a", "b", "c"],
                vec!["1", "", "x"],
                vec!["", "", ""],
                vec!["2", "", "y"],
            ],
        );
        let options = ReadOptions {
            clean: true,
            ..ReadOptions::default()
        };

        let table = read_table(private(worksheet), &options).await.unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(
            table.rows(),
            vec![
                vec![CellValue::Integer(1), CellValue::text("x")],
                vec![CellValue::Integer(2), CellValue::text("y")],
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_a_read_error() {
        let reference = SheetReference::PrivateWorksheet(Box::new(BrokenWorksheet(FailOn::Fetch)));
        let report = read_table(reference, &ReadOptions::default())
            .await
            .unwrap_err();

        match report.current_context() {
            SheetsError::Read(message) => {
                assert!(message.starts_with("Error while reading the Sheet - "));
                assert!(message.contains("Failed to fetch worksheet values"));
            }
            other => panic!("expected a read error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_sheet_is_a_read_error() {
        let worksheet = InMemoryWorksheet::new("Sheet1");
        let report = read_table(private(worksheet), &ReadOptions::default())
            .await
            .unwrap_err();

        match report.current_context() {
            SheetsError::Read(message) => {
                assert!(message.contains("No columns to parse from file"))
            }
            other => panic!("expected a read error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_public_url_is_a_read_error() {
        let reference = SheetReference::PublicUrl("http://127.0.0.1:1/export".to_string());
        let report = read_table(reference, &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), SheetsError::Read(_)));
    }
}

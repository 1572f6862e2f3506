use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use super::cell_value::CellValue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl TableColumn {
    pub fn new<S: Into<String>>(name: S, values: Vec<CellValue>) -> Self {
        TableColumn {
            name: name.into(),
            values,
        }
    }

    fn is_blank(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Column {name} has {found} values, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Column name {0} appears more than once")]
    DuplicateColumn(String),
}

/// Named columns of equal length, in sheet order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<TableColumn>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(ragged) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(TableError::RaggedColumn {
                    name: ragged.name.clone(),
                    expected,
                    found: ragged.values.len(),
                });
            }
        }

        for (index, column) in columns.iter().enumerate() {
            if columns[..index].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Table { columns })
    }

    /// Builds a table from column names and row-major data. Short rows are padded with
    /// [`CellValue::Empty`], extra cells are dropped.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, TableError> {
        let mut columns: Vec<TableColumn> = names
            .into_iter()
            .map(|name| TableColumn::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or(CellValue::Empty));
            }
        }

        Table::new(columns)
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Row-major copy of the data. The header is never part of it.
    pub fn rows(&self) -> Vec<Vec<CellValue>> {
        (0..self.row_count())
            .map(|index| self.columns.iter().map(|c| c.values[index].clone()).collect())
            .collect()
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        let row_count = self.row_count();
        let mut rows: Vec<Vec<CellValue>> = (0..row_count)
            .map(|_| Vec::with_capacity(self.columns.len()))
            .collect();
        for column in self.columns {
            for (row, value) in rows.iter_mut().zip(column.values) {
                row.push(value);
            }
        }
        rows
    }

    pub fn to_column_map(&self) -> IndexMap<String, Vec<CellValue>> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.values.clone()))
            .collect()
    }

    pub fn into_column_map(self) -> IndexMap<String, Vec<CellValue>> {
        self.columns.into_iter().map(|c| (c.name, c.values)).collect()
    }

    /// Drops fully empty columns, then fully empty rows.
    ///
    /// Columns go first: a row can only look non-empty because of a column that is about to be
    /// dropped.
    pub fn drop_empty(&mut self) {
        self.columns.retain(|column| !column.is_blank());

        let keep: Vec<bool> = (0..self.row_count())
            .map(|index| self.columns.iter().any(|c| !c.values[index].is_empty()))
            .collect();

        for column in self.columns.iter_mut() {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&true));
        }
    }
}

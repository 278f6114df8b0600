use serde::Serialize;

use crate::{error::{Error, Result}, sql::types::{DataType, Row}};

/// Table held by the store: ordered columns plus rows aligned to them
///
/// Row width is not checked against the column count, callers loading data
/// are responsible for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Returns the position of the first column with the given name
    pub fn col_index(&self, col_name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == col_name)
    }

    /// Like `col_index`, failing with a column-not-found error
    pub fn must_col_index(&self, col_name: &str, table_name: &str) -> Result<usize> {
        self.col_index(col_name).ok_or_else(|| Error::ColumnNotFound {
            column: col_name.to_string(),
            table: table_name.to_string(),
        })
    }
}

/// Column schema definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: DataType) -> Self {
        Self { name: name.into(), datatype }
    }
}

use std::fmt::Display;

/// Custom Result type for tinysql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tinysql
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Structural SQL error, the message is shown to the user verbatim
    Parse(String),
    /// Lookup of a table that is not in the store
    TableNotFound(String),
    /// Qualified projection item whose qualifier is neither table nor alias
    InvalidColumnReference(String),
    /// Projection item naming a column the table does not have
    ColumnNotFound { column: String, table: String },
    /// Failure while filtering rows through a WHERE clause
    InvalidWhere(Box<Error>),
    /// Condition whose comparison operator the evaluator does not know
    UnsupportedOperator(String),
    /// Internal error (json, regex, malformed condition)
    Internal(String),
}

impl Error {
    /// Structural and lookup errors are reported without a statement prefix
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::TableNotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(value: regex::Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "{}", err),
            Error::TableNotFound(name) => write!(f, "Table '{}' not found", name),
            Error::InvalidColumnReference(item) => {
                write!(f, "Invalid column reference '{}'", item)
            }
            Error::ColumnNotFound { column, table } => {
                write!(f, "Column '{}' not found in table '{}'", column, table)
            }
            Error::InvalidWhere(err) => write!(f, "Invalid WHERE clause: {}", err),
            Error::UnsupportedOperator(op) => write!(f, "Unsupported operator: {}", op),
            Error::Internal(err) => write!(f, "{}", err),
        }
    }
}

use crate::sql::{schema::Column, types::Value};

/// Statement kinds recognised by their leading keywords
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementKind {
    Select,
    Insert,
    CreateTable,
    DropTable,
    Update,
    Delete,
    AlterTable,
    TruncateTable,
    Savepoint,
    Commit,
    Rollback,
}

impl StatementKind {
    /// Detection order
    pub const ALL: [StatementKind; 11] = [
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::CreateTable,
        StatementKind::DropTable,
        StatementKind::Update,
        StatementKind::Delete,
        StatementKind::AlterTable,
        StatementKind::TruncateTable,
        StatementKind::Savepoint,
        StatementKind::Commit,
        StatementKind::Rollback,
    ];

    /// Uppercase leading keywords of the statement
    pub fn prefix(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::CreateTable => "CREATE TABLE",
            StatementKind::DropTable => "DROP TABLE",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::AlterTable => "ALTER TABLE",
            StatementKind::TruncateTable => "TRUNCATE TABLE",
            StatementKind::Savepoint => "SAVEPOINT",
            StatementKind::Commit => "COMMIT",
            StatementKind::Rollback => "ROLLBACK",
        }
    }
}

/// Parsed SQL statements
#[derive(Debug, PartialEq)]
pub enum Statement {
    /// SELECT statement
    Select {
        projection: Projection,
        table_name: String,
        /// Empty when no alias was given
        alias: String,
        /// Flat condition list, empty without WHERE
        conditions: Vec<Condition>,
    },
    /// INSERT statement
    Insert {
        table_name: String,
        /// None means every column of the table in declared order
        columns: Option<Vec<String>>,
        /// None when the VALUES group is malformed; reported after the
        /// table lookup
        values: Option<Vec<Value>>,
    },
    /// CREATE TABLE statement
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    /// DROP TABLE statement
    DropTable { name: String },
    /// TRUNCATE TABLE statement
    TruncateTable { name: String },
    /// UPDATE, accepted and acknowledged only
    Update,
    /// DELETE, accepted and acknowledged only
    Delete,
    /// ALTER TABLE, accepted and acknowledged only
    AlterTable,
    /// SAVEPOINT statement
    Savepoint { name: String },
    Commit,
    Rollback,
}

/// SELECT projection list
#[derive(Debug, PartialEq)]
pub enum Projection {
    /// `*`, every column in declared order
    All,
    /// Raw comma-separated items, `column` or `qualifier.column`
    Items(Vec<String>),
}

/// Comparison operator of a condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
    In,
    Is,
    Not,
}

impl CompareOp {
    pub fn to_str(&self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "<>",
            CompareOp::LessThan => "<",
            CompareOp::LessThanOrEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanOrEqual => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::In => "IN",
            CompareOp::Is => "IS",
            CompareOp::Not => "NOT",
        }
    }
}

/// Boolean connective that followed a condition
///
/// Recorded for display only: every condition is applied with AND.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalOp {
    And,
    Or,
}

/// One `field operator value` unit of a WHERE clause
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    /// Field key, qualified with the table alias when written bare
    pub field: Option<String>,
    pub operator: Option<CompareOp>,
    /// Literal text with quote characters removed
    pub value: Option<String>,
    pub logical: Option<LogicalOp>,
}

impl Condition {
    pub fn is_empty(&self) -> bool {
        self.field.is_none()
            && self.operator.is_none()
            && self.value.is_none()
            && self.logical.is_none()
    }
}

use std::fmt::Display;

use serde::Serialize;

use crate::{
    error::Result,
    sql::{
        engine::Storage,
        executor::{
            mutation::{Delete, Insert, Update},
            query::Scan,
            schema::{AlterTable, CreateTable, DropTable, TruncateTable},
            transaction::{Commit, Rollback, Savepoint},
        },
        parser::ast::Statement,
        schema::Column,
        types::{Row, Value},
    },
};

mod filter;
mod mutation;
mod query;
mod schema;
mod transaction;

/// SQL executor trait
pub trait Executor<S: Storage> {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult>;
}

/// Builds an executor from a parsed statement
impl<S: Storage + 'static> dyn Executor<S> {
    pub fn build(stmt: Statement) -> Box<dyn Executor<S>> {
        match stmt {
            Statement::Select {
                projection,
                table_name,
                alias,
                conditions,
            } => Scan::new(projection, table_name, alias, conditions),
            Statement::Insert {
                table_name,
                columns,
                values,
            } => Insert::new(table_name, columns, values),
            Statement::CreateTable { name, columns } => CreateTable::new(name, columns),
            Statement::DropTable { name } => DropTable::new(name),
            Statement::TruncateTable { name } => TruncateTable::new(name),
            Statement::Update => Box::new(Update),
            Statement::Delete => Box::new(Delete),
            Statement::AlterTable => Box::new(AlterTable),
            Statement::Savepoint { name } => Savepoint::new(name),
            Statement::Commit => Box::new(Commit),
            Statement::Rollback => Box::new(Rollback),
        }
    }
}

/// Rows returned by SELECT
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// Outcome of a statement: a result set or a status/error message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Rows(ResultSet),
    Status(String),
}

impl QueryResult {
    pub fn status(message: impl Into<String>) -> Self {
        QueryResult::Status(message.into())
    }

    pub fn is_rows(&self) -> bool {
        matches!(self, QueryResult::Rows(_))
    }

    pub fn as_rows(&self) -> Option<&ResultSet> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::Status(_) => None,
        }
    }

    pub fn as_status(&self) -> Option<&str> {
        match self {
            QueryResult::Rows(_) => None,
            QueryResult::Status(message) => Some(message),
        }
    }
}

impl Display for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryResult::Rows(rows) => write!(f, "{}", rows),
            QueryResult::Status(message) => f.write_str(message),
        }
    }
}

/// Renders the result set as a plain text grid
///
/// id | name
/// ---+------
/// 1  | Alice
impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.columns.is_empty() {
            return f.write_str("No columns to display");
        }

        let cells = self
            .rows
            .iter()
            .map(|row| row.iter().map(Value::to_string).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let mut widths = self.columns.iter().map(|c| c.name.len()).collect::<Vec<_>>();
        for row in &cells {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let line = |values: Vec<&str>| {
            values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{:<width$}", v, width = *w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{}", line(self.columns.iter().map(|c| c.name.as_str()).collect()))?;
        let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-");
        write!(f, "{}", rule)?;
        if cells.is_empty() {
            return write!(f, "\nNo data returned");
        }
        for row in &cells {
            write!(f, "\n{}", line(row.iter().map(String::as_str).collect()))?;
        }
        Ok(())
    }
}

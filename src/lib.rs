//! tinysql - An in-memory SQL executor for tabular data
//!
//! This crate provides a small SQL engine over tables held in memory:
//! - SQL parsing (statement detection, lexer for WHERE, AST)
//! - Query and mutation execution against a table store
//! - SAVEPOINT/COMMIT/ROLLBACK over a snapshot stack
//! - JSON, CSV and SQL import/export of the store
//!
//! Every query returns a `QueryResult`: rows for SELECT, a message otherwise.
//! Failures are reported as messages too, `execute_query` never errors.

pub mod error;
pub mod sql;
pub mod storage;

pub use sql::{
    engine::SqlExecutor,
    executor::{QueryResult, ResultSet},
    schema::Column,
    types::{DataType, Row, Value},
};

//! SQL processing module
//!
//! This module provides:
//! - `parser`: statement detection, WHERE lexer and parser
//! - `types`: type tags and cell values
//! - `schema`: Table and column definitions
//! - `executor`: Query, mutation and savepoint execution
//! - `engine`: Storage abstraction and the `SqlExecutor` session

pub mod parser;
pub mod types;
pub mod schema;
pub mod executor;
pub mod engine;

//! In-memory state behind the SQL engine
//!
//! - `memory`: the insertion-ordered table map
//! - `snapshot`: the savepoint stack of table maps

pub mod memory;
pub mod snapshot;

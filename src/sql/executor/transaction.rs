use crate::{
    error::Result,
    sql::{
        engine::Storage,
        executor::{Executor, QueryResult},
    },
};

/// SAVEPOINT executor
///
/// The name is only echoed back; ROLLBACK always returns to the newest
/// savepoint regardless of name.
pub struct Savepoint {
    name: String,
}

impl Savepoint {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for Savepoint {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        storage.savepoint();
        Ok(QueryResult::status(format!("Savepoint '{}' created.", self.name)))
    }
}

pub struct Commit;

impl<S: Storage> Executor<S> for Commit {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        storage.commit();
        Ok(QueryResult::status("Transaction committed."))
    }
}

pub struct Rollback;

impl<S: Storage> Executor<S> for Rollback {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        Ok(QueryResult::status(if storage.rollback() {
            "Transaction rolled back."
        } else {
            "No transaction to roll back."
        }))
    }
}

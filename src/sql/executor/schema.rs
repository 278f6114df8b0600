use crate::{
    error::Result,
    sql::{
        engine::Storage,
        executor::{Executor, QueryResult},
        schema::{Column, Table},
    },
};

/// CREATE TABLE executor, replaces a table of the same name
pub struct CreateTable {
    name: String,
    columns: Vec<Column>,
}

impl CreateTable {
    pub fn new(name: String, columns: Vec<Column>) -> Box<Self> {
        Box::new(Self { name, columns })
    }
}

impl<S: Storage> Executor<S> for CreateTable {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        let Self { name, columns } = *self;
        let message = format!("Table '{}' created", name);
        storage.put_table(name, Table::new(columns, Vec::new()));
        Ok(QueryResult::status(message))
    }
}

pub struct DropTable {
    name: String,
}

impl DropTable {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for DropTable {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        Ok(QueryResult::status(if storage.drop_table(&self.name) {
            format!("Table '{}' dropped.", self.name)
        } else {
            format!("Table '{}' does not exist.", self.name)
        }))
    }
}

/// TRUNCATE TABLE executor: keeps the columns, empties the rows
pub struct TruncateTable {
    name: String,
}

impl TruncateTable {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for TruncateTable {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        Ok(QueryResult::status(match storage.get_table_mut(&self.name) {
            Some(table) => {
                table.rows.clear();
                format!("Table '{}' truncated.", self.name)
            }
            None => format!("Table '{}' does not exist.", self.name),
        }))
    }
}

/// ALTER TABLE is acknowledged but not applied
pub struct AlterTable;

impl<S: Storage> Executor<S> for AlterTable {
    fn execute(self: Box<Self>, _storage: &mut S) -> Result<QueryResult> {
        Ok(QueryResult::status("ALTER TABLE query executed."))
    }
}

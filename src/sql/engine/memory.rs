use tracing::debug;

use crate::{
    sql::schema::Table,
    storage::{memory::TableMap, snapshot::SnapshotStack},
};

use super::Storage;

/// Memory backed storage: the live table map plus its savepoint stack
#[derive(Debug, Default)]
pub struct MemoryEngine {
    tables: TableMap,
    snapshots: SnapshotStack<TableMap>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryEngine {
    fn savepoint(&mut self) {
        self.snapshots.push(&self.tables);
        debug!(depth = self.snapshots.depth(), "savepoint pushed");
    }

    fn commit(&mut self) {
        self.snapshots.clear();
    }

    fn rollback(&mut self) -> bool {
        match self.snapshots.pop() {
            Some(tables) => {
                self.tables = tables;
                debug!(depth = self.snapshots.depth(), "savepoint restored");
                true
            }
            None => false,
        }
    }

    fn snapshot_depth(&self) -> usize {
        self.snapshots.depth()
    }

    fn put_table(&mut self, name: String, table: Table) {
        self.tables.set(name, table);
    }

    fn drop_table(&mut self, name: &str) -> bool {
        self.tables.remove(name)
    }

    fn clear(&mut self) {
        self.tables.clear();
    }

    fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    fn table_names(&self) -> Vec<String> {
        self.tables.names().map(str::to_string).collect()
    }
}

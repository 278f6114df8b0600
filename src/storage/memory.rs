use std::{collections::HashMap, rc::Rc};

use crate::sql::schema::Table;

/// In-memory table map keyed by table name
///
/// Names keep their first insertion order; replacing a table keeps its slot,
/// removing and re-adding moves it to the end. Tables are reference counted:
/// cloning the map copies only the name bindings, and `get_mut` clones a
/// table the first time it is written while another map still shares it.
#[derive(Debug, Clone, Default)]
pub struct TableMap {
    names: Vec<String>,
    tables: HashMap<String, Rc<Table>>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the table stored under `name`
    pub fn set(&mut self, name: String, table: Table) {
        if !self.tables.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.tables.insert(name, Rc::new(table));
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name).map(Rc::as_ref)
    }

    /// Mutable access, detaching the table from any map sharing it
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name).map(Rc::make_mut)
    }

    /// Removes the table, returns whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        if self.tables.remove(name).is_none() {
            return false;
        }
        self.names.retain(|n| n != name);
        true
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.tables.clear();
    }

    /// Table names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

use crate::{
    error::{Error, Result},
    sql::{
        engine::Storage,
        executor::{QueryResult, ResultSet},
        parser::ast::{Condition, Projection},
        schema::{Column, Table},
        types::{Row, Value},
    },
};

use super::{
    filter::{evaluate, row_lookup},
    Executor,
};

/// Table scan executor (SELECT)
pub struct Scan {
    projection: Projection,
    table_name: String,
    alias: String,
    conditions: Vec<Condition>,
}

impl Scan {
    pub fn new(
        projection: Projection,
        table_name: String,
        alias: String,
        conditions: Vec<Condition>,
    ) -> Box<Self> {
        Box::new(Self {
            projection,
            table_name,
            alias,
            conditions,
        })
    }

    /// Name fields are qualified with: the alias, or the table name without one
    fn qualifier(&self) -> &str {
        if self.alias.is_empty() {
            &self.table_name
        } else {
            &self.alias
        }
    }

    /// Resolves a projection item to a column position
    ///
    /// `qualifier.column` must name the alias or the table; only the first
    /// two dot-separated parts are read.
    fn resolve(&self, table: &Table, item: &str) -> Result<usize> {
        let (qualifier, column) = match item.split_once('.') {
            Some((qualifier, rest)) => (qualifier, rest.split('.').next().unwrap_or_default()),
            None => (self.qualifier(), item),
        };
        if (qualifier != self.alias && qualifier != self.table_name) || column.is_empty() {
            return Err(Error::InvalidColumnReference(item.to_string()));
        }
        table.must_col_index(column, &self.table_name)
    }
}

impl<S: Storage> Executor<S> for Scan {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        let table = storage.must_get_table(&self.table_name)?;

        let indices = match &self.projection {
            Projection::All => (0..table.columns.len()).collect::<Vec<_>>(),
            Projection::Items(items) => items
                .iter()
                .map(|item| self.resolve(table, item))
                .collect::<Result<Vec<_>>>()?,
        };
        let columns: Vec<Column> = indices.iter().map(|&i| table.columns[i].clone()).collect();

        let mut rows: Vec<Row> = Vec::new();
        for row in &table.rows {
            if !self.conditions.is_empty() {
                let lookup = row_lookup(&table.columns, row, self.qualifier());
                let keep = evaluate(&self.conditions, &lookup)
                    .map_err(|err| Error::InvalidWhere(Box::new(err)))?;
                if !keep {
                    continue;
                }
            }
            rows.push(
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                    .collect(),
            );
        }

        Ok(QueryResult::Rows(ResultSet { columns, rows }))
    }
}

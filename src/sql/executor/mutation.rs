use crate::{
    error::{Error, Result},
    sql::{
        engine::Storage,
        executor::QueryResult,
        schema::Table,
        types::{Row, Value},
    },
};

use super::Executor;

/// INSERT executor
pub struct Insert {
    table_name: String,
    columns: Option<Vec<String>>,
    values: Option<Vec<Value>>,
}

impl Insert {
    pub fn new(
        table_name: String,
        columns: Option<Vec<String>>,
        values: Option<Vec<Value>>,
    ) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            values,
        })
    }
}

// Places values by column name:
// tbl: a, b, c
// insert into tbl(c, a) values(1, 2);
//  a      b      c
//  2    NULL     1
// names that are not columns of the table are skipped
fn make_row(table: &Table, columns: &[String], values: Vec<Value>) -> Result<Row> {
    if columns.len() != values.len() {
        return Err(Error::Parse(
            "Number of values doesn't match number of columns".into(),
        ));
    }

    let mut row = vec![Value::Null; table.columns.len()];
    for (name, value) in columns.iter().zip(values) {
        if let Some(i) = table.col_index(name) {
            row[i] = value;
        }
    }
    Ok(row)
}

impl<S: Storage> Executor<S> for Insert {
    fn execute(self: Box<Self>, storage: &mut S) -> Result<QueryResult> {
        let Self {
            table_name,
            columns,
            values,
        } = *self;
        let table = storage.must_get_table(&table_name)?;
        let values = values.ok_or_else(|| Error::Parse("Invalid VALUES format".into()))?;

        let row = match &columns {
            Some(columns) => make_row(table, columns, values)?,
            None => {
                let all = table.columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>();
                make_row(table, &all, values)?
            }
        };
        storage.append_row(&table_name, row)?;

        Ok(QueryResult::status("1 row inserted."))
    }
}

/// UPDATE is acknowledged but not applied
pub struct Update;

impl<S: Storage> Executor<S> for Update {
    fn execute(self: Box<Self>, _storage: &mut S) -> Result<QueryResult> {
        Ok(QueryResult::status("UPDATE query executed."))
    }
}

/// DELETE is acknowledged but not applied
pub struct Delete;

impl<S: Storage> Executor<S> for Delete {
    fn execute(self: Box<Self>, _storage: &mut S) -> Result<QueryResult> {
        Ok(QueryResult::status("DELETE query executed."))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{Error, Result},
        sql::{
            engine::{MemoryEngine, Storage},
            executor::{Executor, QueryResult},
            parser::Parser,
            schema::{Column, Table},
            types::{DataType, Value},
        },
    };

    fn engine() -> MemoryEngine {
        let mut engine = MemoryEngine::new();
        engine.put_table(
            "t".into(),
            Table::new(
                vec![
                    Column::new("a", DataType::Integer),
                    Column::new("b", DataType::Text),
                    Column::new("c", DataType::Text),
                ],
                vec![],
            ),
        );
        engine
    }

    fn run(engine: &mut MemoryEngine, sql: &str) -> Result<QueryResult> {
        <dyn Executor<MemoryEngine>>::build(Parser::new(sql).parse()?).execute(engine)
    }

    fn rows(engine: &MemoryEngine) -> Vec<Vec<Value>> {
        engine.get_table("t").map(|t| t.rows.clone()).unwrap_or_default()
    }

    #[test]
    fn test_insert_named_columns() -> Result<()> {
        let mut engine = engine();
        assert_eq!(
            run(&mut engine, "INSERT INTO t (a,b) VALUES (1,'x')")?,
            QueryResult::status("1 row inserted.")
        );
        // unknown names are skipped, their value is dropped
        run(&mut engine, "INSERT INTO t (c, zz) VALUES ('y', 9)")?;
        assert_eq!(
            rows(&engine),
            vec![
                vec![Value::String("1".into()), Value::String("x".into()), Value::Null],
                vec![Value::Null, Value::Null, Value::String("y".into())],
            ]
        );
        Ok(())
    }

    #[test]
    fn test_insert_all_columns() -> Result<()> {
        let mut engine = engine();
        run(&mut engine, "INSERT INTO t VALUES (7, \"q\", NULL)")?;
        assert_eq!(
            rows(&engine),
            vec![vec![Value::String("7".into()), Value::String("q".into()), Value::Null]]
        );
        Ok(())
    }

    #[test]
    fn test_insert_errors() {
        let mut engine = engine();
        assert_eq!(
            run(&mut engine, "INSERT INTO t VALUES (1, 2)"),
            Err(Error::Parse("Number of values doesn't match number of columns".into()))
        );
        // the table is checked before the VALUES list
        assert_eq!(
            run(&mut engine, "INSERT INTO u VALUES 1"),
            Err(Error::TableNotFound("u".into()))
        );
        assert_eq!(
            run(&mut engine, "INSERT INTO t VALUES 1"),
            Err(Error::Parse("Invalid VALUES format".into()))
        );
        assert!(rows(&engine).is_empty());
    }

    #[test]
    fn test_update_delete_acknowledged() -> Result<()> {
        let mut engine = engine();
        run(&mut engine, "INSERT INTO t VALUES (1, 2, 3)")?;
        assert_eq!(
            run(&mut engine, "UPDATE t SET a = 5")?,
            QueryResult::status("UPDATE query executed.")
        );
        assert_eq!(
            run(&mut engine, "DELETE FROM t")?,
            QueryResult::status("DELETE query executed.")
        );
        assert_eq!(rows(&engine).len(), 1);
        Ok(())
    }
}

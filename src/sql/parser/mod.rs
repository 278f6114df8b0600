use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::sql::parser::ast::{CompareOp, Condition, LogicalOp, Projection, Statement, StatementKind};
use crate::sql::parser::lexer::{Keyword, Lexer, Token};
use crate::sql::schema::Column;
use super::types::{DataType, Value};

pub mod ast;
mod lexer;

pub use lexer::statement_kind;

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| table_name_pattern("CREATE"));
static DROP_TABLE: LazyLock<Regex> = LazyLock::new(|| table_name_pattern("DROP"));
static TRUNCATE_TABLE: LazyLock<Regex> = LazyLock::new(|| table_name_pattern("TRUNCATE"));
static SAVEPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)SAVEPOINT\s+([A-Za-z0-9_]+)").expect("valid savepoint pattern")
});

fn table_name_pattern(verb: &str) -> Regex {
    Regex::new(&format!(r"(?i){}\s+TABLE\s+([A-Za-z0-9_]+)", verb))
        .expect("valid table name pattern")
}

/// SQL Parser - scans statement text into a `Statement`
///
/// There is no token stream behind statements: clauses are located by the
/// first case-insensitive occurrence of their keyword, which is why a
/// keyword hidden inside an identifier still splits the text.
pub struct Parser<'a> {
    sql: &'a str,
    /// ASCII-uppercased copy, byte offsets line up with `sql`
    upper: String,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given SQL input
    pub fn new(input: &'a str) -> Self {
        let sql = input.trim();
        Parser {
            sql,
            upper: sql.to_ascii_uppercase(),
        }
    }

    /// Parses the input SQL statement
    pub fn parse(&self) -> Result<Statement> {
        match statement_kind(self.sql) {
            Some(StatementKind::Select) => self.parse_select(),
            Some(StatementKind::Insert) => self.parse_insert(),
            Some(StatementKind::CreateTable) => self.parse_create_table(),
            Some(StatementKind::DropTable) => Ok(Statement::DropTable {
                name: self.capture_name(&DROP_TABLE, "Invalid DROP TABLE syntax.")?,
            }),
            Some(StatementKind::TruncateTable) => Ok(Statement::TruncateTable {
                name: self.capture_name(&TRUNCATE_TABLE, "Invalid TRUNCATE TABLE syntax.")?,
            }),
            Some(StatementKind::Savepoint) => Ok(Statement::Savepoint {
                name: self.capture_name(&SAVEPOINT, "Invalid SAVEPOINT syntax.")?,
            }),
            Some(StatementKind::Update) => Ok(Statement::Update),
            Some(StatementKind::Delete) => Ok(Statement::Delete),
            Some(StatementKind::AlterTable) => Ok(Statement::AlterTable),
            Some(StatementKind::Commit) => Ok(Statement::Commit),
            Some(StatementKind::Rollback) => Ok(Statement::Rollback),
            None => Err(Error::Parse("Unsupported SQL query.".into())),
        }
    }

    /// SELECT <projection> FROM <table>[ <alias>] [WHERE <conditions>]
    fn parse_select(&self) -> Result<Statement> {
        let from = self.upper.find("FROM").ok_or_else(|| {
            Error::Parse("Invalid SELECT query: missing FROM clause".into())
        })?;
        let select_part = self.sql.get(6..from).unwrap_or("").trim();
        let table_part = self.sql[from + 4..].trim();
        let table_upper = table_part.to_ascii_uppercase();

        let mut table_name = table_part.split(' ').next().unwrap_or("");
        let mut alias = "";
        let where_at = table_upper.find("WHERE");
        if let Some(space) = table_part.find(' ') {
            if where_at.is_none_or(|w| space < w) {
                let end = where_at.unwrap_or(table_part.len());
                alias = table_part[space + 1..end].trim();
                table_name = table_part[..space].trim();
            }
        }

        let where_clause = where_at.map_or("", |w| table_part[w + 5..].trim());
        let qualifier = if alias.is_empty() { table_name } else { alias };

        let projection = if select_part == "*" {
            Projection::All
        } else {
            Projection::Items(select_part.split(',').map(|c| c.trim().to_string()).collect())
        };

        Ok(Statement::Select {
            projection,
            table_name: table_name.to_string(),
            alias: alias.to_string(),
            conditions: parse_conditions(where_clause, qualifier),
        })
    }

    /// INSERT INTO <table>[(<col>, ...)] VALUES (<val>, ...)
    fn parse_insert(&self) -> Result<Statement> {
        let (Some(into), Some(values_at)) = (self.upper.find("INTO"), self.upper.find("VALUES"))
        else {
            return Err(Error::Parse("Invalid INSERT query format".into()));
        };

        let mut table_name = self.sql.get(into + 4..values_at).unwrap_or("").trim();
        let mut columns = None;
        if let Some(open) = table_name.find('(') {
            let close = table_name
                .find(')')
                .filter(|close| *close > open)
                .ok_or_else(|| Error::Parse("Invalid INSERT query format".into()))?;
            columns = Some(
                table_name[open + 1..close]
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .collect(),
            );
            table_name = table_name[..open].trim();
        }

        let values_part = self.sql[values_at + 6..].trim();
        let values = match (values_part.starts_with('('), values_part.find(')')) {
            (true, Some(close)) => Some(
                values_part[1..close]
                    .split(',')
                    .map(parse_literal)
                    .collect(),
            ),
            _ => None,
        };

        Ok(Statement::Insert {
            table_name: table_name.to_string(),
            columns,
            values,
        })
    }

    /// CREATE TABLE <name> (<col> <type> ..., ...)
    fn parse_create_table(&self) -> Result<Statement> {
        let name = self.capture_name(&CREATE_TABLE, "Invalid CREATE TABLE syntax")?;

        let (Some(start), Some(end)) = (self.sql.find('('), self.sql.rfind(')')) else {
            return Err(Error::Parse("Invalid column definition syntax".into()));
        };
        let body = self.sql.get(start + 1..end).unwrap_or("");

        let columns = body
            .split(',')
            .map(str::trim)
            .filter(|def| {
                !def.is_empty()
                    && !def.starts_with("CONSTRAINT")
                    && !def.starts_with("PRIMARY KEY")
                    && !def.starts_with("FOREIGN KEY")
            })
            .map(|def| {
                let mut parts = def.split_whitespace();
                let name = parts.next().unwrap_or_default();
                let datatype = DataType::from_declared(parts.next().unwrap_or_default());
                Column::new(name, datatype)
            })
            .collect();

        Ok(Statement::CreateTable { name, columns })
    }

    /// Extracts the identifier captured by `pattern`, failing with `invalid`
    fn capture_name(&self, pattern: &Regex, invalid: &str) -> Result<String> {
        pattern
            .captures(self.sql)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Error::Parse(invalid.to_string()))
    }
}

/// Converts one VALUES item into a cell, stripping a matching pair of quotes
///
/// Quoted and unquoted literals are both stored as text; only a bare NULL
/// becomes a null cell.
fn parse_literal(raw: &str) -> Value {
    let v = raw.trim();
    let quoted = v.len() >= 2
        && ((v.starts_with('\'') && v.ends_with('\'')) || (v.starts_with('"') && v.ends_with('"')));
    if quoted {
        Value::String(v[1..v.len() - 1].to_string())
    } else if v.eq_ignore_ascii_case("NULL") {
        Value::Null
    } else {
        Value::String(v.to_string())
    }
}

/// Walks the words of a WHERE clause into a flat condition list
///
/// AND/OR close the current condition and are recorded on it; comparison
/// operators set the operator; other words fill the field, then the value.
fn parse_conditions(clause: &str, qualifier: &str) -> Vec<Condition> {
    let mut conditions = Vec::new();
    let mut current = Condition::default();

    for token in Lexer::new(clause) {
        let operator = match token {
            Token::Keyword(keyword @ (Keyword::And | Keyword::Or)) => {
                current.logical = Some(if keyword == Keyword::And {
                    LogicalOp::And
                } else {
                    LogicalOp::Or
                });
                conditions.push(std::mem::take(&mut current));
                continue;
            }
            Token::Equal => CompareOp::Equal,
            Token::NotEqual => CompareOp::NotEqual,
            Token::LessThan => CompareOp::LessThan,
            Token::LessThanOrEqual => CompareOp::LessThanOrEqual,
            Token::GreaterThan => CompareOp::GreaterThan,
            Token::GreaterThanOrEqual => CompareOp::GreaterThanOrEqual,
            Token::Keyword(Keyword::Like) => CompareOp::Like,
            Token::Keyword(Keyword::In) => CompareOp::In,
            Token::Keyword(Keyword::Is) => CompareOp::Is,
            Token::Keyword(Keyword::Not) => CompareOp::Not,
            Token::Word(word) => {
                if current.field.is_none() {
                    current.field = Some(if word.contains('.') {
                        word
                    } else {
                        format!("{}.{}", qualifier, word)
                    });
                } else if current.value.as_deref().is_none_or(str::is_empty) {
                    current.value = Some(word.replace(['\'', '"'], ""));
                }
                continue;
            }
        };
        current.operator = Some(operator);
    }

    if !current.is_empty() {
        conditions.push(current);
    }
    conditions
}

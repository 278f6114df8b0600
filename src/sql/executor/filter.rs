use std::collections::HashMap;

use regex::RegexBuilder;

use crate::{
    error::{Error, Result},
    sql::{
        parser::ast::{CompareOp, Condition},
        schema::Column,
        types::{Row, Value},
    },
};

/// Cell lookup for one row, keyed by `qualifier.column` and by bare `column`
pub type RowLookup<'a> = HashMap<String, &'a Value>;

pub fn row_lookup<'a>(columns: &[Column], row: &'a Row, qualifier: &str) -> RowLookup<'a> {
    let mut lookup = HashMap::with_capacity(columns.len() * 2);
    for (column, value) in columns.iter().zip(row) {
        lookup.insert(format!("{}.{}", qualifier, column.name), value);
        lookup.insert(column.name.clone(), value);
    }
    lookup
}

/// Evaluates every condition against the row and ANDs the outcomes
///
/// The AND/OR recorded on a condition is not consulted. All conditions are
/// evaluated, so a bad operator fails even after an earlier miss.
pub fn evaluate(conditions: &[Condition], row: &RowLookup) -> Result<bool> {
    let mut result = true;
    for condition in conditions {
        let hit = evaluate_condition(condition, row)?;
        result = result && hit;
    }
    Ok(result)
}

fn evaluate_condition(condition: &Condition, row: &RowLookup) -> Result<bool> {
    let operator = condition
        .operator
        .ok_or_else(|| Error::UnsupportedOperator("(none)".to_string()))?;
    // None: the field is not a column of the row
    let field = condition
        .field
        .as_deref()
        .and_then(|f| row.get(f).copied());
    let value = condition.value.as_deref();

    Ok(match operator {
        CompareOp::Equal => loose_eq(field, value),
        CompareOp::NotEqual => !loose_eq(field, value),
        CompareOp::LessThan => compare(field, value, |o| o.is_lt()),
        CompareOp::LessThanOrEqual => compare(field, value, |o| o.is_le()),
        CompareOp::GreaterThan => compare(field, value, |o| o.is_gt()),
        CompareOp::GreaterThanOrEqual => compare(field, value, |o| o.is_ge()),
        CompareOp::Like => {
            let pattern = required(value, operator)?.replace('%', ".*");
            let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
            let text = field.map_or_else(|| "undefined".to_string(), Value::to_match_text);
            regex.is_match(&text)
        }
        CompareOp::In => {
            let value = required(value, operator)?;
            // membership is exact: only text cells can match
            match field {
                Some(Value::String(s)) => value.split(',').map(str::trim).any(|v| v == s),
                _ => false,
            }
        }
        CompareOp::Is => {
            let value = required(value, operator)?;
            if value.to_uppercase() == "NULL" {
                field.is_some_and(Value::is_null)
            } else {
                true
            }
        }
        CompareOp::Not => {
            let value = required(value, operator)?;
            if value.to_uppercase() == "NULL" {
                !field.is_some_and(Value::is_null)
            } else {
                true
            }
        }
    })
}

fn required(value: Option<&str>, operator: CompareOp) -> Result<&str> {
    value.ok_or_else(|| Error::Internal(format!("missing value for operator {}", operator.to_str())))
}

/// A missing literal only equals a null or missing cell
fn loose_eq(field: Option<&Value>, value: Option<&str>) -> bool {
    match (field, value) {
        (Some(field), Some(value)) => field.loose_eq(value),
        (None | Some(Value::Null), None) => true,
        _ => false,
    }
}

fn compare(
    field: Option<&Value>,
    value: Option<&str>,
    test: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    match (field, value) {
        (Some(field), Some(value)) => field.loose_cmp(value).is_some_and(test),
        _ => false,
    }
}

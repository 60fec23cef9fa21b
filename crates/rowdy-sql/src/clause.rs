//! Clause bodies built from value containers.

use crate::render::{Clause, fragment, literal};
use crate::{Error, Object, Value};

/// Build a WHERE body from a condition set: `c1 = 'v' AND c2 IS NULL`.
///
/// Entries are an AND-conjunction of equality / IS NULL predicates,
/// rendered in insertion order. An empty set produces an empty string.
pub fn where_clause(conditions: &Object) -> String {
    conditions
        .iter()
        .map(|(column, value)| fragment(column, value, Clause::Condition))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Build an UPDATE SET body: `c1 = 'v', c2 = NULL`.
///
/// A `Null` entry assigns the literal `NULL`, unlike the IS NULL
/// predicate the condition form uses. An empty row fails before any text
/// is produced.
pub fn set_clause(row: &Object) -> Result<String, Error> {
    if row.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(row
        .iter()
        .map(|(column, value)| fragment(column, value, Clause::Assign))
        .collect::<Vec<_>>()
        .join(", "))
}

/// Build the INSERT column and value lists, order-aligned 1:1 by column.
///
/// An empty row fails before any text is produced.
pub fn insert_lists(row: &Object) -> Result<(String, String), Error> {
    if row.is_empty() {
        return Err(Error::EmptyInput);
    }
    let columns = row.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
    let values = row.values().map(literal).collect::<Vec<_>>().join(", ");
    Ok((columns, values))
}

/// Render a column projection: `*` when empty, else a comma-joined list
/// with surrounding whitespace and commas trimmed per entry.
pub fn projection(columns: &[&str]) -> String {
    if columns.is_empty() {
        return "*".to_string();
    }
    columns
        .iter()
        .map(|column| column.trim().trim_matches(',').trim())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an ORDER BY body from a sort spec.
///
/// `Bool(true)` sorts descending, `Bool(false)` ascending; any other
/// value leaves the column unqualified (ascending by engine default).
pub fn order_by(sort: &Object) -> String {
    sort.iter()
        .map(|(column, direction)| match direction {
            Value::Bool(true) => format!("{column} DESC"),
            Value::Bool(false) => format!("{column} ASC"),
            _ => column.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

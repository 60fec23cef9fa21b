//! Parameterized query building.
//!
//! Same statement shapes as [`crate::stmt`], but values become `$1, $2,
//! ...` placeholders with a bound parameter list instead of inline
//! literals. The session layer executes these; the text builders stay
//! around for logging and offline generation.

use crate::clause::{order_by, projection};
use crate::{Error, Object, Value};

/// Result of building a query: SQL string and parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// The SQL string with $1, $2, etc. placeholders
    pub sql: String,
    /// The parameter values in order
    pub params: Vec<Value>,
}

/// Builds SQL from value containers, tracking parameter indices.
struct SqlBuilder {
    sql: String,
    params: Vec<Value>,
}

impl SqlBuilder {
    fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn push_param(&mut self, value: Value) {
        self.params.push(value);
        self.sql.push('$');
        self.sql.push_str(&self.params.len().to_string());
    }

    fn push_where(&mut self, conditions: &Object) {
        if conditions.is_empty() {
            return;
        }
        self.push(" WHERE ");
        for (i, (column, value)) in conditions.iter().enumerate() {
            if i > 0 {
                self.push(" AND ");
            }
            self.push(column);
            // Null conditions must use the predicate form; `= $n` bound
            // to NULL never matches under three-valued logic.
            if value.is_null() {
                self.push(" IS NULL");
            } else {
                self.push(" = ");
                self.push_param(value.clone());
            }
        }
    }

    fn finish(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Build a parameterized SELECT.
pub fn select_params(
    table: &str,
    columns: &[&str],
    conditions: &Object,
    sort: &Object,
    offset: Option<u64>,
    limit: Option<u64>,
) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push("SELECT ");
    b.push(&projection(columns));
    b.push(" FROM ");
    b.push(table);
    b.push_where(conditions);
    let sort_body = order_by(sort);
    if !sort_body.is_empty() {
        b.push(" ORDER BY ");
        b.push(&sort_body);
    }
    if let Some(n) = offset {
        b.push(" OFFSET ");
        b.push(&n.to_string());
    }
    if let Some(n) = limit {
        b.push(" LIMIT ");
        b.push(&n.to_string());
    }
    b.finish()
}

/// Build a parameterized INSERT. An empty row fails before any SQL text
/// is produced.
pub fn insert_params(table: &str, row: &Object) -> Result<BuiltQuery, Error> {
    if row.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut b = SqlBuilder::new();
    b.push("INSERT INTO ");
    b.push(table);
    b.push(" (");
    for (i, column) in row.keys().enumerate() {
        if i > 0 {
            b.push(", ");
        }
        b.push(column);
    }
    b.push(") VALUES (");
    for (i, value) in row.values().enumerate() {
        if i > 0 {
            b.push(", ");
        }
        b.push_param(value.clone());
    }
    b.push(")");
    Ok(b.finish())
}

/// Build a parameterized UPDATE. An empty row fails before any SQL text
/// is produced.
pub fn update_params(table: &str, row: &Object, conditions: &Object) -> Result<BuiltQuery, Error> {
    if row.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut b = SqlBuilder::new();
    b.push("UPDATE ");
    b.push(table);
    b.push(" SET ");
    for (i, (column, value)) in row.iter().enumerate() {
        if i > 0 {
            b.push(", ");
        }
        b.push(column);
        b.push(" = ");
        b.push_param(value.clone());
    }
    b.push_where(conditions);
    Ok(b.finish())
}

/// Build a parameterized DELETE.
pub fn delete_params(table: &str, conditions: &Object) -> BuiltQuery {
    let mut b = SqlBuilder::new();
    b.push("DELETE FROM ");
    b.push(table);
    b.push_where(conditions);
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_numbers_params_in_order() {
        let conditions = Object::from([
            ("c1".to_string(), Value::from("v1")),
            ("c2".to_string(), Value::Null),
            ("c3".to_string(), Value::from(3i64)),
        ]);
        let q = select_params("t", &[], &conditions, &Object::new(), None, None);
        assert_eq!(
            q.sql,
            "SELECT * FROM t WHERE c1 = $1 AND c2 IS NULL AND c3 = $2"
        );
        assert_eq!(q.params, vec![Value::from("v1"), Value::from(3i64)]);
    }

    #[test]
    fn test_select_sort_offset_limit() {
        let sort = Object::from([("id".to_string(), Value::Bool(true))]);
        let q = select_params(
            "t",
            &["id", "name"],
            &Object::new(),
            &sort,
            Some(5),
            Some(1),
        );
        assert_eq!(
            q.sql,
            "SELECT id, name FROM t ORDER BY id DESC OFFSET 5 LIMIT 1"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn test_insert_binds_every_value() {
        let row = Object::from([
            ("a".to_string(), Value::from(1i64)),
            ("b".to_string(), Value::Null),
        ]);
        let q = insert_params("t", &row).unwrap();
        assert_eq!(q.sql, "INSERT INTO t (a, b) VALUES ($1, $2)");
        assert_eq!(q.params, vec![Value::Int(1), Value::Null]);
    }

    #[test]
    fn test_update_set_and_where_share_numbering() {
        let row = Object::from([("name".to_string(), Value::from("x"))]);
        let conditions = Object::from([("id".to_string(), Value::from(7i64))]);
        let q = update_params("t", &row, &conditions).unwrap();
        assert_eq!(q.sql, "UPDATE t SET name = $1 WHERE id = $2");
        assert_eq!(q.params, vec![Value::from("x"), Value::Int(7)]);
    }

    #[test]
    fn test_empty_row_fails_before_building() {
        assert!(matches!(
            insert_params("t", &Object::new()),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            update_params("t", &Object::new(), &Object::new()),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_delete_without_conditions_has_no_where() {
        let q = delete_params("t", &Object::new());
        assert_eq!(q.sql, "DELETE FROM t");
        assert!(q.params.is_empty());
    }
}

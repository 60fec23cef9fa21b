//! Rendering a single value as a SQL fragment.
//!
//! All four statement builders go through [`fragment`], so condition and
//! assignment rendering cannot drift apart.

use crate::Value;

/// Where a fragment appears. The shape of a `Null` depends on it:
/// conditions use the three-valued-logic predicate, assignments the
/// literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Clause {
    /// WHERE predicates: `col = lit`, `col IS NULL`.
    Condition,
    /// SET assignments: `col = lit`, `col = NULL`.
    Assign,
}

/// Escape a string literal for SQL: single-quote it, doubling any
/// embedded single quotes. Only quote doubling is applied.
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a value as a SQL literal.
///
/// Nested objects and arrays serialize to compact JSON text and are
/// stored as string literals. `Null` renders the literal `NULL`; the
/// IS NULL predicate form is a clause concern, see [`fragment`].
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => escape_string(s),
        Value::Int(i) => i.to_string(),
        Value::Double(d) => d.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(_) | Value::Array(_) => escape_string(&value.to_json_text()),
    }
}

/// Render one `column = literal` fragment for the given clause context.
pub(crate) fn fragment(column: &str, value: &Value, clause: Clause) -> String {
    match (value, clause) {
        (Value::Null, Clause::Condition) => format!("{column} IS NULL"),
        (Value::Null, Clause::Assign) => format!("{column} = NULL"),
        (value, _) => format!("{column} = {}", literal(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;

    #[test]
    fn test_string_quote_doubling() {
        assert_eq!(literal(&Value::from("O'Brien")), "'O''Brien'");
        assert_eq!(literal(&Value::from("")), "''");
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(literal(&Value::Int(-3)), "-3");
        assert_eq!(literal(&Value::Double(1.5)), "1.5");
        assert_eq!(literal(&Value::Bool(true)), "true");
        assert_eq!(literal(&Value::Bool(false)), "false");
        assert_eq!(literal(&Value::Null), "NULL");
    }

    #[test]
    fn test_containers_become_escaped_json_strings() {
        let obj = Object::from([("note".to_string(), Value::from("it's"))]);
        assert_eq!(literal(&Value::Object(obj)), r#"'{"note":"it''s"}'"#);
        assert_eq!(
            literal(&Value::Array(vec![Value::Int(1), Value::Int(2)])),
            "'[1,2]'"
        );
    }

    #[test]
    fn test_null_shape_depends_on_clause() {
        assert_eq!(fragment("c", &Value::Null, Clause::Condition), "c IS NULL");
        assert_eq!(fragment("c", &Value::Null, Clause::Assign), "c = NULL");
        assert_eq!(
            fragment("c", &Value::from("v"), Clause::Condition),
            "c = 'v'"
        );
    }
}

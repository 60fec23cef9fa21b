//! The dynamic value model.

use indexmap::IndexMap;

use crate::Error;

/// An insertion-ordered map of column name to value.
///
/// Iteration order is insertion order, which makes every clause built from
/// an object deterministic.
pub type Object = IndexMap<String, Value>;

/// A dynamically-typed SQL value.
///
/// Used uniformly for row data, filter conditions, and query results.
/// Every value carries exactly one tag; the typed accessors fail with
/// [`Error::TypeMismatch`] instead of coercing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL
    Null,

    /// Text (TEXT, VARCHAR, etc.)
    String(String),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit float
    Double(f64),

    /// Boolean
    Bool(bool),

    /// Nested object, stored in a text/JSON column
    Object(Object),

    /// Nested array, stored in a text/JSON column
    Array(Vec<Value>),
}

impl Value {
    /// The tag name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
        }
    }

    /// Returns true if this is a NULL value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn as_int(&self) -> Result<i64, Error> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(mismatch("int", other)),
        }
    }

    pub fn as_double(&self) -> Result<f64, Error> {
        match self {
            Value::Double(d) => Ok(*d),
            other => Err(mismatch("double", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, Error> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn as_object(&self) -> Result<&Object, Error> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(mismatch("object", other)),
        }
    }

    pub fn as_array(&self) -> Result<&[Value], Error> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(mismatch("array", other)),
        }
    }

    /// Convert to a `serde_json::Value`, preserving key order.
    ///
    /// Non-finite doubles have no JSON form and become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Double(d) => serde_json::Number::from_f64(*d)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Convert from a `serde_json::Value`.
    ///
    /// Numbers that fit `i64` decode as [`Value::Int`], everything else as
    /// [`Value::Double`].
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Double(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render the compact JSON text form.
    pub fn to_json_text(&self) -> String {
        self.to_json().to_string()
    }

    /// Parse JSON text into a value.
    pub fn parse_json_text(text: &str) -> Result<Value, Error> {
        Ok(Value::from_json(serde_json::from_str(text)?))
    }
}

fn mismatch(expected: &'static str, actual: &Value) -> Error {
    Error::TypeMismatch {
        expected,
        actual: actual.kind(),
    }
}

// Convenient From impls
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

//! Mapping between driver rows and the value model.

use rowdy_sql::{Object, Value};
use tokio_postgres::Row as PgRow;
use tokio_postgres::types::{IsNull, ToSql, Type};

use crate::{Error, Result};

/// What to do with a result column whose driver type has no mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarshalMode {
    /// Omit the column from the output row.
    #[default]
    Lenient,
    /// Fail with [`Error::UnsupportedColumnType`].
    Strict,
}

/// Coarse classification of a driver-reported type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnClass {
    Text,
    Int,
    Float,
    Bool,
    Json,
    DateTime,
    Other,
}

/// Classify by uppercased prefix. Engines report parameterized names
/// like `VARCHAR(255)`, so exact matching is wrong.
fn classify(type_name: &str) -> ColumnClass {
    let upper = type_name.trim().to_ascii_uppercase();
    if ["TEXT", "CHAR", "VARCHAR", "BPCHAR", "NAME"]
        .iter()
        .any(|p| upper.starts_with(p))
    {
        ColumnClass::Text
    } else if upper.starts_with("INT") {
        ColumnClass::Int
    } else if upper.starts_with("FLOAT") {
        ColumnClass::Float
    } else if upper.starts_with("BOOL") {
        ColumnClass::Bool
    } else if upper.starts_with("JSON") {
        ColumnClass::Json
    } else if upper.starts_with("DATE") || upper.starts_with("TIME") {
        ColumnClass::DateTime
    } else {
        ColumnClass::Other
    }
}

/// Marshal one driver row into an [`Object`] in column order.
///
/// SQL NULL becomes [`Value::Null`]. Columns whose type has no mapping
/// are omitted in [`MarshalMode::Lenient`] and fail in
/// [`MarshalMode::Strict`].
pub fn marshal_row(row: &PgRow, mode: MarshalMode) -> Result<Object> {
    let mut out = Object::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        match column_value(row, idx)? {
            Some(value) => {
                out.insert(column.name().to_string(), value);
            }
            None => match mode {
                MarshalMode::Lenient => {}
                MarshalMode::Strict => {
                    return Err(Error::UnsupportedColumnType {
                        column: column.name().to_string(),
                        type_name: column.type_().name().to_string(),
                    });
                }
            },
        }
    }
    Ok(out)
}

/// Extract one column. `Ok(None)` means the type has no mapping; the
/// caller's [`MarshalMode`] decides what that means.
fn column_value(row: &PgRow, idx: usize) -> Result<Option<Value>> {
    let ty = row.columns()[idx].type_();
    let value = match classify(ty.name()) {
        ColumnClass::Text => row.try_get::<_, Option<String>>(idx)?.map(Value::String),
        ColumnClass::Int => match *ty {
            Type::INT2 => row
                .try_get::<_, Option<i16>>(idx)?
                .map(|v| Value::Int(v.into())),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(idx)?
                .map(|v| Value::Int(v.into())),
            Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.map(Value::Int),
            // INTERVAL shares the prefix but is not an integer
            _ => return Ok(None),
        },
        ColumnClass::Float => match *ty {
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(idx)?
                .map(|v| Value::Double(v.into())),
            Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.map(Value::Double),
            _ => return Ok(None),
        },
        ColumnClass::Bool => row.try_get::<_, Option<bool>>(idx)?.map(Value::Bool),
        ColumnClass::Json => match row.try_get::<_, Option<serde_json::Value>>(idx)? {
            Some(raw) => match json_container(raw) {
                Some(value) => Some(value),
                None => return Ok(None),
            },
            None => None,
        },
        // The engine's default textual representation, no calendar
        // logic of our own.
        ColumnClass::DateTime => match *ty {
            Type::DATE => row
                .try_get::<_, Option<chrono::NaiveDate>>(idx)?
                .map(|v| Value::String(v.to_string())),
            Type::TIME => row
                .try_get::<_, Option<chrono::NaiveTime>>(idx)?
                .map(|v| Value::String(v.to_string())),
            Type::TIMESTAMP => row
                .try_get::<_, Option<chrono::NaiveDateTime>>(idx)?
                .map(|v| Value::String(v.to_string())),
            Type::TIMESTAMPTZ => row
                .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)?
                .map(|v| Value::String(v.to_string())),
            _ => return Ok(None),
        },
        ColumnClass::Other => return Ok(None),
    };
    Ok(Some(value.unwrap_or(Value::Null)))
}

/// JSON columns only round-trip container shapes; a scalar at the top
/// level has no mapping.
fn json_container(raw: serde_json::Value) -> Option<Value> {
    match Value::from_json(raw) {
        value @ (Value::Object(_) | Value::Array(_)) => Some(value),
        _ => None,
    }
}

/// Adapter so a [`Value`] can be bound as a statement parameter.
///
/// Numeric values are width-converted to the type the statement
/// inferred; nested containers bind as JSON against JSON columns and as
/// JSON text elsewhere.
#[derive(Debug)]
pub struct SqlParam<'a>(pub &'a Value);

impl ToSql for SqlParam<'_> {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Double(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::String(v) => match *ty {
                Type::JSON | Type::JSONB => {
                    serde_json::from_str::<serde_json::Value>(v)?.to_sql(ty, out)
                }
                _ => v.as_str().to_sql(ty, out),
            },
            Value::Object(_) | Value::Array(_) => match *ty {
                Type::JSON | Type::JSONB => self.0.to_json().to_sql(ty, out),
                _ => self.0.to_json_text().to_sql(ty, out),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::JSON
                | Type::JSONB
                | Type::UNKNOWN
        )
    }

    tokio_postgres::types::to_sql_checked!();
}

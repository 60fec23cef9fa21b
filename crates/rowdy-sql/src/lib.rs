//! Dynamic SQL building over an ordered value model.
//!
//! A [`Value`] is a tagged union (null, string, int, double, bool, nested
//! object, nested array) and an [`Object`] is an insertion-ordered map of
//! column name to value. The same containers describe row data to write,
//! filter conditions, and fetched rows.
//!
//! Two builder surfaces share one rendering core:
//!
//! - parameterized builders ([`select_params`], [`insert_params`],
//!   [`update_params`], [`delete_params`]) produce `$1, $2, ...`
//!   placeholders plus a bound parameter list, and are what the session
//!   layer executes;
//! - text builders ([`build_select`], [`build_insert`], [`build_update`],
//!   [`build_delete`]) produce literal SQL with quote-escaped strings, for
//!   logging and offline generation.
//!
//! # Example
//!
//! ```
//! use rowdy_sql::{Object, Value, build_select, where_clause};
//!
//! let conditions = Object::from([
//!     ("status".to_string(), Value::from("active")),
//!     ("deleted_at".to_string(), Value::Null),
//! ]);
//! let sql = build_select("user", "*", &where_clause(&conditions), "", None, Some(10));
//! assert_eq!(sql, "SELECT * FROM user WHERE status = 'active' AND deleted_at IS NULL LIMIT 10");
//! ```

mod clause;
mod error;
mod param;
mod render;
mod stmt;
mod value;

pub use clause::{insert_lists, order_by, projection, set_clause, where_clause};
pub use error::Error;
pub use param::{BuiltQuery, delete_params, insert_params, select_params, update_params};
pub use render::{escape_string, literal};
pub use stmt::{build_delete, build_insert, build_select, build_update};
pub use value::{Object, Value};

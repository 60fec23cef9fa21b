//! Dynamic row-level data access for Postgres.
//!
//! This crate provides:
//! - Connection and transaction sessions over tokio-postgres
//! - Row-level operations (find/get/add/update/delete/exists/count)
//!   driven by the ordered value model from `rowdy-sql`
//! - A result marshaller mapping driver column types back into that
//!   value model, with a strict and a lenient mode
//!
//! # Example
//!
//! ```ignore
//! use rowdy::{ConnectOptions, Object, Value, connect};
//!
//! let opts = ConnectOptions::new("postgres", "127.0.0.1", 5432, "app", "secret", "appdb")?;
//! let mut session = connect(&opts).await?;
//!
//! let row = Object::from([
//!     ("name".to_string(), Value::from("Alice")),
//!     ("age".to_string(), Value::from(30i64)),
//! ]);
//! session.add("user", &row).await?;
//!
//! let conditions = Object::from([("name".to_string(), Value::from("Alice"))]);
//! let found = session.find("user", &[], &conditions, &Object::new(), Some(10)).await?;
//!
//! let mut tx = session.begin().await?;
//! tx.delete("user", &conditions).await?;
//! tx.rollback().await?;
//! ```

mod connect;
mod error;
mod marshal;
mod session;

pub use connect::{ConnectOptions, Engine, connect};
pub use error::{Error, Result};
pub use marshal::{MarshalMode, SqlParam, marshal_row};
pub use session::{ExecSummary, Session, Tx};

// Re-export the value model for convenience
pub use rowdy_sql::{Object, Value};

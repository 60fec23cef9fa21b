use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Sql(#[from] rowdy_sql::Error),

    #[error("unsupported driver: {0}")]
    UnsupportedDriver(String),

    #[error("no rows returned")]
    NoRows,

    #[error("unsupported column type {type_name} for column {column}")]
    UnsupportedColumnType { column: String, type_name: String },
}

/// Result type for rowdy operations.
pub type Result<T> = std::result::Result<T, Error>;

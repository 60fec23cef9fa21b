//! Connection establishment.

use std::str::FromStr;

use tokio_postgres::NoTls;

use crate::session::Session;
use crate::{Error, Result};

/// Supported database engines.
///
/// The engine is matched explicitly in [`connect`]; there is no global
/// driver registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Postgres,
}

impl FromStr for Engine {
    type Err = Error;

    /// Accepts `postgres`, `postgresql` or `pgsql`, any case, surrounding
    /// whitespace ignored. Anything else fails with
    /// [`Error::UnsupportedDriver`] before any network I/O happens.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSTGRES" | "POSTGRESQL" | "PGSQL" => Ok(Engine::Postgres),
            _ => Err(Error::UnsupportedDriver(s.trim().to_string())),
        }
    }
}

/// Options for establishing a session.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub engine: Engine,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl ConnectOptions {
    /// Parse the engine kind from its textual name.
    pub fn new(
        engine: &str,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        dbname: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            engine: engine.parse()?,
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            dbname: dbname.into(),
        })
    }
}

/// Connect to the database and validate the session with a liveness
/// probe before returning it.
pub async fn connect(opts: &ConnectOptions) -> Result<Session> {
    match opts.engine {
        Engine::Postgres => connect_postgres(opts).await,
    }
}

async fn connect_postgres(opts: &ConnectOptions) -> Result<Session> {
    let (client, connection) = tokio_postgres::Config::new()
        .host(&opts.host)
        .port(opts.port)
        .user(&opts.user)
        .password(&opts.password)
        .dbname(&opts.dbname)
        .connect(NoTls)
        .await?;

    // The connection task drives the socket until the client is dropped.
    let handle = tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("connection task failed: {e}");
        }
    });

    let session = Session::new(client, handle);
    session.ping().await?;
    Ok(session)
}

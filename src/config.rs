//! Service configuration.
//!
//! Read from environment variables with working defaults. The database is a
//! local SQLite file, so there are no credentials to manage.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable for the listen address.
pub const ADDR_VAR: &str = "PR_SERVICE_ADDR";
/// Environment variable for the SQLite database path.
pub const DB_VAR: &str = "PR_SERVICE_DB";

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB: &str = "pr-service.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address {addr:?}: {source}")]
    InvalidAddr {
        addr: String,
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = std::env::var(ADDR_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let db = std::env::var(DB_VAR).unwrap_or_else(|_| DEFAULT_DB.to_string());
        Self::from_parts(&addr, &db)
    }

    fn from_parts(addr: &str, db: &str) -> Result<Self, ConfigError> {
        let listen_addr = addr.parse().map_err(|source| ConfigError::InvalidAddr {
            addr: addr.to_string(),
            source,
        })?;

        Ok(Self {
            listen_addr,
            db_path: PathBuf::from(db),
        })
    }
}

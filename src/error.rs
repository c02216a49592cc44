//! Startup errors
//!
//! Request handling never fails outward (every failure becomes an HTTP
//! response), so the only errors that reach `main` happen before serving.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("port {port} already in use")]
    AddrInUse { port: u16 },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to open log file: {0}")]
    Logging(#[source] io::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[from] io::Error),
}

impl From<config::ConfigError> for StartupError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl StartupError {
    /// Classify a bind failure, singling out an occupied port
    pub fn from_bind(addr: std::net::SocketAddr, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AddrInUse {
            Self::AddrInUse { port: addr.port() }
        } else {
            Self::Bind {
                addr: addr.to_string(),
                source,
            }
        }
    }
}

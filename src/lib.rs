//! Static file server for a personal blog with a password-gated `/admin` area.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::StartupError;

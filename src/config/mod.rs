// Configuration module entry point
// Manages application configuration, command line overrides and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AdminConfig, AuthPolicy, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    SiteConfig,
};

/// Environment variable holding the admin secret
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";

/// Port used when neither the command line nor the config file names one
pub const DEFAULT_PORT: u16 = 8000;

/// Outcome of interpreting the positional port argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortArg {
    /// No argument given, keep the configured port
    Absent,
    /// A valid port number
    Port(u16),
    /// Unparseable input, fall back to the default port
    Invalid(String),
}

impl PortArg {
    pub fn parse(arg: Option<&str>) -> Self {
        match arg {
            None => Self::Absent,
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_or_else(|_| Self::Invalid(raw.to_string()), Self::Port),
        }
    }
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("BLOG").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Configuration made only of built-in defaults
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    /// Apply the positional port argument.
    ///
    /// Invalid input resets the port to [`DEFAULT_PORT`]; the caller is
    /// expected to warn about it.
    pub fn apply_port_arg(&mut self, arg: &PortArg) {
        match arg {
            PortArg::Absent => {}
            PortArg::Port(port) => self.server.port = *port,
            PortArg::Invalid(_) => self.server.port = DEFAULT_PORT,
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Read the admin secret from the environment.
///
/// An empty value is treated like an unset variable so admin access fails closed.
pub fn read_admin_password() -> Option<String> {
    std::env::var(ADMIN_PASSWORD_VAR)
        .ok()
        .filter(|value| !value.is_empty())
}

type Builder = config::builder::ConfigBuilder<config::builder::DefaultState>;

fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("site.root", ".")?
        .set_default("site.index_file", "index.html")?
        .set_default("site.admin_document", "admin/index.html")?
        .set_default("admin.auth_policy", "session")?
        .set_default("admin.session_ttl_secs", 86_400)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "blog_server")?
        .set_default("http.max_body_size", 65_536) // 64KB, the login form is tiny
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.site.root, ".");
        assert_eq!(cfg.site.index_file, "index.html");
        assert_eq!(cfg.admin.auth_policy, AuthPolicy::Session);
        assert_eq!(cfg.admin.session_ttl_secs, 86_400);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_port_arg_parse() {
        assert_eq!(PortArg::parse(None), PortArg::Absent);
        assert_eq!(PortArg::parse(Some("9000")), PortArg::Port(9000));
        assert_eq!(
            PortArg::parse(Some("abc")),
            PortArg::Invalid("abc".to_string())
        );
        assert_eq!(
            PortArg::parse(Some("70000")),
            PortArg::Invalid("70000".to_string())
        );
    }

    #[test]
    fn test_apply_port_arg() {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.port = 9100;

        cfg.apply_port_arg(&PortArg::Absent);
        assert_eq!(cfg.server.port, 9100);

        cfg.apply_port_arg(&PortArg::Port(9200));
        assert_eq!(cfg.server.port, 9200);

        cfg.apply_port_arg(&PortArg::Invalid("x".to_string()));
        assert_eq!(cfg.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8123;
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8123".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}

//! Access log line formatting
//!
//! `logging.access_log_format` selects one of:
//! - `combined`: NCSA combined, the default
//! - `common`: NCSA common (no referer or user agent)
//! - `json`: one JSON object per request
//! - anything else: a pattern with `$variable` placeholders

use chrono::{DateTime, Local};
use serde_json::json;

/// One served request, as recorded in the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Peer IP, without port
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Raw query string, no leading `?`
    pub query: Option<String>,
    /// `1.0`, `1.1`, ...
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Handling time, request received to response built
    pub request_time_us: u64,
}

/// Parsed form of the `access_log_format` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineFormat<'a> {
    Combined,
    Common,
    Json,
    Pattern(&'a str),
}

impl<'a> LineFormat<'a> {
    fn parse(setting: &'a str) -> Self {
        match setting {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            pattern => Self::Pattern(pattern),
        }
    }
}

impl AccessLogEntry {
    /// Entry stamped with the current local time; the router fills the rest
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render the entry as a single log line
    pub fn format(&self, setting: &str) -> String {
        match LineFormat::parse(setting) {
            LineFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                self.referer_or_dash(),
                self.user_agent_or_dash()
            ),
            LineFormat::Common => self.common_line(),
            LineFormat::Json => self.json_line(),
            LineFormat::Pattern(pattern) => self.expand(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    fn time_local(&self) -> String {
        self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()
    }

    fn referer_or_dash(&self) -> &str {
        self.referer.as_deref().unwrap_or("-")
    }

    fn user_agent_or_dash(&self) -> &str {
        self.user_agent.as_deref().unwrap_or("-")
    }

    /// `addr - - [time] "request" status bytes`
    fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time_local(),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn json_line(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Substitute `$variable` placeholders.
    ///
    /// Known variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds, three decimals), `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`. Unknown `$names` are left as is.
    fn expand(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1_000_000.0;

        // $request is a prefix of $request_time and $request_method; they go first
        let variables = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time_local()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{seconds:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", self.referer_or_dash().to_string()),
            ("$http_user_agent", self.user_agent_or_dash().to_string()),
        ];

        variables
            .iter()
            .fold(pattern.to_string(), |line, (name, value)| line.replace(name, value))
    }
}

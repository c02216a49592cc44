//! Logger module
//!
//! Provides logging utilities for the blog server including:
//! - Startup banner and shutdown messages
//! - Access logging with multiple formats
//! - Admin authentication events
//! - Error and warning logging, optionally to files

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;

/// Open the configured log files. Call once, before the banner.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

#[derive(Clone, Copy)]
enum Stream {
    Info,
    Access,
    Error,
}

/// Route a line to the global writer, or to the console before `init()`
fn emit(stream: Stream, message: &str) {
    match (writer::get(), stream) {
        (Some(w), Stream::Info) => w.write_info(message),
        (Some(w), Stream::Access) => w.write_access(message),
        (Some(w), Stream::Error) => w.write_error(message),
        (None, Stream::Info | Stream::Access) => println!("{message}"),
        (None, Stream::Error) => eprintln!("{message}"),
    }
}

fn write_info(message: &str) {
    emit(Stream::Info, message);
}

fn write_error(message: &str) {
    emit(Stream::Error, message);
}

/// Startup banner: URLs, admin status, document root
pub fn log_server_start(addr: &SocketAddr, config: &Config, admin_enabled: bool, root: &Path) {
    let port = addr.port();
    write_info("======================================");
    write_info("Blog server started");
    write_info(&format!("Available at: http://localhost:{port}"));
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Admin: http://localhost:{port}/admin/"));
    if admin_enabled {
        write_info(&format!(
            "Admin authentication: enabled ({} policy)",
            config.admin.auth_policy
        ));
        write_info(&format!("Login: http://localhost:{port}/admin/login"));
    } else {
        log_admin_disabled();
    }
    write_info(&format!("Document root: {}", root.display()));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Stop: Ctrl+C");
    write_info("======================================\n");
}

pub fn log_admin_disabled() {
    log_warning("Admin authentication: DISABLED (set ADMIN_PASSWORD to enable)");
}

pub fn log_invalid_port_arg(raw: &str, fallback: u16) {
    log_warning(&format!("Invalid port '{raw}'. Using port {fallback}."));
}

pub fn log_port_in_use(port: u16) {
    log_error(&format!("Port {port} already in use. Try:"));
    write_error(&format!("         blog_server {}", port.saturating_add(1)));
}

pub fn log_shutdown() {
    write_info("\nServer stopped. Goodbye!");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_admin_access(path: &str) {
    write_info(&format!("[Admin] Panel accessed: {path}"));
}

pub fn log_admin_login(peer_addr: &SocketAddr) {
    write_info(&format!("[Admin] Login succeeded from {peer_addr}"));
}

pub fn log_admin_logout(peer_addr: &SocketAddr) {
    write_info(&format!("[Admin] Session closed from {peer_addr}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// One access log line in the configured format
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    emit(Stream::Access, &entry.format(format));
}

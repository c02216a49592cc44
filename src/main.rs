use std::process::ExitCode;
use std::sync::Arc;

use blog_server::config::{self, AppState, Config, PortArg};
use blog_server::server::{self, SignalHandler};
use blog_server::{logger, StartupError};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(StartupError::AddrInUse { port }) => {
            logger::log_port_in_use(port);
            ExitCode::FAILURE
        }
        Err(e) => {
            logger::log_error(&format!("Server error: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let mut cfg = Config::load_from("config")?;

    let port_arg = PortArg::parse(std::env::args().nth(1).as_deref());
    cfg.apply_port_arg(&port_arg);

    logger::init(&cfg).map_err(StartupError::Logging)?;
    if let PortArg::Invalid(raw) = &port_arg {
        logger::log_invalid_port_arg(raw, config::DEFAULT_PORT);
    }

    // Tokio runtime, worker count from configuration
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let addr = cfg.get_socket_addr().map_err(StartupError::Config)?;
    let listener = server::create_listener(addr).map_err(|e| StartupError::from_bind(addr, e))?;

    let admin_password = config::read_admin_password();
    let admin_enabled = admin_password.is_some();
    let state = Arc::new(AppState::new(&cfg, admin_password));

    let root = state
        .document_root
        .canonicalize()
        .unwrap_or_else(|_| state.document_root.clone());
    logger::log_server_start(&addr, &cfg, admin_enabled, &root);

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let open = server::run_until_shutdown(listener, state, Arc::clone(&signals.shutdown)).await;
    if open > 0 {
        logger::log_warning(&format!("Dropping {open} open connection(s)"));
    }
    logger::log_shutdown();
    Ok(())
}

//! Majordomo — Scripted Desktop Greeter & Boot Concierge
//!
//! Thin CLI entrypoint: initialize logging, build the app context with the
//! real process runner, and dispatch the parsed command.

use majordomo::{run_with_ctrl_c, AppContext};

/// Logs an error message to stderr
macro_rules! log_error {
    ($($arg:tt)*) => {
        majordomo::log_error!($($arg)*);
    };
}

#[tokio::main]
async fn main() {
    if let Err(e) = majordomo::logging::init_logging() {
        eprintln!("[WARN] Failed to initialize structured logging: {}", e);
    }

    let context = AppContext::new();
    match run_with_ctrl_c(std::env::args(), &context).await {
        Ok(()) => {}
        Err(e) => {
            log_error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const APP_TARGET: &str = "navboard";

/// Picks the log filter. A non-empty `RUST_LOG` wins outright; otherwise
/// `verbose` turns on debug output for this crate only.
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None if verbose => EnvFilter::new(format!("{APP_TARGET}=debug")),
        None => EnvFilter::new("off"),
    }
}

pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(log_filter(verbose, rust_log.as_deref()))
        .init();
}

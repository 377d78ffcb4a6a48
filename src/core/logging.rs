//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g.
/// `RUST_LOG=pursuit::road=trace` to see every generated segment.
///
/// Safe to call more than once; later calls are ignored.
///
/// # Example
/// ```
/// pursuit::core::logging::init();
/// log::info!("Road scene starting");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}

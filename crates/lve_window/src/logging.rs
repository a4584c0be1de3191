//! Logging setup

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system at `level`
///
/// `RUST_LOG` is still honoured for per-module overrides. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init(level: log::LevelFilter) {
    let result = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}

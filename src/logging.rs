//! Logger initialisation.

use crate::config::LogLevel;

/// Install a logger at the given verbosity.
///
/// On native targets this installs `env_logger`; `RUST_LOG` still overrides
/// the level per module. Calling it twice is harmless. On wasm32 the host
/// page is expected to provide the logger, so only the max level is set.
pub fn init(level: LogLevel) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let result = env_logger::Builder::new()
            .filter_level(log::LevelFilter::from(level))
            .parse_default_env()
            .try_init();
        if result.is_err() {
            log::debug!("Logger already initialised");
        }
    }

    log::set_max_level(log::LevelFilter::from(level));
}

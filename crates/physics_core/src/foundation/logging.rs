//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::config::PhysicsConfig;

/// Initialize the logging system from the `RUST_LOG` environment variable
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default filter such as `"info"` or
/// `"physics_core=debug"`. `RUST_LOG` still takes precedence when set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Initialize the logging system with the configured default filter
pub fn init_from_config(config: &PhysicsConfig) {
    init_with_level(&config.log_level);
}

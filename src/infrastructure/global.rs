//! Optional process-wide logger.
//!
//! Libraries should pass `Logger` values around. Applications that want one
//! shared logger can install it here once at startup.

use crate::infrastructure::logger::Logger;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger.
///
/// # Errors
/// Returns the logger back if one was already installed.
///
/// # Example
/// ```
/// use logaroo::{global, Logger};
///
/// let logger = Logger::builder().build().unwrap();
/// global::install(logger).unwrap();
/// assert!(global::get().is_some());
///
/// let second = Logger::builder().build().unwrap();
/// assert!(global::install(second).is_err());
/// ```
pub fn install(logger: Logger) -> Result<(), Logger> {
    GLOBAL.set(logger)?;
    tracing::debug!("global logger installed");
    Ok(())
}

/// The installed logger, if any.
pub fn get() -> Option<&'static Logger> {
    GLOBAL.get()
}

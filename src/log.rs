use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive
pub const LOG_FILTER_ENV: &str = "VAC_LOG";

/// Global flag to control verbose property/IO tracing
pub static IO_DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static INIT_LOGGING: Once = Once::new();

/// Set verbose property/IO tracing on/off
pub fn set_io_debug(enabled: bool) {
    IO_DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
    tracing::info!(
        "🔧 IO debug logging {}",
        if enabled { "ENABLED" } else { "DISABLED" }
    );
}

/// Check if verbose property/IO tracing is enabled
pub fn is_io_debug_enabled() -> bool {
    IO_DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Install the fmt subscriber, filtered by `VAC_LOG` (default `info`).
/// Safe to call more than once; only the first call has an effect, and an
/// already-installed global subscriber is left in place.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}

/// Verbose debug macro - only traces if IO debug is enabled
#[macro_export]
macro_rules! io_debug {
    ($($arg:tt)*) => {
        if $crate::log::IO_DEBUG_ENABLED.load(std::sync::atomic::Ordering::Relaxed) {
            tracing::debug!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_io_debug_toggle() {
        set_io_debug(true);
        assert!(is_io_debug_enabled());
        set_io_debug(false);
        assert!(!is_io_debug_enabled());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}

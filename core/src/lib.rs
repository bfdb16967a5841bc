//! Sprig: an embeddable JavaScript-like scripting engine.
//!
//! Scripts are lexed and evaluated in a single recursive-descent pass over a
//! reference-counted value graph. Start from [`api::Engine`].

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod api;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod snapshot;
pub mod stdlib;
pub mod values;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize a tracing subscriber writing through the test harness.
    /// `RUST_LOG` overrides the default `debug` level.
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_loop() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}

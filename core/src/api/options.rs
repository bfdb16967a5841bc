//! Configuration options for the Sprig engine.

/// Resource limits applied while scripts run.
///
/// # Example
///
/// ```
/// use sprig_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_depth: 64,
///     max_iterations: Some(10_000),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Maximum nesting of function calls (for recursion protection).
    ///
    /// Default: 256
    pub max_depth: usize,

    /// Maximum number of iterations of any single loop (if Some).
    ///
    /// Set to `None` for unlimited iterations (be careful with untrusted code!).
    ///
    /// Default: None
    pub max_iterations: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_iterations: None,
        }
    }
}

/// Configuration options for the Sprig engine.
///
/// # Example
///
/// ```
/// use sprig_core::api::{EngineOptions, ExecutionOptions};
///
/// let options = EngineOptions {
///     execution: ExecutionOptions::default(),
///     stdlib: false,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub execution: ExecutionOptions,

    /// Register the standard library (`Math`, `JSON`, `console`, string and
    /// array methods, ...) when the engine is created.
    ///
    /// Default: true
    pub stdlib: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            execution: ExecutionOptions::default(),
            stdlib: true,
        }
    }
}

#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature `debug!` and `warn!` come from `tracing`;
//! without it they expand to nothing and call sites compile unchanged. The
//! `tracing-json` feature adds [`init_json_subscriber`] for hosts that want
//! structured JSON logs.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Install a global JSON subscriber filtered by `filter` (an `EnvFilter`
/// directive such as `"gridpage_runtime=debug,info"`).
///
/// `RUST_LOG`, when set, takes precedence over `filter`. Returns an error if
/// a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber(
    filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(filter)?,
    };
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_current_span(true)
        .try_init()
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_take_structured_fields_with_or_without_tracing() {
        let path = std::path::Path::new("grid.toml");
        crate::debug!(path = %path.display(), "loading grid config (toml)");
        crate::warn!(count = 2usize, "grid config rejected");
    }
}

//! Telemetry helpers for hosts embedding `cpi-chart`.
//!
//! The core only emits `tracing` events (scene recomputes, gesture updates,
//! degenerate-domain fallbacks). Installing a subscriber is left to the host;
//! this helper covers the common case.

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "cpi_chart=info";

/// Installs a compact `tracing` subscriber when the `telemetry` feature is on.
///
/// Honors `RUST_LOG` and falls back to [`DEFAULT_FILTER`]. Returns `false`
/// when the feature is disabled or the host already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

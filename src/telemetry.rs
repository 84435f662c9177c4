//! Opt-in `tracing` setup for hosts embedding `funnel-rs`.
//!
//! Graphs log through `tracing` with a `graph_id` field on every event.
//! Without the `telemetry` feature nothing here installs a subscriber.

/// Filter used when `RUST_LOG` is unset: init, draw passes and warnings.
pub const DEFAULT_FILTER: &str = "funnel_rs=debug";

/// Installs a compact subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` when the feature is disabled or a global subscriber is
/// already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return install(filter);
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Installs a compact subscriber with an explicit filter directive such as
/// `"funnel_rs=trace"` to see per-pointer-event logs.
#[must_use]
pub fn init_tracing_with_filter(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        return install(tracing_subscriber::EnvFilter::new(directive));
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}

#[cfg(feature = "telemetry")]
fn install(filter: tracing_subscriber::EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}

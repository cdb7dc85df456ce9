//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: `RUST_LOG` if set, otherwise `default_filter`.
///
/// Calling this again after a subscriber is installed is a no-op.
///
/// # Errors
/// Returns an error if `default_filter` is needed and is not a valid filter.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter '{}'", default_filter))?,
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}

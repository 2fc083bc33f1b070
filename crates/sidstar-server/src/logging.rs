//! Tracing subscriber setup shared by the server and its tools.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `default_directive` applies on top of `RUST_LOG`.
pub fn init_tracing(default_directive: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(default_directive.parse()?);

    if json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json())
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .try_init()?;
    }

    Ok(())
}

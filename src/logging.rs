//! Tracing setup for the command-line front end
//!
//! The library only emits events; installing a subscriber is left to the
//! binary. `RUST_LOG` takes precedence over the `-v` count.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directive for a `-v` count
pub fn verbosity_to_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(verbosity_to_filter(verbosity))?,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    Registry::default().with(filter).with(fmt_layer).try_init()?;
    Ok(())
}

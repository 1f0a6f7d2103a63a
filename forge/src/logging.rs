//! Log output for the binary.
//!
//! Events go to stderr so reports on stdout stay clean. `MODFORGE_LOG` takes
//! an `EnvFilter` directive; `-v` and `-vv` override it with `info` and
//! `debug`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "MODFORGE_LOG";

fn filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    }
}

pub fn init(verbose: u8) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 1);
    // Keep a subscriber that is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(layer)
        .try_init();
}

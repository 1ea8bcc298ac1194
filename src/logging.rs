/// Logging setup
///
/// Log lines go to stderr so `--format json` output on stdout stays parseable.

use anyhow::{anyhow, Result};
use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a given -v count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,docker_probe=info",
        1 => "info,docker_probe=debug",
        _ => "debug,docker_probe=trace",
    }
}

/// Colour only for an interactive stderr, and never when NO_COLOR is set
pub fn ansi_enabled(is_terminal: bool, no_color: Option<&str>) -> bool {
    is_terminal && no_color.map_or(true, str::is_empty)
}

/// Install the global subscriber. RUST_LOG overrides the -v count.
pub fn init(verbosity: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let ansi = ansi_enabled(
        std::io::stderr().is_terminal(),
        std::env::var("NO_COLOR").ok().as_deref(),
    );

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Log level for the global verbosity flags
pub fn log_level(verbose: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the stderr subscriber. Stdout is left to command output.
pub fn configure_logging(verbose: bool, quiet: bool) {
    let level = log_level(verbose, quiet);
    registry()
        .with(EnvFilter::new(level.to_string()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

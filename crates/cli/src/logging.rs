//! tracing-subscriber setup shared by every command.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity count and base level.
pub fn default_directive(base: &str, verbosity: u8) -> String {
    let level = match verbosity {
        0 => base,
        1 => "debug",
        _ => "trace",
    };
    format!("gotthard={level},gotthard_engine={level},gotthard_concurrency={level},gotthard_server={level},gotthard_client={level}")
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the verbosity-derived filter. With `log_file` the
/// output is appended to that file without ANSI colors.
pub fn init(base: &str, verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(base, verbosity)))
        .context("invalid log filter")?;

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }
    Ok(())
}

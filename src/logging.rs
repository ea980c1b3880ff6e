//! Diagnostic logging setup.
//!
//! The interactive UI owns the terminal, so diagnostics only go to a file
//! given with `--log`. Headless commands fall back to stderr. `RUST_LOG`
//! overrides the default filter either way.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILE_FILTER: &str = "headstart=debug";
const DEFAULT_STDERR_FILTER: &str = "headstart=warn";

/// Where diagnostics go when no log file was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Discard,
    Stderr,
}

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init(log_file: Option<&Path>, fallback: Fallback) -> Result<(), Box<dyn Error>> {
    match (log_file, fallback) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter_or(DEFAULT_FILE_FILTER))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| -> Box<dyn Error> { e })?;
        }
        (None, Fallback::Stderr) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter_or(DEFAULT_STDERR_FILTER))
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| -> Box<dyn Error> { e })?;
        }
        (None, Fallback::Discard) => {}
    }
    Ok(())
}

use super::config::Config;
use super::error::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_ENV_VAR: &str = "JOTTER_LOG";

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Plain commands write to stderr
    Stderr,
    /// The interactive UI owns the terminal, so logs go to the configured file
    File,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global tracing subscriber.
///
/// Calling this more than once is harmless; later calls keep the first subscriber.
pub fn init_logging(config: &Config, target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    match target {
        LogTarget::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        LogTarget::File => {
            config.init()?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_path)?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }

    Ok(())
}

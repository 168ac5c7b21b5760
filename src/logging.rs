//! Log destination selection
//!
//! The destination is decided once at startup from the command line and
//! handed around as a [`Dispatch`]; nothing here installs a global
//! subscriber.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, LogFormat};
use crate::errors::BbgurlError;

/// Environment variable overriding the log filter (`RUST_LOG` syntax)
pub const LOG_ENV: &str = "BBGURL_LOG";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Discard everything
    Off,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// `--logfile` wins over `--verbose`; neither means no logging
    pub fn from_args(args: &Args) -> Self {
        if let Some(ref path) = args.logfile {
            LogTarget::File(path.clone())
        } else if args.verbose > 0 {
            LogTarget::Stderr
        } else {
            LogTarget::Off
        }
    }
}

/// Build the log dispatcher for a run
pub fn build_dispatch(target: &LogTarget, verbosity: u8, format: LogFormat) -> Result<Dispatch, BbgurlError> {
    match target {
        LogTarget::Off => Ok(Dispatch::none()),
        LogTarget::Stderr => Ok(fmt_dispatch(std::io::stderr, filter(verbosity), format, true)),
        LogTarget::File(path) => {
            let file = File::create(path)
                .map_err(|e| BbgurlError::Logging(format!("cannot open log file {}: {}", path.display(), e)))?;
            Ok(fmt_dispatch(Mutex::new(file), filter(verbosity), format, false))
        }
    }
}

/// Filter from `BBGURL_LOG`, or from the number of `-v` flags
fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)))
}

fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 | 1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

fn fmt_dispatch<W>(writer: W, filter: EnvFilter, format: LogFormat, ansi: bool) -> Dispatch
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    match format {
        LogFormat::Text => Dispatch::new(builder.finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}

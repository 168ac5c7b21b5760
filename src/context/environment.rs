//! Execution environment (terminals, config location)

use std::path::PathBuf;

use crate::config::CONFIG_DIR_ENV;

/// Execution environment
#[derive(Debug, Clone)]
pub struct Environment {
    pub stdout_isatty: bool,
    pub stderr_isatty: bool,
    /// Config directory override from `BBGURL_CONFIG_DIR`
    pub config_dir: Option<PathBuf>,
}

impl Environment {
    /// Capture the environment of the current process
    pub fn init() -> Self {
        Self::default()
    }

    /// Whether a progress bar may take over the terminal
    ///
    /// The bar is drawn on stderr, so stderr must be a terminal. When the
    /// body itself goes to a terminal stdout the two would interleave, so
    /// the bar is suppressed there too.
    pub fn progress_allowed(&self, body_to_stdout: bool) -> bool {
        self.stderr_isatty && !(body_to_stdout && self.stdout_isatty)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            stdout_isatty: atty::is(atty::Stream::Stdout),
            stderr_isatty: atty::is(atty::Stream::Stderr),
            config_dir: std::env::var_os(CONFIG_DIR_ENV)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        }
    }
}

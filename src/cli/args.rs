//! CLI argument definitions using clap
//!
//! This module defines all command-line arguments for bbgurl.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// bbgurl - a tiny command line HTTP client
#[derive(Parser, Debug, Clone)]
#[command(name = "bbgurl", version, about, long_about = None)]
#[command(override_usage = "bbgurl <URL> [OPTIONS]")]
pub struct Args {
    // =========================================================================
    // POSITIONAL ARGUMENTS
    // =========================================================================

    /// The URL to request; several words are joined with spaces
    #[arg(value_name = "URL")]
    pub url: Vec<String>,

    // =========================================================================
    // REQUEST
    // =========================================================================

    /// HTTP method
    #[arg(short = 'X', long = "method", value_name = "METHOD", default_value = "GET")]
    pub method: String,

    /// String body for the HTTP request
    #[arg(short = 'd', long = "body", value_name = "BODY")]
    pub body: Option<String>,

    /// A JSON representation of any headers, e.g. '{"Accept": "application/json"}'
    #[arg(short = 'H', long = "headers", value_name = "JSON")]
    pub headers: Option<String>,

    /// Follow HTTP 3xx redirects for GET and HEAD requests (default)
    #[arg(long = "follow-redirect", alias = "followRedirect", action = ArgAction::SetTrue, overrides_with = "no_follow_redirect")]
    pub follow_redirect: bool,

    /// Do not follow any redirect
    #[arg(long = "no-follow-redirect", alias = "no-followRedirect", action = ArgAction::SetTrue, overrides_with = "follow_redirect")]
    pub no_follow_redirect: bool,

    /// Follow HTTP 3xx redirects for every method
    #[arg(long = "follow-all-redirects", alias = "followAllRedirects", action = ArgAction::SetTrue)]
    pub follow_all_redirects: bool,

    /// Maximum number of redirects to follow
    #[arg(long = "max-redirects", value_name = "NUM", default_value = "10")]
    pub max_redirects: usize,

    /// Require that SSL certificates be valid
    #[arg(long = "strict-ssl", alias = "strictSSL", action = ArgAction::SetTrue)]
    pub strict_ssl: bool,

    /// Request timeout in seconds
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<f64>,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// HTTP response output file (default stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Reformat JSON response bodies with indentation
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pub pretty: bool,

    /// Show a progress bar while the body downloads
    #[arg(long = "progress", action = ArgAction::SetTrue)]
    pub progress: bool,

    // =========================================================================
    // LOGGING & TROUBLESHOOTING
    // =========================================================================

    /// Output logs to stderr. Use -vv or -vvv for more detail
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long = "logfile", value_name = "FILE")]
    pub logfile: Option<PathBuf>,

    /// Output format for structured logging: json (JSON Lines) or text (default)
    #[arg(long = "log-format", value_name = "FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Show the full error chain on failure
    #[arg(long = "traceback", action = ArgAction::SetTrue)]
    pub traceback: bool,
}

impl Args {
    /// The request URL, from all positional words
    pub fn joined_url(&self) -> String {
        self.url.join(" ").trim().to_string()
    }

    /// Whether GET/HEAD redirects are followed
    pub fn follows_redirects(&self) -> bool {
        !self.no_follow_redirect
    }
}

/// Log output format
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["bbgurl", "http://example.com"]);
        assert_eq!(args.method, "GET");
        assert!(args.follows_redirects());
        assert!(!args.follow_all_redirects);
        assert!(!args.strict_ssl);
        assert!(!args.pretty);
        assert!(!args.progress);
        assert_eq!(args.max_redirects, 10);
        assert_eq!(args.verbose, 0);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_url_words_are_joined() {
        let args = Args::parse_from(["bbgurl", "http://example.com/search?q=a", "b"]);
        assert_eq!(args.joined_url(), "http://example.com/search?q=a b");
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from([
            "bbgurl", "-X", "POST", "-d", "hello", "-H", r#"{"A":"b"}"#, "-o", "out.txt", "-vv", "http://example.com",
        ]);
        assert_eq!(args.method, "POST");
        assert_eq!(args.body.as_deref(), Some("hello"));
        assert_eq!(args.headers.as_deref(), Some(r#"{"A":"b"}"#));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_redirect_flags() {
        let args = Args::parse_from(["bbgurl", "--no-follow-redirect", "http://example.com"]);
        assert!(!args.follows_redirects());

        let args = Args::parse_from(["bbgurl", "--no-follow-redirect", "--follow-redirect", "http://example.com"]);
        assert!(args.follows_redirects());

        let args = Args::parse_from(["bbgurl", "--followAllRedirects", "--strictSSL", "http://example.com"]);
        assert!(args.follow_all_redirects);
        assert!(args.strict_ssl);
    }

    #[test]
    fn test_log_format() {
        let args = Args::parse_from(["bbgurl", "--log-format", "json", "http://example.com"]);
        assert_eq!(args.log_format, Some(LogFormat::Json));
    }
}

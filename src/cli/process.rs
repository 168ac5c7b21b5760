//! Post-processing argument logic
//!
//! Turns parsed [`Args`] into a request description and an output
//! selection: URL normalization, method and header parsing, sink choice.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::warn;
use url::Url;

use crate::cli::args::Args;
use crate::config::Config;
use crate::errors::BbgurlError;
use crate::output::sink::{DestinationConfig, SinkConfig, SinkMode};

/// Check if a string has a valid URL scheme (e.g., "http://", "https://")
/// Per RFC 3986: scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn has_url_scheme(s: &str) -> bool {
    if let Some(pos) = s.find("://") {
        let scheme = &s[..pos];
        !scheme.is_empty()
            && scheme.chars().next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false)
            && scheme.chars().skip(1).all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
    } else {
        false
    }
}

/// Processed arguments ready for request building
#[derive(Debug, Clone)]
pub struct ProcessedArgs {
    pub method: Method,
    /// Fully qualified URL
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
    /// Where and how the response body is written
    pub sink: SinkConfig,
    /// Progress bar was asked for (may still be turned off for a non-TTY)
    pub progress: bool,
}

/// Process raw CLI arguments into a usable form
pub fn process_args(args: &Args, config: &Config) -> Result<ProcessedArgs, BbgurlError> {
    let url = normalize_url(&args.joined_url())?;

    let method: Method = args
        .method
        .to_uppercase()
        .parse()
        .map_err(|_| BbgurlError::Argument(format!("Invalid HTTP method: {}", args.method)))?;

    let headers = match args.headers {
        Some(ref json) => parse_headers(json),
        None => HeaderMap::new(),
    };

    let sink = SinkConfig {
        mode: if args.pretty { SinkMode::PrettyPrint } else { SinkMode::Raw },
        destination: match args.output {
            Some(ref path) => DestinationConfig::File(path.clone()),
            None => DestinationConfig::Stdout,
        },
        json: config.json_options(),
    };

    Ok(ProcessedArgs {
        method,
        url,
        headers,
        body: args.body.clone(),
        sink,
        progress: args.progress,
    })
}

/// Validate the URL, defaulting to http:// when no scheme is given
fn normalize_url(raw: &str) -> Result<Url, BbgurlError> {
    if raw.is_empty() {
        return Err(BbgurlError::Argument("Must specify a uri.".to_string()));
    }
    let full = if has_url_scheme(raw) {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    Ok(Url::parse(&full)?)
}

/// Parse the `--headers` JSON object
///
/// Anything that is not a JSON object is logged and treated as no headers.
/// Non-string values are sent as their JSON text; entries that are not
/// valid header names or values are skipped.
pub fn parse_headers(json: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let object = match serde_json::from_str::<JsonValue>(json) {
        Ok(JsonValue::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!("Unable to parse headers information. Defaulting to {{}}.");
            return headers;
        }
    };

    for (name, value) in object {
        let value = match value {
            JsonValue::String(s) => s,
            other => other.to_string(),
        };
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!(header = %name, "Skipping invalid header"),
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::JsonFormatterOptions;
    use clap::Parser;
    use std::path::PathBuf;

    fn process(argv: &[&str]) -> Result<ProcessedArgs, BbgurlError> {
        let mut full = vec!["bbgurl"];
        full.extend_from_slice(argv);
        process_args(&Args::parse_from(full), &Config::default())
    }

    #[test]
    fn test_url_scheme_detection() {
        assert!(has_url_scheme("http://example.com"));
        assert!(has_url_scheme("https://example.com"));
        assert!(!has_url_scheme("example.com"));
        assert!(!has_url_scheme("://example.com"));
        assert!(!has_url_scheme("1http://example.com"));
    }

    #[test]
    fn test_missing_url() {
        let err = process(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Must specify a uri.");
    }

    #[test]
    fn test_url_default_scheme() {
        let processed = process(&["example.com/path"]).unwrap();
        assert_eq!(processed.url.as_str(), "http://example.com/path");
    }

    #[test]
    fn test_method_is_uppercased() {
        let processed = process(&["-X", "post", "http://example.com"]).unwrap();
        assert_eq!(processed.method, Method::POST);
    }

    #[test]
    fn test_sink_selection() {
        let processed = process(&["http://example.com"]).unwrap();
        assert_eq!(processed.sink.mode, SinkMode::Raw);
        assert_eq!(processed.sink.destination, DestinationConfig::Stdout);
        assert_eq!(processed.sink.json, JsonFormatterOptions::default());

        let processed = process(&["--pretty", "-o", "body.json", "http://example.com"]).unwrap();
        assert_eq!(processed.sink.mode, SinkMode::PrettyPrint);
        assert_eq!(processed.sink.destination, DestinationConfig::File(PathBuf::from("body.json")));
    }

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(r#"{"Accept": "application/json", "X-Count": 3, "X-Flag": true}"#);
        assert_eq!(headers.get("accept").unwrap(), "application/json");
        assert_eq!(headers.get("x-count").unwrap(), "3");
        assert_eq!(headers.get("x-flag").unwrap(), "true");
    }

    #[test]
    fn test_parse_headers_invalid_json_defaults_to_empty() {
        assert!(parse_headers("{not json").is_empty());
        assert!(parse_headers("[1, 2]").is_empty());
    }

    #[test]
    fn test_parse_headers_skips_invalid_names() {
        let headers = parse_headers(r#"{"Bad Header": "x", "Good": "y"}"#);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("good").unwrap(), "y");
    }
}

//! HTTP request building and sending
//!
//! This module provides the HTTP client side using reqwest. Only the
//! response head is awaited here; the body is left as a stream for the
//! transfer loop.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, Method, Response};
use tracing::{debug, info};

use crate::cli::{Args, ProcessedArgs};
use crate::errors::BbgurlError;

pub const USER_AGENT_STRING: &str = concat!("bbgurl/", env!("CARGO_PKG_VERSION"));

/// Redirect behaviour for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// 3xx responses are returned as-is
    None,
    /// Follow up to this many hops
    Limited(usize),
}

impl RedirectMode {
    /// GET and HEAD follow unless disabled; other methods need
    /// `--follow-all-redirects`
    pub fn for_request(args: &Args, method: &Method) -> Self {
        let safe = *method == Method::GET || *method == Method::HEAD;
        if args.follow_all_redirects || (safe && args.follows_redirects()) {
            RedirectMode::Limited(args.max_redirects)
        } else {
            RedirectMode::None
        }
    }

    fn policy(self) -> Policy {
        match self {
            RedirectMode::None => Policy::none(),
            RedirectMode::Limited(max) => Policy::custom(move |attempt| {
                if attempt.previous().len() > max {
                    attempt.error(format!("too many redirects (limit {})", max))
                } else {
                    debug!(status = %attempt.status(), location = %attempt.url(), "Following redirect");
                    attempt.follow()
                }
            }),
        }
    }
}

/// Build the HTTP client with appropriate configuration
pub fn build_client(args: &Args, method: &Method) -> Result<Client, BbgurlError> {
    let mut builder = Client::builder().user_agent(USER_AGENT_STRING);

    if let Some(timeout) = args.timeout {
        if !timeout.is_finite() || timeout <= 0.0 {
            return Err(BbgurlError::Argument(format!("Invalid timeout: {}", timeout)));
        }
        builder = builder.timeout(Duration::from_secs_f64(timeout));
    }

    if !args.strict_ssl {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder = builder
        .redirect(RedirectMode::for_request(args, method).policy())
        .referer(false);

    builder.build().map_err(BbgurlError::Request)
}

/// Send the request and wait for the response head
pub async fn send_request(args: &Args, processed: &ProcessedArgs) -> Result<Response, BbgurlError> {
    let client = build_client(args, &processed.method)?;

    let mut request = client
        .request(processed.method.clone(), processed.url.clone())
        .headers(processed.headers.clone());
    if let Some(ref body) = processed.body {
        request = request.body(body.clone());
    }

    info!(method = %processed.method, url = %processed.url, "Sending request");
    let response = request.send().await?;
    debug!(url = %response.url(), status = %response.status(), "Response received");

    Ok(response)
}

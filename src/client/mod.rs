//! HTTP client functionality

pub mod http;

// Re-exports
pub use http::{build_client, send_request, RedirectMode, USER_AGENT_STRING};

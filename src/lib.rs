//! bbgurl library interface
//!
//! A tiny command line HTTP client that streams a response body to stdout
//! or a file, optionally pretty-printing JSON and drawing a progress bar.
//!
//! # Module Organization
//!
//! - [`transfer`] - Response streaming loop (run_transfer, Transfer)
//! - [`output`] - Output sinks and JSON formatting
//! - [`progress`] - Terminal progress bar and raw-mode lifecycle
//! - [`signals`] - Interrupt handling (Interrupt, set_interrupted)
//! - [`errors`] - Error types (BbgurlError, TransferError)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod binary;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod logging;
pub mod output;
pub mod progress;
pub mod signals;
pub mod status;
pub mod transfer;

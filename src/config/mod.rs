//! Configuration file support

mod config;

pub use config::{Config, FormatConfig, ProgressSection, CONFIG_DIR_ENV};

//! Output handling (formatting and sinks)

pub mod error;
pub mod formatters;
pub mod sink;

pub use error::{FormatResult, ParseFormatError};
pub use formatters::{format_json, JsonFormatterOptions};
pub use sink::{Destination, DestinationConfig, OutputSink, SinkConfig, SinkMode};

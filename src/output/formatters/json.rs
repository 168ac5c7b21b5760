//! JSON formatting

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value as JsonValue;

use crate::output::error::{FormatResult, ParseFormatError};

/// JSON formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFormatterOptions {
    /// Indentation (default: 2 spaces)
    pub indent: usize,
    /// Sort keys alphabetically
    pub sort_keys: bool,
}

impl Default for JsonFormatterOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            sort_keys: false,
        }
    }
}

/// Reformat one complete JSON document with indentation
///
/// The whole input must be a single JSON value; anything else (binary data,
/// HTML, truncated documents, several concatenated values) is an error so
/// the caller can fall back to the original bytes.
pub fn format_json(input: &[u8], options: &JsonFormatterOptions) -> FormatResult<Vec<u8>> {
    if input.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseFormatError::Empty);
    }

    let value: JsonValue = serde_json::from_slice(input)?;

    if options.sort_keys {
        format_value(&sort_json_keys(&value), options.indent)
    } else {
        format_value(&value, options.indent)
    }
}

/// Format a JSON value with indentation
fn format_value(value: &JsonValue, indent: usize) -> FormatResult<Vec<u8>> {
    let indent = vec![b' '; indent];
    let formatter = PrettyFormatter::with_indent(&indent);
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    value
        .serialize(&mut serializer)
        .map_err(|e| ParseFormatError::serialize(e.to_string()))?;

    Ok(buf)
}

/// Maximum recursion depth for JSON key sorting to prevent stack overflow
const MAX_JSON_DEPTH: usize = 128;

/// Sort JSON object keys recursively with depth limit
fn sort_json_keys(value: &JsonValue) -> JsonValue {
    sort_json_keys_with_depth(value, 0)
}

fn sort_json_keys_with_depth(value: &JsonValue, depth: usize) -> JsonValue {
    if depth >= MAX_JSON_DEPTH {
        return value.clone();
    }

    match value {
        JsonValue::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));

            let sorted_map: serde_json::Map<String, JsonValue> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_json_keys_with_depth(v, depth + 1)))
                .collect();

            JsonValue::Object(sorted_map)
        }
        JsonValue::Array(arr) => {
            JsonValue::Array(arr.iter().map(|v| sort_json_keys_with_depth(v, depth + 1)).collect())
        }
        _ => value.clone(),
    }
}

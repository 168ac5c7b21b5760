//! Output sinks: where the response body goes, raw or pretty-printed
//!
//! The sink owns the destination handle exclusively. Every write is awaited,
//! so a slow destination holds back the next read from the response stream
//! instead of letting body data pile up in memory.

use std::fmt;
use std::path::PathBuf;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::output::formatters::{format_json, JsonFormatterOptions};

/// Boxed async destination (file or stdout)
pub type Destination = Box<dyn AsyncWrite + Send + Unpin>;

/// How the body should be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkMode {
    /// Bytes pass through unchanged
    #[default]
    Raw,
    /// Each write is reformatted as indented JSON when it parses
    PrettyPrint,
}

/// Where the body should be written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DestinationConfig {
    #[default]
    Stdout,
    File(PathBuf),
}

impl fmt::Display for DestinationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationConfig::Stdout => write!(f, "stdout"),
            DestinationConfig::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Sink selection made once at startup
#[derive(Debug, Clone, Default)]
pub struct SinkConfig {
    pub mode: SinkMode,
    pub destination: DestinationConfig,
    pub json: JsonFormatterOptions,
}

impl SinkConfig {
    /// Open the destination and build the sink
    ///
    /// Files are created (or truncated) here.
    pub async fn open(&self) -> std::io::Result<OutputSink<Destination>> {
        let dest: Destination = match &self.destination {
            DestinationConfig::Stdout => Box::new(tokio::io::stdout()),
            DestinationConfig::File(path) => Box::new(tokio::fs::File::create(path).await?),
        };
        Ok(OutputSink::new(self.mode, dest, self.json.clone()))
    }
}

/// A write target for the response body
#[derive(Debug)]
pub enum OutputSink<W> {
    /// Pass-through
    Raw(W),
    /// Reformat each write as JSON, falling back to the original bytes
    PrettyPrint {
        dest: W,
        options: JsonFormatterOptions,
    },
}

impl<W> OutputSink<W>
where
    W: AsyncWrite + Unpin,
{
    /// Build a sink of the given mode around `dest`
    pub fn new(mode: SinkMode, dest: W, options: JsonFormatterOptions) -> Self {
        match mode {
            SinkMode::Raw => OutputSink::Raw(dest),
            SinkMode::PrettyPrint => OutputSink::PrettyPrint { dest, options },
        }
    }

    pub fn mode(&self) -> SinkMode {
        match self {
            OutputSink::Raw(_) => SinkMode::Raw,
            OutputSink::PrettyPrint { .. } => SinkMode::PrettyPrint,
        }
    }

    /// Write one chunk
    ///
    /// Resolves once the destination has accepted all of it.
    pub async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        match self {
            OutputSink::Raw(dest) => dest.write_all(chunk).await,
            OutputSink::PrettyPrint { dest, options } => match format_json(chunk, options) {
                Ok(formatted) => dest.write_all(&formatted).await,
                Err(e) => {
                    trace!(error = %e, len = chunk.len(), "Chunk is not JSON, writing it unchanged");
                    dest.write_all(chunk).await
                }
            },
        }
    }

    /// Finish the output: trailing newline for pretty output, then flush and close
    pub async fn end(&mut self) -> std::io::Result<()> {
        if let OutputSink::PrettyPrint { dest, .. } = self {
            dest.write_all(b"\n").await?;
        }
        self.close().await
    }

    /// Flush and close without finishing the output
    pub async fn close(&mut self) -> std::io::Result<()> {
        let dest = self.destination_mut();
        dest.flush().await?;
        dest.shutdown().await
    }

    fn destination_mut(&mut self) -> &mut W {
        match self {
            OutputSink::Raw(dest) => dest,
            OutputSink::PrettyPrint { dest, .. } => dest,
        }
    }

    /// Take the destination back
    pub fn into_inner(self) -> W {
        match self {
            OutputSink::Raw(dest) => dest,
            OutputSink::PrettyPrint { dest, .. } => dest,
        }
    }
}

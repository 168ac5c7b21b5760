//! Moving a response body to its destination
//!
//! [`Transfer`] drives one response: every chunk is written to the
//! [`OutputSink`] and, when a [`ProgressView`] is attached, reflected in the
//! progress bar through a [`RateEstimator`]. The interrupt event and the
//! response stream are served by a single `select!` loop, so chunks, end,
//! errors and Ctrl+C are handled one at a time and in order.
//!
//! Cleanup order on every early exit: terminal first, then the sink.

pub mod rate;
pub mod state;

use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::{pin_mut, Stream, StreamExt};
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{StatusCode, Version};
use tokio::io::AsyncWrite;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info, warn, Dispatch};

use crate::errors::{BbgurlError, BoxError, TransferError};
use crate::output::sink::{OutputSink, SinkConfig};
use crate::progress::{CrosstermTerminal, ProgressConfig, ProgressView};
use crate::signals::Interrupt;

pub use rate::RateEstimator;
pub use state::TransferProgress;

/// How a transfer ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The whole body was written
    Completed { bytes: u64 },
    /// Ctrl+C stopped the transfer; the destination had accepted `bytes` by then
    Interrupted { bytes: u64 },
}

impl TransferOutcome {
    pub fn bytes(&self) -> u64 {
        match self {
            TransferOutcome::Completed { bytes } | TransferOutcome::Interrupted { bytes } => *bytes,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, TransferOutcome::Interrupted { .. })
    }
}

/// Status line and headers of a response
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
}

impl ResponseHead {
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers,
        }
    }

    pub fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
        }
    }

    /// Declared body length, if the header is a non-negative integer
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
    }
}

/// Settings shared by every transfer in a run
#[derive(Debug, Clone, Default)]
pub struct TransferSettings {
    /// Event that cancels the transfer
    pub interrupt: Interrupt,
    /// Log destination chosen at startup; `None` uses the ambient subscriber
    pub logger: Option<Dispatch>,
    pub progress: ProgressConfig,
    /// Rate smoothing window, `None` for the default
    pub smoothing_window: Option<Duration>,
}

/// Stream a live response into the configured sink
///
/// Opens the destination, optionally puts a progress bar on the terminal,
/// and runs a [`Transfer`]. A progress bar that cannot take over the
/// terminal is skipped with a warning rather than failing the transfer.
pub async fn run_transfer(
    response: reqwest::Response,
    sink_config: &SinkConfig,
    progress_enabled: bool,
    settings: &TransferSettings,
) -> Result<TransferOutcome, BbgurlError> {
    let head = ResponseHead::from_response(&response);
    let sink = sink_config.open().await?;

    let mut transfer = Transfer::new(sink, settings.interrupt.clone())
        .with_destination_label(sink_config.destination.to_string());
    if let Some(window) = settings.smoothing_window {
        transfer = transfer.with_smoothing_window(window);
    }
    if let Some(ref logger) = settings.logger {
        transfer = transfer.with_logger(logger.clone());
    }

    if progress_enabled {
        let terminal = Box::new(CrosstermTerminal::new(settings.interrupt.clone()));
        match ProgressView::start(settings.progress.clone(), terminal) {
            Ok(view) => transfer = transfer.with_progress(view),
            Err(e) => warn!(error = %e, "Cannot show progress bar, continuing without it"),
        }
    }

    Ok(transfer.run(&head, response.bytes_stream()).await?)
}

enum Event<T> {
    Interrupted,
    Item(Option<T>),
}

/// One response body on its way to a sink
pub struct Transfer<W> {
    sink: OutputSink<W>,
    progress: Option<ProgressView>,
    interrupt: Interrupt,
    logger: Option<Dispatch>,
    smoothing_window: Duration,
    destination: String,
    state: TransferProgress,
    /// Bytes the destination has accepted
    written: u64,
}

impl<W> Transfer<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: OutputSink<W>, interrupt: Interrupt) -> Self {
        Self {
            sink,
            progress: None,
            interrupt,
            logger: None,
            smoothing_window: rate::DEFAULT_WINDOW,
            destination: String::from("output"),
            state: TransferProgress::new(),
            written: 0,
        }
    }

    /// Drive this progress view; it is stopped when the transfer ends
    pub fn with_progress(mut self, view: ProgressView) -> Self {
        self.progress = Some(view);
        self
    }

    /// Log through this dispatcher instead of the ambient one
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_smoothing_window(mut self, window: Duration) -> Self {
        self.smoothing_window = window;
        self
    }

    /// Name of the destination used in log messages
    pub fn with_destination_label(mut self, label: impl Into<String>) -> Self {
        self.destination = label.into();
        self
    }

    pub fn progress(&self) -> Option<&ProgressView> {
        self.progress.as_ref()
    }

    pub fn into_sink(self) -> OutputSink<W> {
        let Transfer { sink, progress, .. } = self;
        drop(progress);
        sink
    }

    /// Consume the response stream until it ends, fails, or is interrupted
    pub async fn run<S, E>(&mut self, head: &ResponseHead, body: S) -> Result<TransferOutcome, TransferError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        match self.logger.clone() {
            Some(logger) => self.drive(head, body).with_subscriber(logger).await,
            None => self.drive(head, body).await,
        }
    }

    async fn drive<S, E>(&mut self, head: &ResponseHead, body: S) -> Result<TransferOutcome, TransferError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        info!(status = %head.status, version = ?head.version, "Response received");
        for (name, value) in head.headers.iter() {
            debug!(header = %name, value = ?value, "Response header");
        }
        if let Some(length) = head.content_length() {
            self.state.set_expected(length);
        }

        let mut rate = RateEstimator::with_window(Instant::now(), self.smoothing_window);
        if let Some(view) = self.progress.as_mut() {
            view.render(self.state.percent(), &self.state.live_label(0.0));
        }

        pin_mut!(body);
        loop {
            if self.interrupt.is_raised() {
                return Ok(self.interrupted().await);
            }

            let event = tokio::select! {
                biased;
                _ = self.interrupt.raised() => Event::Interrupted,
                item = body.next() => Event::Item(item),
            };

            let chunk = match event {
                Event::Interrupted => return Ok(self.interrupted().await),
                Event::Item(None) => break,
                Event::Item(Some(Err(e))) => {
                    let err = TransferError::stream(e);
                    warn!(error = %err, received = self.state.received(), "Response stream failed");
                    self.abort().await;
                    return Err(err);
                }
                Event::Item(Some(Ok(chunk))) => chunk,
            };

            // Ctrl+C may have landed while this chunk was being read
            if self.interrupt.is_raised() {
                return Ok(self.interrupted().await);
            }

            let len = chunk.len() as u64;
            self.state.add(len);

            let written = tokio::select! {
                biased;
                _ = self.interrupt.raised() => None,
                result = self.sink.write(&chunk) => Some(result),
            };
            match written {
                None => return Ok(self.interrupted().await),
                Some(Err(e)) => {
                    warn!(error = %e, destination = %self.destination, "Write failed");
                    self.abort().await;
                    return Err(TransferError::SinkWrite(e));
                }
                Some(Ok(())) => self.written += len,
            }

            if let Some(view) = self.progress.as_mut() {
                rate.sample(len, Instant::now());
                view.render(self.state.percent(), &self.state.live_label(rate.current_rate()));
            }
        }

        if let Err(e) = self.sink.end().await {
            self.stop_progress();
            return Err(TransferError::SinkWrite(e));
        }
        if let Some(view) = self.progress.as_mut() {
            view.finish(&self.state.summary_label());
        }
        self.stop_progress();

        let bytes = self.written;
        info!(bytes, destination = %self.destination, "data written to {}", self.destination);
        Ok(TransferOutcome::Completed { bytes })
    }

    /// Restore the terminal, close the sink, report what was written
    async fn interrupted(&mut self) -> TransferOutcome {
        self.abort().await;
        let bytes = self.written;
        info!(
            bytes,
            received = self.state.received(),
            destination = %self.destination,
            "Transfer interrupted"
        );
        TransferOutcome::Interrupted { bytes }
    }

    async fn abort(&mut self) {
        self.stop_progress();
        if let Err(e) = self.sink.close().await {
            debug!(error = %e, "Closing output after failure");
        }
    }

    fn stop_progress(&mut self) {
        if let Some(view) = self.progress.as_mut() {
            let _ = view.stop();
        }
    }
}

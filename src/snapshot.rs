//! Snapshot input: one book state as produced by the aggregator.
//!
//! `render` reads a single JSON document; `view` reads newline-delimited
//! documents and keeps only the latest.

use std::io::{self, BufRead, Read};
use std::path::Path;

use ladder::{Level, MaxTotalSizeInfo, Side};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{OrderListError, Result};

/// Lines buffered between the stdin thread and the reader task.
const STDIN_CHANNEL_CAPACITY: usize = 64;

/// Both sides of the book, already totalled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub asks: Vec<Level>,
    #[serde(default)]
    pub bids: Vec<Level>,
    #[serde(default)]
    pub max_total_size_info: Option<MaxTotalSizeInfo>,
}

impl Snapshot {
    pub fn levels(&self, side: Side) -> &[Level] {
        match side {
            Side::Asks => &self.asks,
            Side::Bids => &self.bids,
        }
    }

    /// Supplied maxima, or maxima taken from the levels when absent.
    pub fn max_info(&self) -> MaxTotalSizeInfo {
        self.max_total_size_info
            .unwrap_or_else(|| MaxTotalSizeInfo::from_levels(&self.asks, &self.bids))
    }
}

/// `None` and `-` both mean stdin.
fn as_file(input: Option<&Path>) -> Option<&Path> {
    input.filter(|p| p.as_os_str() != "-")
}

/// Read a single snapshot document.
pub fn read_snapshot<R: Read>(mut reader: R) -> Result<Snapshot> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    if text.trim().is_empty() {
        return Err(OrderListError::EmptyInput);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Load a single snapshot from a file or stdin.
pub fn load(input: Option<&Path>) -> Result<Snapshot> {
    let snapshot = match as_file(input) {
        Some(path) => {
            debug!(path = %path.display(), "reading snapshot");
            read_snapshot(std::fs::File::open(path)?)?
        }
        None => {
            debug!("reading snapshot from stdin");
            read_snapshot(io::stdin().lock())?
        }
    };
    debug!(
        asks = snapshot.asks.len(),
        bids = snapshot.bids.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Parse one line of a snapshot stream. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Snapshot>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

/// Latest state of a snapshot stream.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    /// Most recent snapshot that parsed.
    pub snapshot: Option<Snapshot>,
    /// Snapshots accepted so far.
    pub received: u64,
    /// Last parse or read error.
    pub last_error: Option<String>,
    /// Input reached end-of-file or failed.
    pub closed: bool,
}

/// Lines of a snapshot stream.
///
/// Files are read through tokio. Stdin is read on a detached OS thread:
/// tokio's own stdin blocks runtime shutdown until the next line arrives.
pub enum LineSource {
    Async(Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>),
    Thread(mpsc::Receiver<io::Result<String>>),
}

impl LineSource {
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let reader: Box<dyn AsyncRead + Unpin + Send> = Box::new(reader);
        LineSource::Async(BufReader::new(reader).lines())
    }

    /// Read `reader` line by line on its own thread.
    ///
    /// The thread is never joined; it ends at EOF, on a read error, or when
    /// the receiving side is dropped and the next line arrives.
    pub fn from_blocking<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(STDIN_CHANNEL_CAPACITY);
        std::thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });
        LineSource::Thread(rx)
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        match self {
            LineSource::Async(lines) => lines.next_line().await,
            LineSource::Thread(rx) => rx.recv().await.transpose(),
        }
    }
}

/// Open a stream input for line reading.
pub async fn open_stream(input: Option<&Path>) -> Result<LineSource> {
    Ok(match as_file(input) {
        Some(path) => LineSource::from_reader(tokio::fs::File::open(path).await?),
        None => LineSource::from_blocking(io::BufReader::new(io::stdin())),
    })
}

/// Read newline-delimited snapshots into `tx` until EOF or cancellation.
///
/// Lines that fail to parse are skipped; the error is kept in
/// [`FeedState::last_error`].
pub async fn read_stream(
    mut lines: LineSource,
    tx: watch::Sender<FeedState>,
    cancel: CancellationToken,
) {
    let mut line_no: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            next = lines.next_line() => match next {
                Ok(Some(line)) => {
                    line_no += 1;
                    match parse_line(&line) {
                        Ok(Some(snapshot)) => {
                            tx.send_modify(|state| {
                                state.snapshot = Some(snapshot);
                                state.received += 1;
                            });
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!(line = line_no, error = %e, "skipping invalid snapshot");
                            tx.send_modify(|state| {
                                state.last_error = Some(format!("line {line_no}: {e}"));
                            });
                        }
                    }
                }
                Ok(None) => {
                    info!(lines = line_no, "snapshot stream closed");
                    tx.send_modify(|state| state.closed = true);
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "snapshot stream read failed");
                    tx.send_modify(|state| {
                        state.last_error = Some(e.to_string());
                        state.closed = true;
                    });
                    break;
                }
            }
        }
    }
}

//! Background ingestion of net-log records.
//!
//! Records are read line by line (JSON lines) from a file or stdin on a tokio
//! task and forwarded to the UI thread over a bounded channel. In follow mode
//! the reader keeps polling after end of input, like `tail -f`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::record::LogRecord;

/// How long to wait before polling a followed input again.
const FOLLOW_POLL: Duration = Duration::from_millis(250);
/// Records buffered between the reader task and the UI.
const CHANNEL_CAPACITY: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read {origin}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}:{line}: malformed log record")]
    Malformed {
        origin: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub enum ReaderEvent {
    Record(LogRecord),
    /// Input ended cleanly after the given number of lines.
    Eof { lines: usize },
    Failed(ReadError),
}

/// Where records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// `-` means stdin, anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Input::Stdin
        } else {
            Input::File(PathBuf::from(shellexpand::tilde(arg).as_ref()))
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => f.write_str("<stdin>"),
            Input::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Spawn the reader task. The receiver yields records in input order,
/// followed by exactly one `Eof` or `Failed`.
pub fn spawn(input: Input, follow: bool) -> mpsc::Receiver<ReaderEvent> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let origin = input.to_string();
        let result = match input {
            Input::Stdin => {
                read_records(BufReader::new(tokio::io::stdin()), &origin, follow, &tx).await
            }
            Input::File(path) => match tokio::fs::File::open(&path).await {
                Ok(file) => read_records(BufReader::new(file), &origin, follow, &tx).await,
                Err(source) => Err(ReadError::Io {
                    origin: origin.clone(),
                    source,
                }),
            },
        };

        let event = match result {
            Ok(lines) => {
                tracing::info!("Finished reading {} ({} lines)", origin, lines);
                ReaderEvent::Eof { lines }
            }
            Err(e) => {
                tracing::error!("Reader stopped: {:#}", e);
                ReaderEvent::Failed(e)
            }
        };
        // The UI may already be gone; nothing left to tell it then.
        tx.send(event).await.ok();
    });
    rx
}

/// Read records until end of input (or forever when following).
/// Returns the number of lines consumed.
pub async fn read_records<R>(
    mut reader: R,
    origin: &str,
    follow: bool,
    tx: &mpsc::Sender<ReaderEvent>,
) -> Result<usize, ReadError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = String::new();
    let mut line_no = 0;

    loop {
        let n = reader
            .read_line(&mut buf)
            .await
            .map_err(|source| ReadError::Io {
                origin: origin.to_string(),
                source,
            })?;

        let complete = buf.ends_with('\n');
        if n == 0 && follow && !complete {
            // Partial line (or nothing): the writer has not caught up yet.
            tokio::time::sleep(FOLLOW_POLL).await;
            continue;
        }
        if n == 0 && buf.is_empty() {
            return Ok(line_no);
        }
        if !complete && n != 0 {
            continue;
        }

        line_no += 1;
        let line = buf.trim();
        if !line.is_empty() {
            let record = LogRecord::parse_line(line).map_err(|source| ReadError::Malformed {
                origin: origin.to_string(),
                line: line_no,
                source,
            })?;
            if tx.send(ReaderEvent::Record(record)).await.is_err() {
                tracing::debug!("Record receiver dropped, stopping reader");
                return Ok(line_no);
            }
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlog::constants::LogEventType;

    async fn collect(input: &str) -> (Result<usize, ReadError>, Vec<LogRecord>) {
        let (tx, mut rx) = mpsc::channel(16);
        let result = read_records(input.as_bytes(), "test", false, &tx).await;
        drop(tx);
        let mut records = Vec::new();
        while let Some(event) = rx.recv().await {
            if let ReaderEvent::Record(record) = event {
                records.push(record);
            }
        }
        (result, records)
    }

    #[tokio::test]
    async fn test_reads_lines_and_skips_blanks() {
        let input = "{\"type\":2,\"source\":{\"id\":1,\"type\":1}}\n\n{\"type\":9,\"source\":{\"id\":1,\"type\":1}}";
        let (result, records) = collect(input).await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event_type, LogEventType::RequestAlive);
        assert_eq!(records[1].event_type, LogEventType::UrlRequestStart);
    }

    #[tokio::test]
    async fn test_malformed_line_reports_line_number() {
        let input = "{\"type\":2,\"source\":{\"id\":1,\"type\":1}}\n{\"type\":2,\"source\":{\"id\":1,\"type\":77}}\n";
        let (result, records) = collect(input).await;

        assert_eq!(records.len(), 1);
        match result {
            Err(ReadError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_input_parse() {
        assert_eq!(Input::parse("-"), Input::Stdin);
        assert_eq!(
            Input::parse("/tmp/net.json"),
            Input::File(PathBuf::from("/tmp/net.json"))
        );
        assert_eq!(Input::Stdin.to_string(), "<stdin>");
    }
}

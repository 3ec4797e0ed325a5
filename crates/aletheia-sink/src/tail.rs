//! Cooperative tail loop for audit log destinations.

use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::SinkError;

/// Time to wait in between audit log copy passes.
pub const TAIL_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Copies newly appended bytes from an audit log destination to an output
/// sink on a fixed interval.
///
/// Exactly one copy pass is in flight at a time; ticks never overlap.
/// End-of-stream on the source is not an error, the loop simply waits for
/// the next tick.
#[derive(Debug)]
pub struct FileTailer<W> {
    reader: tokio::fs::File,
    out: W,
}

impl<W: AsyncWrite + Unpin + Send> FileTailer<W> {
    /// Opens `path` for reading and prepares to tail it into `out`.
    ///
    /// On a named pipe this blocks until a writer shows up, matching the
    /// blocking-until-ready semantics of the producer side.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Open`] if the source cannot be opened.
    pub async fn open(path: &Path, out: W) -> Result<Self, SinkError> {
        let reader = tokio::fs::File::open(path)
            .await
            .map_err(|source| SinkError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(reader, out))
    }

    /// Creates a tailer over an already-open source.
    pub const fn new(reader: tokio::fs::File, out: W) -> Self {
        Self { reader, out }
    }

    /// Runs the tail loop until `token` is cancelled.
    ///
    /// Cancellation terminates the loop cleanly and returns `Ok(())`; only
    /// a genuine I/O error from the source or the output sink is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Tail`] if a copy pass fails.
    pub async fn tail(&mut self, token: &CancellationToken) -> Result<(), SinkError> {
        let mut ticker = interval(TAIL_POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = token.cancelled() => return Ok(()),
                _ = ticker.tick() => {
                    tokio::io::copy(&mut self.reader, &mut self.out).await?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    use super::*;

    /// An `AsyncWrite` handing out a view of everything written.
    #[derive(Clone, Debug, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl AsyncWrite for SharedSink {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_tail_copies_existing_and_appended_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        std::fs::write(&path, b"first\n").unwrap();

        let sink = SharedSink::default();
        let mut tailer = FileTailer::open(&path, sink.clone()).await.unwrap();

        let token = CancellationToken::new();
        let tail_token = token.clone();
        let handle = tokio::spawn(async move { tailer.tail(&tail_token).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap();
        file.write_all(b"second\n").unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        handle.await.unwrap().unwrap();
        assert_eq!(sink.contents(), b"first\nsecond\n");
    }

    #[tokio::test]
    async fn test_cancellation_terminates_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        std::fs::write(&path, b"").unwrap();

        let sink = SharedSink::default();
        let mut tailer = FileTailer::open(&path, sink).await.unwrap();

        let token = CancellationToken::new();
        token.cancel();

        tailer.tail(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_failure_propagates_as_tail_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        std::fs::write(&path, b"first\n").unwrap();

        // A write-only handle makes every copy pass fail at the read side.
        let reader = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&path)
            .await
            .unwrap();
        let mut tailer = FileTailer::new(reader, SharedSink::default());

        let err = tailer.tail(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, SinkError::Tail(_)));
    }

    #[tokio::test]
    async fn test_missing_source_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.log");

        let err = FileTailer::open(&path, SharedSink::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Open { .. }));
    }
}

//! Blocking-with-retry acquisition of audit log destinations.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::SinkError;
use crate::OWNER_GROUP_ACCESS;

/// Time to wait between attempts to open a destination that does not exist
/// yet.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a single open attempt.
enum Attempt {
    Ready(tokio::fs::File),
    NotYet,
    Fatal(std::io::Error),
}

async fn try_open(path: &Path) -> Attempt {
    // Opened with O_APPEND so that each record lands in a single atomic
    // append and concurrent producers do not interleave partial events.
    match tokio::fs::OpenOptions::new().append(true).open(path).await {
        Ok(file) => Attempt::Ready(file),
        Err(e) if e.kind() == ErrorKind::NotFound => Attempt::NotYet,
        Err(e) => Attempt::Fatal(e),
    }
}

/// Opens `path` for appending audit events, retrying until it succeeds.
///
/// A missing destination is transient: the collector that creates it may
/// simply not be up yet, so this blocks (sleeping [`RETRY_INTERVAL`]
/// between attempts) rather than letting the producer crash-loop. Any
/// other open failure is fatal and returned immediately.
///
/// Writes through the returned handle are atomic appends for records below
/// 4096 bytes.
///
/// # Errors
///
/// Returns [`SinkError::Open`] for non-transient open failures.
pub async fn acquire(path: &Path) -> Result<std::fs::File, SinkError> {
    info!(
        path = %path.display(),
        "opening audit log; this blocks until the destination is available"
    );

    loop {
        match try_open(path).await {
            Attempt::Ready(file) => {
                info!(path = %path.display(), "audit log opened");
                return Ok(file.into_std().await);
            }
            Attempt::NotYet => sleep(RETRY_INTERVAL).await,
            Attempt::Fatal(source) => {
                return Err(SinkError::Open {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

/// Like [`acquire`], but gives up as soon as `token` is cancelled.
///
/// Cancellation is checked around the open attempt and while waiting out
/// the backoff, so it is observed within one [`RETRY_INTERVAL`] of the
/// signal. An attempt abandoned mid-open closes its descriptor on drop;
/// no handle survives the cancelled or fatal paths.
///
/// # Errors
///
/// Returns [`SinkError::Cancelled`] once the token fires, or
/// [`SinkError::Open`] for non-transient open failures.
pub async fn acquire_cancellable(
    path: &Path,
    token: &CancellationToken,
) -> Result<std::fs::File, SinkError> {
    info!(
        path = %path.display(),
        "opening audit log; this blocks until the destination is available or cancellation"
    );

    loop {
        let attempt = tokio::select! {
            () = token.cancelled() => return Err(SinkError::Cancelled),
            attempt = try_open(path) => attempt,
        };

        match attempt {
            Attempt::Ready(file) => {
                info!(path = %path.display(), "audit log opened");
                return Ok(file.into_std().await);
            }
            Attempt::NotYet => {
                tokio::select! {
                    () = token.cancelled() => return Err(SinkError::Cancelled),
                    () = sleep(RETRY_INTERVAL) => {}
                }
            }
            Attempt::Fatal(source) => {
                return Err(SinkError::Open {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

/// Opens `path` for appending audit events, creating it with `0o640`
/// permissions when it does not exist.
///
/// # Errors
///
/// Returns [`SinkError::Open`] if the destination cannot be opened or
/// created.
pub fn open_or_create(path: &Path) -> Result<std::fs::File, SinkError> {
    use std::os::unix::fs::OpenOptionsExt;

    std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .mode(OWNER_GROUP_ACCESS)
        .open(path)
        .map_err(|source| SinkError::Open {
            path: path.display().to_string(),
            source,
        })
}

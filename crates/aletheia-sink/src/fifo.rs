//! Named pipe creation for audit log destinations.

use std::path::Path;

use nix::sys::stat::Mode;
use tracing::debug;

use crate::error::SinkError;
use crate::OWNER_GROUP_ACCESS;

/// Creates a named pipe at `path` with owner/group-restricted permissions.
///
/// Idempotent: a pre-existing pipe (or any pre-existing file at `path`) is
/// not an error, so an init step can run this repeatedly.
///
/// # Errors
///
/// Returns [`SinkError::CreatePipe`] if the pipe cannot be created.
pub fn create_named_pipe(path: &Path) -> Result<(), SinkError> {
    match nix::unistd::mkfifo(path, Mode::from_bits_truncate(OWNER_GROUP_ACCESS)) {
        Ok(()) => {
            debug!(path = %path.display(), "created named pipe");
            Ok(())
        }
        Err(nix::errno::Errno::EEXIST) => Ok(()),
        Err(errno) => Err(SinkError::CreatePipe {
            path: path.display().to_string(),
            source: std::io::Error::from(errno),
        }),
    }
}

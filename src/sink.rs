use std::time::SystemTime;

use crate::error::LogError;

/// Append-only destination for formatted log text.
///
/// Implementations receive fully rendered chunks (one or more lines,
/// newline-terminated) and must write each chunk in a single append so
/// that concurrent writers interleave at chunk granularity only.
pub trait LogSink: Send + Sync {
    /// Append a chunk of text at the end of the log.
    ///
    /// **Returns**
    /// - `Ok(())` once the chunk was handed to the backend.
    /// - `Err(..)` if the backend could not be written. Nothing is retried.
    fn append(&self, chunk: &str) -> Result<(), LogError>;

    /// Time of the last modification of the log, if known.
    ///
    /// `Ok(None)` means the log has never been written (for a file: it
    /// does not exist yet). The request logger uses this to decide whether
    /// a new burst of requests should be visually separated.
    ///
    /// Default implementation reports `None`.
    fn last_modified(&self) -> Result<Option<SystemTime>, LogError> {
        Ok(None)
    }
}

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use crate::error::LogError;
use crate::sink::LogSink;

/// Writes the debug log to the process' stderr.
///
/// Handy in containers where the content directory is not persisted. The
/// time of the last write is remembered so request bursts are still
/// separated.
#[derive(Debug, Default)]
pub struct StderrSink {
    last_write: Mutex<Option<SystemTime>>,
}

impl StderrSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for StderrSink {
    fn append(&self, chunk: &str) -> Result<(), LogError> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(chunk.as_bytes())?;
        stderr.flush()?;
        *self.last_write.lock().unwrap_or_else(PoisonError::into_inner) = Some(SystemTime::now());
        Ok(())
    }

    fn last_modified(&self) -> Result<Option<SystemTime>, LogError> {
        Ok(*self.last_write.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

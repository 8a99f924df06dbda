use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use crate::error::LogError;
use crate::sink::LogSink;

/// A sink that simply drops all chunks.
///
/// Useful when debug logging is configured off at deploy time but the
/// surrounding code still wants a logger to hand around.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn append(&self, _chunk: &str) -> Result<(), LogError> {
        Ok(())
    }
}

/// A sink that keeps everything in memory.
///
/// Tracks the time of the last append so the idle-gap rule behaves as it
/// would for a file.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<MemoryLog>,
}

#[derive(Debug, Default)]
struct MemoryLog {
    text: String,
    modified: Option<SystemTime>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far.
    pub fn contents(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .text
            .clone()
    }

    /// Pretend the last write happened at `at`.
    pub fn set_last_modified(&self, at: Option<SystemTime>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .modified = at;
    }
}

impl LogSink for MemorySink {
    fn append(&self, chunk: &str) -> Result<(), LogError> {
        let mut log = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        log.text.push_str(chunk);
        log.modified = Some(SystemTime::now());
        Ok(())
    }

    fn last_modified(&self) -> Result<Option<SystemTime>, LogError> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_accumulates() {
        let sink = MemorySink::new();
        assert!(sink.last_modified().unwrap().is_none());

        sink.append("a\n").unwrap();
        sink.append("b\n").unwrap();
        assert_eq!(sink.contents(), "a\nb\n");
        assert!(sink.last_modified().unwrap().is_some());
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let sink = NoopSink;
        assert!(sink.append("ignored\n").is_ok());
        assert!(sink.last_modified().unwrap().is_none());
    }
}

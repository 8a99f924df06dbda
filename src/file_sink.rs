use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;

use crate::error::LogError;
use crate::sink::LogSink;

/// File name of the debug log inside the host's content directory.
pub const LOG_FILE_NAME: &str = "debug.log";

/// Append-only text file at a fixed path.
///
/// The file is opened in append mode for every chunk and created on first
/// write; no handle is kept between writes so that rotation by an external
/// tool is picked up transparently.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink writing `debug.log` inside `content_dir`.
    pub fn in_content_dir(content_dir: impl AsRef<Path>) -> Self {
        Self::new(content_dir.as_ref().join(LOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn append(&self, chunk: &str) -> Result<(), LogError> {
        let append_err = |source| LogError::Append {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(append_err)?;
        file.write_all(chunk.as_bytes()).map_err(append_err)?;

        trace!(path = %self.path.display(), bytes = chunk.len(), "appended to debug log");
        Ok(())
    }

    fn last_modified(&self) -> Result<Option<SystemTime>, LogError> {
        match fs::metadata(&self.path) {
            Ok(meta) => meta.modified().map(Some).map_err(|source| LogError::Metadata {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LogError::Metadata {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_without_truncating() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::in_content_dir(dir.path());
        assert_eq!(sink.path(), dir.path().join("debug.log"));

        sink.append("one\n").unwrap();
        sink.append("two\n").unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn missing_file_has_no_mtime() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::in_content_dir(dir.path());
        assert!(sink.last_modified().unwrap().is_none());

        sink.append("x\n").unwrap();
        assert!(sink.last_modified().unwrap().is_some());
    }

    #[test]
    fn append_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path().join("nope/debug.log"));

        let err = sink.append("x\n").unwrap_err();
        assert!(matches!(err, LogError::Append { .. }));
        assert!(err.to_string().contains("nope"));
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use crate::file_sink::FileSink;
use crate::noop_sink::NoopSink;
use crate::sink::LogSink;

/// Supported sink kinds that can be selected via DSN or config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    File,
    Console,
    Null,
}

/// Sink configuration built from a DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Selected sink implementation.
    pub kind: BackendKind,
    /// Raw DSN that was used to construct this config.
    pub dsn: String,
}

impl BackendConfig {
    pub fn new(kind: BackendKind, dsn: impl Into<String>) -> Self {
        BackendConfig { kind, dsn: dsn.into() }
    }

    /// Target path of a `file://` DSN, `None` for other kinds or an empty path.
    pub fn file_path(&self) -> Option<PathBuf> {
        if self.kind != BackendKind::File {
            return None;
        }
        let path = strip_scheme(&self.dsn, "file://");
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

/// Parse a DSN string and infer the sink kind from its scheme.
///
/// Examples:
/// - "file:///var/www/html/wp-content/debug.log"
/// - "stderr://"
/// - "null://"
pub fn parse_dsn(dsn: &str) -> Result<BackendConfig, DsnError> {
    let lower = dsn.to_ascii_lowercase();

    if lower.starts_with("file://") {
        Ok(BackendConfig::new(BackendKind::File, dsn))
    } else if lower.starts_with("stderr://") {
        Ok(BackendConfig::new(BackendKind::Console, dsn))
    } else if lower.starts_with("null://") {
        Ok(BackendConfig::new(BackendKind::Null, dsn))
    } else {
        Err(DsnError::UnknownScheme(dsn.to_string()))
    }
}

fn strip_scheme<'a>(dsn: &'a str, scheme: &str) -> &'a str {
    // Scheme matching is case-insensitive, so cut by length.
    dsn.get(scheme.len()..).unwrap_or("")
}

/// Error type returned when parsing a DSN.
#[derive(thiserror::Error, Debug)]
pub enum DsnError {
    #[error("unknown or unsupported DSN scheme: {0}")]
    UnknownScheme(String),
}

/// Error type returned when building a sink from configuration.
#[derive(thiserror::Error, Debug)]
pub enum BackendBuildError {
    #[error("console feature is not enabled")]
    ConsoleFeatureDisabled,

    #[error("file DSN has no path: {0}")]
    MissingPath(String),
}

/// Create a concrete `LogSink` implementation from a `BackendConfig`.
///
/// This is the entry point for hosts that select the log destination
/// with a single DSN string instead of constructing sinks manually.
pub fn make_sink_from_config(cfg: &BackendConfig) -> Result<Arc<dyn LogSink>, BackendBuildError> {
    match cfg.kind {
        BackendKind::File => {
            let path = cfg
                .file_path()
                .ok_or_else(|| BackendBuildError::MissingPath(cfg.dsn.clone()))?;
            Ok(Arc::new(FileSink::new(path)) as Arc<dyn LogSink>)
        }
        BackendKind::Console => {
            #[cfg(feature = "console")]
            {
                use crate::console::StderrSink;

                Ok(Arc::new(StderrSink::new()) as Arc<dyn LogSink>)
            }

            #[cfg(not(feature = "console"))]
            {
                Err(BackendBuildError::ConsoleFeatureDisabled)
            }
        }
        BackendKind::Null => Ok(Arc::new(NoopSink) as Arc<dyn LogSink>),
    }
}

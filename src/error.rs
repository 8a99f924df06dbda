use std::io;
use std::path::PathBuf;

use crate::backend::{BackendBuildError, DsnError};

/// Error type returned by sinks and by the request logger.
///
/// Missing request fields never produce an error; only the sink I/O and
/// the configuration path can fail.
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("failed to append to {}: {source}", .path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read metadata of {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Dsn(#[from] DsnError),

    #[error(transparent)]
    Backend(#[from] BackendBuildError),
}

//! Request-scoped debug log.
//!
//! Every request writes one summary of its method, path, headers and
//! cache signals to a shared append-only `debug.log`, followed by any
//! number of debug lines that may carry a bounded call trace. A log left
//! idle for more than two seconds gets blank lines before the next
//! request so bursts stay apart.

pub mod record;
pub mod sink;
pub mod layer;

#[cfg(feature = "console")]
pub mod console;

pub mod backend;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod file_sink;
pub mod init;
pub mod logger;
pub mod noop_sink;
pub mod trace;

pub use config::{LogOptions, LoggerConfig};
pub use context::RequestContext;
pub use error::LogError;
pub use logger::{DebugLog, RequestLogger};
pub use trace::{CallOp, TraceFrame};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::Local;
use tracing::debug;

use crate::backend::{make_sink_from_config, parse_dsn};
use crate::config::{LogOptions, LoggerConfig};
use crate::context::RequestContext;
use crate::error::LogError;
use crate::file_sink::FileSink;
use crate::record::{EntryHeader, LogEntry, SiteTag};
use crate::sink::LogSink;
use crate::trace::{render_trace, CallStack, FrameGuard, FrameSource, TraceFrame};

/// A log untouched for longer than this starts a new burst.
pub const IDLE_GAP: Duration = Duration::from_secs(2);

/// Written before the summary of a request that starts a new burst.
pub const BURST_SEPARATOR: &str = "\n\n\n\n";

/// Process-wide debug log state.
///
/// Owns the sink (fixed for the lifetime of the value), the site tag, the
/// summary options and the runtime `enabled` toggle. Share it as
/// `Arc<DebugLog>` and create one [`RequestLogger`] per request with
/// [`DebugLog::request`].
pub struct DebugLog {
    sink: Arc<dyn LogSink>,
    site_tag: SiteTag,
    options: LogOptions,
    enabled: AtomicBool,
}

impl DebugLog {
    /// Create a disabled log writing to `sink`.
    pub fn new(sink: Arc<dyn LogSink>, site_tag: SiteTag, options: LogOptions) -> Self {
        Self {
            sink,
            site_tag,
            options,
            enabled: AtomicBool::new(false),
        }
    }

    /// Resolve the sink and site tag from a [`LoggerConfig`].
    ///
    /// Uses `sink_dsn` when set, otherwise a [`FileSink`] at
    /// `content_dir/debug.log`. The `enabled` toggle starts at
    /// `config.debug`.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, LogError> {
        let path = config.log_path();
        let sink: Arc<dyn LogSink> = match &config.sink_dsn {
            Some(dsn) => make_sink_from_config(&parse_dsn(dsn)?)?,
            None => Arc::new(FileSink::new(path.clone())),
        };
        let site_tag = config.site_tag();

        debug!(
            site_tag = %site_tag,
            dsn = config.sink_dsn.as_deref().unwrap_or("file"),
            path = %path.display(),
            enabled = config.debug,
            "debug log configured"
        );

        let log = Self::new(sink, site_tag, config.options);
        log.enabled.store(config.debug, Ordering::Relaxed);
        Ok(log)
    }

    /// Turn `debug()` calls on for every request logger of this log.
    pub fn set_enabled(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn site_tag(&self) -> &SiteTag {
        &self.site_tag
    }

    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    /// Start logging for one request.
    pub fn request(self: &Arc<Self>, context: RequestContext) -> RequestLogger {
        let stack = CallStack::new();
        RequestLogger {
            log: Arc::clone(self),
            context,
            initialized: AtomicBool::new(false),
            frames: Arc::new(stack.clone()),
            stack,
        }
    }

    /// Whether the next request starts a new burst. A log whose
    /// modification time cannot be read counts as idle.
    fn separator_due(&self) -> bool {
        let modified = match self.sink.last_modified() {
            Ok(Some(modified)) => modified,
            Ok(None) => return true,
            Err(e) => {
                debug!(error = %e, "debug log mtime unavailable, treating as idle");
                return true;
            }
        };
        // A modification time in the future means the log is busy.
        SystemTime::now()
            .duration_since(modified)
            .map(|idle| idle > IDLE_GAP)
            .unwrap_or(false)
    }
}

/// Debug logger bound to one request.
///
/// The request summary is written once, either by an explicit
/// [`RequestLogger::init_request`] at request start or lazily by the first
/// [`RequestLogger::push`].
pub struct RequestLogger {
    log: Arc<DebugLog>,
    context: RequestContext,
    initialized: AtomicBool,
    stack: CallStack,
    frames: Arc<dyn FrameSource>,
}

impl RequestLogger {
    /// Take trace frames from `source` instead of this request's
    /// [`CallStack`].
    pub fn with_frame_source(mut self, source: Arc<dyn FrameSource>) -> Self {
        self.frames = source;
        self
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn debug_log(&self) -> &Arc<DebugLog> {
        &self.log
    }

    /// True once the request summary has been written (or attempted).
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self) {
        self.log.set_enabled();
    }

    pub fn enabled(&self) -> bool {
        self.log.enabled()
    }

    /// Record a call frame for trace annotation while the guard lives.
    pub fn enter(&self, frame: TraceFrame) -> FrameGuard {
        self.stack.enter(frame)
    }

    /// Write the request summary. Runs at most once; later calls return
    /// `Ok(())` without writing. A failed append is returned but still
    /// counts as the one attempt.
    ///
    /// The summary is preceded by [`BURST_SEPARATOR`] when the log was
    /// idle for more than [`IDLE_GAP`] or has never been written.
    pub fn init_request(&self) -> Result<(), LogError> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let header = self.header();
        let mut chunk = String::new();
        if self.log.separator_due() {
            debug!("debug log idle, separating request burst");
            chunk.push_str(BURST_SEPARATOR);
        }
        for line in self.context.summary(&self.log.options) {
            chunk.push_str(&LogEntry::new(header.clone(), line).to_string());
        }

        self.log.sink.append(&chunk)
    }

    /// Log `message` if the log is enabled; a silent no-op otherwise.
    ///
    /// With `trace_depth`, up to that many caller frames are appended
    /// below the message.
    pub fn debug(&self, message: &str, trace_depth: Option<usize>) -> Result<(), LogError> {
        if !self.enabled() {
            return Ok(());
        }
        self.push(message, trace_depth)
    }

    /// Log `message` regardless of the `enabled` toggle, writing the
    /// request summary first if that has not happened yet.
    pub fn push(&self, message: &str, trace_depth: Option<usize>) -> Result<(), LogError> {
        if !self.is_initialized() {
            self.init_request()?;
        }

        let entry = LogEntry::new(self.header(), message);
        let mut chunk = entry.to_string();
        if let Some(depth) = trace_depth {
            let indent = entry.header.to_string().len() + 3;
            chunk.push_str(&render_trace(&self.frames.capture(depth), depth, indent));
        }

        self.log.sink.append(&chunk)
    }

    fn header(&self) -> EntryHeader {
        EntryHeader::new(
            Local::now(),
            self.context.remote_addr.as_str(),
            self.context.remote_port.as_str(),
            self.log.site_tag.clone(),
        )
    }
}

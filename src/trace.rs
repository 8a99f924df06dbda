//! Call-context frames used to annotate a log line with its callers.
//!
//! Frames are supplied by the calling code, either by entering them on a
//! [`CallStack`] while a unit of work runs or by providing any other
//! [`FrameSource`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Owner name of frames that belong to the logger itself. Such frames are
/// never rendered.
pub const LOGGER_OWNER: &str = "RequestLogger";

/// How a function was reached from its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOp {
    /// Associated function, rendered `::`.
    Static,
    /// Method on an instance, rendered `->`.
    Instance,
}

impl fmt::Display for CallOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallOp::Static => "::",
            CallOp::Instance => "->",
        })
    }
}

/// One frame of call context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
    /// Type or component owning the function; `None` for free functions.
    pub owner: Option<String>,
    pub call_op: CallOp,
    pub function: String,
    /// Line inside `function` where the next inner call was made.
    pub line: Option<u32>,
}

impl TraceFrame {
    pub fn method(owner: impl Into<String>, call_op: CallOp, function: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            call_op,
            function: function.into(),
            line: None,
        }
    }

    /// A frame without owner. Trace rendering stops at such a frame.
    pub fn free(function: impl Into<String>) -> Self {
        Self {
            owner: None,
            call_op: CallOp::Static,
            function: function.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    fn belongs_to_logger(&self) -> bool {
        self.owner.as_deref() == Some(LOGGER_OWNER)
    }
}

/// Source of call-context frames.
pub trait FrameSource: Send + Sync {
    /// Up to `limit` frames, innermost first.
    fn capture(&self, limit: usize) -> Vec<TraceFrame>;
}

/// A fixed list of frames, innermost first.
impl FrameSource for Vec<TraceFrame> {
    fn capture(&self, limit: usize) -> Vec<TraceFrame> {
        self.iter().take(limit).cloned().collect()
    }
}

/// Call stack maintained by the calling code.
///
/// Cloning yields another handle to the same stack.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Arc<Mutex<Vec<TraceFrame>>>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `frame`; it is popped again when the returned guard drops.
    pub fn enter(&self, frame: TraceFrame) -> FrameGuard {
        let mut frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        frames.push(frame);
        FrameGuard {
            stack: self.clone(),
            depth: frames.len(),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl FrameSource for CallStack {
    fn capture(&self, limit: usize) -> Vec<TraceFrame> {
        let frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        frames.iter().rev().take(limit).cloned().collect()
    }
}

/// Keeps a frame on its [`CallStack`] for as long as it lives.
#[must_use = "the frame is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FrameGuard {
    stack: CallStack,
    depth: usize,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        let mut frames = self.stack.frames.lock().unwrap_or_else(PoisonError::into_inner);
        // Guards dropped out of order also drop the frames above them.
        frames.truncate(self.depth.saturating_sub(1));
    }
}

/// Render trace lines for `frames` (innermost first).
///
/// Each line is `indent` spaces followed by
/// `- <owner><op><function>()` and, when known, ` @ <line>`. Walking stops
/// at the first owner-less frame; logger frames are skipped; at most
/// `depth` lines are produced.
pub fn render_trace(frames: &[TraceFrame], depth: usize, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::new();

    for frame in frames
        .iter()
        .take_while(|f| f.owner.is_some())
        .filter(|f| !f.belongs_to_logger())
        .take(depth)
    {
        let owner = frame.owner.as_deref().unwrap_or_default();
        out.push_str(&format!("{pad}- {owner}{}{}()", frame.call_op, frame.function));
        if let Some(line) = frame.line {
            out.push_str(&format!(" @ {line}"));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames() -> Vec<TraceFrame> {
        vec![
            TraceFrame::method(LOGGER_OWNER, CallOp::Instance, "push").at_line(10),
            TraceFrame::method("PurgeQueue", CallOp::Instance, "flush").at_line(88),
            TraceFrame::method("Router", CallOp::Static, "dispatch").at_line(412),
            TraceFrame::method("Plugin", CallOp::Instance, "boot"),
            TraceFrame::free("main"),
            TraceFrame::method("Never", CallOp::Static, "reached"),
        ]
    }

    #[test]
    fn renders_operators_and_lines() {
        let out = render_trace(&frames(), 10, 2);
        assert_eq!(
            out,
            "  - PurgeQueue->flush() @ 88\n  - Router::dispatch() @ 412\n  - Plugin->boot()\n"
        );
    }

    #[test]
    fn depth_bounds_lines() {
        let out = render_trace(&frames(), 1, 0);
        assert_eq!(out, "- PurgeQueue->flush() @ 88\n");
        assert_eq!(render_trace(&frames(), 0, 0), "");
    }

    #[test]
    fn stops_at_free_function() {
        let out = render_trace(&frames(), 100, 0);
        assert!(!out.contains("main"));
        assert!(!out.contains("Never"));
        assert!(!out.contains(LOGGER_OWNER));
    }

    #[test]
    fn call_stack_captures_innermost_first() {
        let stack = CallStack::new();
        let _outer = stack.enter(TraceFrame::method("Router", CallOp::Static, "dispatch"));
        {
            let _inner = stack.enter(TraceFrame::method("PurgeQueue", CallOp::Instance, "flush"));
            let captured = stack.capture(5);
            assert_eq!(captured.len(), 2);
            assert_eq!(captured[0].function, "flush");
            assert_eq!(captured[1].function, "dispatch");
            assert_eq!(stack.capture(1).len(), 1);
        }
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn out_of_order_drop_unwinds_above() {
        let stack = CallStack::new();
        let outer = stack.enter(TraceFrame::method("A", CallOp::Static, "a"));
        let _inner = stack.enter(TraceFrame::method("B", CallOp::Static, "b"));
        drop(outer);
        assert_eq!(stack.depth(), 0);
    }
}

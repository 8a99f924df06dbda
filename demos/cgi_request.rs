use std::sync::Arc;

use request_debug_log::{CallOp, DebugLog, LoggerConfig, RequestContext, TraceFrame};

/// Behaves like a CGI handler: configuration and request come from the
/// environment, e.g.
///
/// ```sh
/// DEBUG_LOG_CONTENT_DIR=/tmp DEBUG_LOG_ENABLED=1 \
/// REMOTE_ADDR=127.0.0.1 REQUEST_METHOD=GET REQUEST_URI=/?p=1 \
///   cargo run --example cgi_request
/// ```
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoggerConfig::from_env();
    let log = Arc::new(DebugLog::from_config(&config)?);

    let request = log.request(RequestContext::from_env());
    request.init_request()?;

    let _handler = request.enter(TraceFrame::method("PageCache", CallOp::Instance, "serve").at_line(27));
    let _purge = request.enter(TraceFrame::method("PurgeQueue", CallOp::Static, "add").at_line(112));
    request.debug("purge queued for post 12", Some(2))?;
    request.push("response sent", None)?;

    println!("wrote request log to {}", config.log_path().display());
    Ok(())
}

use std::sync::Arc;

use request_debug_log::init::{init_tracing_with_config, LayerConfig};
use request_debug_log::noop_sink::MemorySink;
use request_debug_log::record::SiteTag;
use request_debug_log::{DebugLog, LogOptions, RequestContext};
use tracing::{error, info, Level};

/// Routes ordinary `tracing` events of a background worker into the
/// debug log and prints what was written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(MemorySink::new());
    let log = Arc::new(DebugLog::new(sink.clone(), SiteTag::new("cron"), LogOptions::default()));
    log.set_enabled();

    let worker = Arc::new(log.request(RequestContext {
        method: "CLI".to_string(),
        uri: "/wp-cron.php".to_string(),
        ..Default::default()
    }));

    let layer_config = LayerConfig {
        min_level: Level::INFO,
        enable_stdout: false,
    };
    init_tracing_with_config(worker, layer_config)?;

    info!(job = "crawler", "cron job started");
    error!(job = "crawler", status = 503u64, "sitemap fetch failed");

    print!("{}", sink.contents());
    Ok(())
}

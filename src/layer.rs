use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::logger::RequestLogger;

/// Target prefix of events emitted by this crate. They are never
/// forwarded, otherwise every append would log about itself.
const OWN_TARGET: &str = "request_debug_log";

/// `tracing_subscriber` layer that turns `tracing` events into debug log
/// lines of one [`RequestLogger`].
///
/// Events at `min_level` or more severe are rendered as
/// `"<LEVEL> <target>: <message> key=value ..."` and passed to
/// [`RequestLogger::debug`], so nothing is written while the log is
/// disabled. Suited to process-per-request hosts and to background workers
/// that own a single logger.
pub struct DebugLogLayer {
    logger: Arc<RequestLogger>,
    min_level: Level,
    /// Events handed to the logger.
    pub forwarded_events: Arc<AtomicU64>,
    /// Events the logger failed to write.
    pub failed_events: Arc<AtomicU64>,
}

impl DebugLogLayer {
    pub fn new(logger: Arc<RequestLogger>, min_level: Level) -> Self {
        Self {
            logger,
            min_level,
            forwarded_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<S> Layer<S> for DebugLogLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.min_level || meta.target().starts_with(OWN_TARGET) {
            return;
        }

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut line = format!(
            "{} {}: {}",
            meta.level(),
            meta.target(),
            message.unwrap_or_default()
        );
        for (key, value) in &fields {
            match value {
                serde_json::Value::String(s) => line.push_str(&format!(" {key}={s}")),
                other => line.push_str(&format!(" {key}={other}")),
            }
        }

        self.forwarded_events.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.logger.debug(&line, None) {
            self.failed_events.fetch_add(1, Ordering::Relaxed);
            eprintln!("debug log write failed: {}", e);
        }
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, serde_json::Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
        }
    }
}

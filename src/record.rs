use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Prefix of site tags derived from a numeric site id.
pub const SITE_TAG_PREFIX: &str = "LSCACHE_WP_blogid_";

/// Identifier distinguishing log lines by site in a multi-site deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteTag(String);

impl SiteTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn for_site(site_id: u64) -> Self {
        Self(format!("{SITE_TAG_PREFIX}{site_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SiteTag {
    fn default() -> Self {
        Self::for_site(1)
    }
}

impl fmt::Display for SiteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared prefix of every line written for one call.
///
/// Renders as `"<RFC 2822 timestamp> [<addr>:<port>] [<site-tag>] "`,
/// trailing space included.
#[derive(Debug, Clone)]
pub struct EntryHeader {
    pub timestamp: DateTime<Local>,
    pub remote_addr: String,
    pub remote_port: String,
    pub site_tag: SiteTag,
}

impl EntryHeader {
    pub fn new(
        timestamp: DateTime<Local>,
        remote_addr: impl Into<String>,
        remote_port: impl Into<String>,
        site_tag: SiteTag,
    ) -> Self {
        Self {
            timestamp,
            remote_addr: remote_addr.into(),
            remote_port: remote_port.into(),
            site_tag,
        }
    }
}

impl fmt::Display for EntryHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}:{}] [{}] ",
            self.timestamp.to_rfc2822(),
            self.remote_addr,
            self.remote_port,
            self.site_tag
        )
    }
}

/// One formatted log line: header plus message body.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub header: EntryHeader,
    pub message: String,
}

impl LogEntry {
    pub fn new(header: EntryHeader, message: impl Into<String>) -> Self {
        Self {
            header,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{}", self.header, self.message)
    }
}

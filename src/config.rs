use std::path::PathBuf;

use serde::Deserialize;

use crate::env::{self, env_flag, env_or};
use crate::file_sink::LOG_FILE_NAME;
use crate::record::SiteTag;

/// Options that change what the request summary contains.
///
/// **Fields**
/// - `collapse_query_string`: cut query strings longer than 53
///   characters and mark the cut with `...`.
/// - `log_cookies`: include the request cookie header in the summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub collapse_query_string: bool,
    pub log_cookies: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            collapse_query_string: true,
            log_cookies: false,
        }
    }
}

/// Logger configuration as handed over by the host.
///
/// **Fields**
/// - `content_dir`: directory that receives `debug.log`.
/// - `site_id`: numeric site id, turned into the site tag.
/// - `site_tag`: explicit site tag; wins over `site_id`.
/// - `debug`: initial state of the `enabled` toggle.
/// - `sink_dsn`: optional DSN replacing the file sink, see
///   [`crate::backend::parse_dsn`].
/// - `options`: [`LogOptions`], flattened into the same table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub content_dir: PathBuf,
    pub site_id: u64,
    pub site_tag: Option<String>,
    pub debug: bool,
    pub sink_dsn: Option<String>,
    #[serde(flatten)]
    pub options: LogOptions,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("."),
            site_id: 1,
            site_tag: None,
            debug: false,
            sink_dsn: None,
            options: LogOptions::default(),
        }
    }
}

impl LoggerConfig {
    /// Load configuration from `DEBUG_LOG_*` environment variables,
    /// falling back to [`LoggerConfig::default`] for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| Some(env_or(key, "")).filter(|v| !v.is_empty());

        Self {
            content_dir: non_empty(env::DEBUG_LOG_CONTENT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.content_dir),
            site_id: non_empty(env::DEBUG_LOG_SITE_ID_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.site_id),
            site_tag: non_empty(env::DEBUG_LOG_SITE_TAG_ENV),
            debug: env_flag(env::DEBUG_LOG_ENABLED_ENV, defaults.debug),
            sink_dsn: non_empty(env::DEBUG_LOG_DSN_ENV),
            options: LogOptions {
                collapse_query_string: env_flag(
                    env::DEBUG_LOG_COLLAPSE_QS_ENV,
                    defaults.options.collapse_query_string,
                ),
                log_cookies: env_flag(env::DEBUG_LOG_COOKIES_ENV, defaults.options.log_cookies),
            },
        }
    }

    /// Path of the log file inside the content directory.
    pub fn log_path(&self) -> PathBuf {
        self.content_dir.join(LOG_FILE_NAME)
    }

    pub fn site_tag(&self) -> SiteTag {
        match &self.site_tag {
            Some(tag) => SiteTag::new(tag.clone()),
            None => SiteTag::for_site(self.site_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LoggerConfig::default();
        assert_eq!(cfg.log_path(), PathBuf::from("./debug.log"));
        assert_eq!(cfg.site_tag().as_str(), "LSCACHE_WP_blogid_1");
        assert!(!cfg.debug);
        assert!(cfg.options.collapse_query_string);
        assert!(!cfg.options.log_cookies);
    }

    #[test]
    fn deserializes_flat_options() {
        let cfg: LoggerConfig = serde_json::from_str(
            r#"{
                "content_dir": "/var/www/html/wp-content",
                "site_id": 4,
                "debug": true,
                "log_cookies": true
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.log_path(), PathBuf::from("/var/www/html/wp-content/debug.log"));
        assert_eq!(cfg.site_tag().as_str(), "LSCACHE_WP_blogid_4");
        assert!(cfg.debug);
        assert!(cfg.options.log_cookies);
        assert!(cfg.options.collapse_query_string);
    }

    #[test]
    fn explicit_site_tag_wins() {
        let cfg = LoggerConfig {
            site_id: 9,
            site_tag: Some("shop".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.site_tag(), SiteTag::new("shop"));
    }
}

//! Ambient request data read by the logger.
//!
//! The logger never mutates a [`RequestContext`]; it only reads it to
//! build the line prefix and the request summary written at request start.

use serde::Deserialize;

use crate::config::LogOptions;
use crate::env;

/// Query strings longer than this are collapsed when
/// [`LogOptions::collapse_query_string`] is on.
pub const QUERY_STRING_KEEP: usize = 53;

/// Request fields supplied by the web server.
///
/// Every field defaults to the empty string; absent values are never an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub remote_addr: String,
    pub remote_port: String,
    pub method: String,
    pub protocol: String,
    /// Request URI, query part included.
    pub uri: String,
    pub query_string: String,
    pub user_agent: String,
    pub accept_encoding: String,
    pub cookie: String,
    /// Cache server signal that the response is cacheable.
    pub cache_signal: String,
    pub vary_cookie: String,
    pub vary_value: String,
}

impl RequestContext {
    /// Build a context from CGI-style variables looked up through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            remote_addr: get(env::REMOTE_ADDR),
            remote_port: get(env::REMOTE_PORT),
            method: get(env::REQUEST_METHOD),
            protocol: get(env::SERVER_PROTOCOL),
            uri: get(env::REQUEST_URI),
            query_string: get(env::QUERY_STRING),
            user_agent: get(env::HTTP_USER_AGENT),
            accept_encoding: get(env::HTTP_ACCEPT_ENCODING),
            cookie: get(env::HTTP_COOKIE),
            cache_signal: get(env::X_LSCACHE),
            vary_cookie: get(env::LSCACHE_VARY_COOKIE),
            vary_value: get(env::LSCACHE_VARY_VALUE),
        }
    }

    /// Build a context from the process environment (CGI).
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Request path: the URI up to the first `?`.
    pub fn path(&self) -> &str {
        self.uri.split('?').next().unwrap_or_default()
    }

    /// Whether the cache server flagged the response as cacheable.
    pub fn cache_hit(&self) -> bool {
        is_truthy(&self.cache_signal)
    }

    /// Lines of the request summary, without prefix or newline.
    pub fn summary(&self, options: &LogOptions) -> Vec<String> {
        let mut lines = vec![format!("{} {} {}", self.method, self.protocol, self.path())];

        let qs = if options.collapse_query_string {
            collapse(&self.query_string, QUERY_STRING_KEEP)
        } else {
            self.query_string.clone()
        };
        lines.push(format!("Query String: {qs}"));
        lines.push(format!("User Agent: {}", self.user_agent));
        lines.push(format!("Accept Encoding: {}", self.accept_encoding));
        if options.log_cookies && !self.cookie.is_empty() {
            lines.push(format!("Cookie: {}", self.cookie));
        }
        lines.push(format!("X-LSCACHE: {}", self.cache_hit()));
        if is_truthy(&self.vary_cookie) {
            lines.push(format!("LSCACHE_VARY_COOKIE: {}", self.vary_cookie));
        }
        if is_truthy(&self.vary_value) {
            lines.push(format!("LSCACHE_VARY_VALUE: {}", self.vary_value));
        }

        lines
    }
}

/// Host truthiness: empty and `"0"` are false.
pub(crate) fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

fn collapse(value: &str, keep: usize) -> String {
    match value.char_indices().nth(keep) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ctx() -> RequestContext {
        RequestContext {
            remote_addr: "198.51.100.4".to_string(),
            remote_port: "40112".to_string(),
            method: "GET".to_string(),
            protocol: "HTTP/1.1".to_string(),
            uri: "/shop/?add-to-cart=12".to_string(),
            query_string: "add-to-cart=12".to_string(),
            user_agent: "curl/8.5.0".to_string(),
            accept_encoding: "gzip".to_string(),
            ..Default::default()
        }
    }

    fn collapsing() -> LogOptions {
        LogOptions {
            collapse_query_string: true,
            log_cookies: false,
        }
    }

    #[test]
    fn summary_basic_lines() {
        let lines = ctx().summary(&collapsing());
        assert_eq!(
            lines,
            vec![
                "GET HTTP/1.1 /shop/",
                "Query String: add-to-cart=12",
                "User Agent: curl/8.5.0",
                "Accept Encoding: gzip",
                "X-LSCACHE: false",
            ]
        );
    }

    #[test]
    fn long_query_string_is_collapsed() {
        let qs = "a".repeat(60);
        let c = RequestContext {
            query_string: qs.clone(),
            ..ctx()
        };

        let lines = c.summary(&collapsing());
        assert_eq!(lines[1], format!("Query String: {}...", "a".repeat(53)));

        let keep = LogOptions {
            collapse_query_string: false,
            ..collapsing()
        };
        assert_eq!(c.summary(&keep)[1], format!("Query String: {qs}"));
    }

    #[test]
    fn query_string_at_limit_is_untouched() {
        let qs = "b".repeat(53);
        let c = RequestContext {
            query_string: qs.clone(),
            ..ctx()
        };
        assert_eq!(c.summary(&collapsing())[1], format!("Query String: {qs}"));
    }

    #[test]
    fn collapse_respects_char_boundaries() {
        let qs = "é".repeat(60);
        let collapsed = collapse(&qs, 53);
        assert_eq!(collapsed.chars().count(), 56);
        assert!(collapsed.ends_with("é..."));
    }

    #[test]
    fn cookie_line_needs_flag_and_value() {
        let with_cookie = RequestContext {
            cookie: "wordpress_logged_in=abc".to_string(),
            ..ctx()
        };
        let log_cookies = LogOptions {
            log_cookies: true,
            ..collapsing()
        };

        assert!(with_cookie
            .summary(&log_cookies)
            .contains(&"Cookie: wordpress_logged_in=abc".to_string()));
        assert!(!with_cookie
            .summary(&collapsing())
            .iter()
            .any(|l| l.starts_with("Cookie:")));
        assert!(!ctx()
            .summary(&log_cookies)
            .iter()
            .any(|l| l.starts_with("Cookie:")));
    }

    #[test]
    fn vary_fields_only_when_truthy() {
        let varied = RequestContext {
            cache_signal: "on".to_string(),
            vary_cookie: "_lscache_vary".to_string(),
            vary_value: "guest".to_string(),
            ..ctx()
        };
        let lines = varied.summary(&collapsing());
        assert!(lines.contains(&"X-LSCACHE: true".to_string()));
        assert!(lines.contains(&"LSCACHE_VARY_COOKIE: _lscache_vary".to_string()));
        assert!(lines.contains(&"LSCACHE_VARY_VALUE: guest".to_string()));

        let zeroed = RequestContext {
            cache_signal: "0".to_string(),
            vary_cookie: "0".to_string(),
            ..ctx()
        };
        let lines = zeroed.summary(&collapsing());
        assert!(lines.contains(&"X-LSCACHE: false".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("LSCACHE_VARY")));
    }

    #[test]
    fn from_vars_defaults_missing_fields() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("REMOTE_ADDR", "10.0.0.1"),
            ("REQUEST_METHOD", "POST"),
            ("REQUEST_URI", "/wp-admin/admin-ajax.php"),
            ("X-LSCACHE", "1"),
        ]);
        let c = RequestContext::from_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(c.remote_addr, "10.0.0.1");
        assert_eq!(c.remote_port, "");
        assert_eq!(c.method, "POST");
        assert_eq!(c.path(), "/wp-admin/admin-ajax.php");
        assert!(c.cache_hit());
        assert_eq!(c.user_agent, "");
    }

    #[test]
    fn deserializes_partial_json() {
        let c: RequestContext =
            serde_json::from_str(r#"{"remote_addr":"::1","uri":"/?p=1"}"#).unwrap();
        assert_eq!(c.remote_addr, "::1");
        assert_eq!(c.path(), "/");
        assert_eq!(c.method, "");
    }
}

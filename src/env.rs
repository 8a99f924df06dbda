/// Environment variable names read by this crate.
///
/// Two groups live here: the CGI-style request variables a web server
/// exports for every request, and the variables used to configure the
/// logger itself. These are purely helpers; the core types remain
/// decoupled from environment access.

/// Client address.
pub const REMOTE_ADDR: &str = "REMOTE_ADDR";
/// Client port.
pub const REMOTE_PORT: &str = "REMOTE_PORT";
pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
/// Full request URI including the query part.
pub const REQUEST_URI: &str = "REQUEST_URI";
pub const QUERY_STRING: &str = "QUERY_STRING";
pub const HTTP_USER_AGENT: &str = "HTTP_USER_AGENT";
pub const HTTP_ACCEPT_ENCODING: &str = "HTTP_ACCEPT_ENCODING";
pub const HTTP_COOKIE: &str = "HTTP_COOKIE";
/// Set by the cache server when the response may be cached.
pub const X_LSCACHE: &str = "X-LSCACHE";
/// Cookie that made the cached copy vary.
pub const LSCACHE_VARY_COOKIE: &str = "LSCACHE_VARY_COOKIE";
/// Value that made the cached copy vary.
pub const LSCACHE_VARY_VALUE: &str = "LSCACHE_VARY_VALUE";

/// Directory holding `debug.log`.
pub const DEBUG_LOG_CONTENT_DIR_ENV: &str = "DEBUG_LOG_CONTENT_DIR";

/// Numeric site id used to build the site tag.
pub const DEBUG_LOG_SITE_ID_ENV: &str = "DEBUG_LOG_SITE_ID";

/// Explicit site tag, overrides the one derived from the site id.
pub const DEBUG_LOG_SITE_TAG_ENV: &str = "DEBUG_LOG_SITE_TAG";

/// Turns `debug()` on at startup.
pub const DEBUG_LOG_ENABLED_ENV: &str = "DEBUG_LOG_ENABLED";

/// Optional sink DSN (`file://…`, `stderr://`, `null://`).
pub const DEBUG_LOG_DSN_ENV: &str = "DEBUG_LOG_DSN";

/// Collapse long query strings in the request summary.
pub const DEBUG_LOG_COLLAPSE_QS_ENV: &str = "DEBUG_LOG_COLLAPSE_QS";

/// Log the request cookie header.
pub const DEBUG_LOG_COOKIES_ENV: &str = "DEBUG_LOG_COOKIES";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag; unset or unparsable values yield `default`.
pub fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_common_spellings() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn unset_flag_uses_default() {
        assert!(env_flag("DEBUG_LOG_TEST_SURELY_UNSET_FLAG", true));
        assert_eq!(env_or("DEBUG_LOG_TEST_SURELY_UNSET_VALUE", "fallback"), "fallback");
    }
}

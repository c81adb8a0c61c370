use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Methods a browser refuses to send cross-origin, lowercased.
static FORBIDDEN_METHODS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["connect", "trace", "track"]));

/// Request-header names a browser never lets scripts set, lowercased.
/// `proxy-` and `sec-` prefixed names are forbidden as well; see
/// [`is_forbidden_request_header`].
static FORBIDDEN_REQUEST_HEADERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "accept-charset",
        "accept-encoding",
        "access-control-request-headers",
        "access-control-request-method",
        "connection",
        "content-length",
        "cookie",
        "cookie2",
        "date",
        "dnt",
        "expect",
        "host",
        "keep-alive",
        "origin",
        "referer",
        "te",
        "trailer",
        "transfer-encoding",
        "upgrade",
        "via",
    ])
});

/// Response-header names scripts can never read, lowercased.
static FORBIDDEN_RESPONSE_HEADERS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["set-cookie", "set-cookie2"]));

/// Response-header names always readable by scripts; exposing them is a no-op.
static SAFELISTED_RESPONSE_HEADERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "cache-control",
        "content-language",
        "content-length",
        "content-type",
        "expires",
        "last-modified",
        "pragma",
    ])
});

/// The CORS protocol's own request headers, lowercased. Allowing them via
/// `Access-Control-Allow-Headers` is never sensible.
static PROHIBITED_REQUEST_HEADERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "origin",
        "access-control-request-method",
        "access-control-request-headers",
        "access-control-request-private-network",
    ])
});

/// The CORS protocol's own response headers, lowercased. Exposing them via
/// `Access-Control-Expose-Headers` is never sensible.
static PROHIBITED_RESPONSE_HEADERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "access-control-allow-origin",
        "access-control-allow-methods",
        "access-control-allow-headers",
        "access-control-allow-credentials",
        "access-control-allow-private-network",
        "access-control-expose-headers",
        "access-control-max-age",
    ])
});

pub(crate) fn is_forbidden_method(method: &str) -> bool {
    FORBIDDEN_METHODS.contains(method.to_ascii_lowercase().as_str())
}

/// Safelisted methods are exempt from `Access-Control-Allow-Methods` gating.
pub(crate) fn is_safelisted_method(method: &str) -> bool {
    matches!(method, "GET" | "HEAD" | "POST")
}

pub(crate) fn is_forbidden_request_header(name_lower: &str) -> bool {
    FORBIDDEN_REQUEST_HEADERS.contains(name_lower)
        || name_lower.starts_with("proxy-")
        || name_lower.starts_with("sec-")
}

pub(crate) fn is_forbidden_response_header(name_lower: &str) -> bool {
    FORBIDDEN_RESPONSE_HEADERS.contains(name_lower)
}

pub(crate) fn is_safelisted_response_header(name_lower: &str) -> bool {
    SAFELISTED_RESPONSE_HEADERS.contains(name_lower)
}

pub(crate) fn is_prohibited_request_header(name_lower: &str) -> bool {
    PROHIBITED_REQUEST_HEADERS.contains(name_lower)
}

pub(crate) fn is_prohibited_response_header(name_lower: &str) -> bool {
    PROHIBITED_RESPONSE_HEADERS.contains(name_lower)
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tables_test;

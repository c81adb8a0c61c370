//! Lenient parser for the runtime `Origin` request-header value.
//!
//! Browsers serialize origins themselves, so this parser only needs to be
//! strict enough to feed the corpus lookup; host well-formedness beyond the
//! scanner's character set is not checked here. The build-time counterpart
//! in [`crate::pattern`] is strict.

/// Longest registrable domain name permitted by DNS.
pub(crate) const MAX_HOST_LEN: usize = 253;

// "https" + "://" + host + ":" + up-to-5-digit port.
const MAX_ORIGIN_LEN: usize = 5 + 3 + MAX_HOST_LEN + 1 + 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub(crate) fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

/// A parsed `Origin` header value. Borrows from the raw header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Origin<'a> {
    pub(crate) scheme: Scheme,
    pub(crate) host: &'a str,
    pub(crate) host_is_ip: bool,
    pub(crate) port: Option<u16>,
}

pub(crate) fn parse(raw: &str) -> Option<Origin<'_>> {
    if raw.len() > MAX_ORIGIN_LEN {
        return None;
    }
    let (scheme, rest) = split_scheme(raw)?;
    let (host, host_is_ip, rest) = split_host(rest)?;
    let port = if rest.is_empty() {
        None
    } else {
        Some(split_port(rest)?)
    };
    Some(Origin {
        scheme,
        host,
        host_is_ip,
        port,
    })
}

/// Longest-prefix match over the supported schemes, `://` included.
pub(crate) fn split_scheme(value: &str) -> Option<(Scheme, &str)> {
    if let Some(rest) = value.strip_prefix("https://") {
        Some((Scheme::Https, rest))
    } else if let Some(rest) = value.strip_prefix("http://") {
        Some((Scheme::Http, rest))
    } else {
        None
    }
}

/// Scans the host portion and returns `(host, host_is_ip, remainder)`.
///
/// A bracketed host is read up to the matching `]` and marked as an IP.
/// Otherwise the host is the longest run of ASCII lowercase letters, digits,
/// `-`, `_`, and `.`; a leading dot and empty interior labels are rejected,
/// a trailing dot (absolute domain) is not.
pub(crate) fn split_host(value: &str) -> Option<(&str, bool, &str)> {
    if value.as_bytes().first() == Some(&b'[') {
        let end = value.find(']')?;
        if end == 1 {
            return None;
        }
        return Some((&value[..=end], true, &value[end + 1..]));
    }

    let mut end = 0;
    let mut previous_was_dot = true; // rejects a leading dot
    for byte in value.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => previous_was_dot = false,
            b'.' => {
                if previous_was_dot {
                    return None;
                }
                previous_was_dot = true;
            }
            _ => break,
        }
        end += 1;
    }
    if end == 0 || end > MAX_HOST_LEN {
        return None;
    }

    let host = &value[..end];
    Some((host, assume_ipv4(host), &value[end..]))
}

/// No TLD begins with a digit (per IANA), so a rightmost non-empty label
/// that does marks the host as an IPv4 address for lookup purposes.
fn assume_ipv4(host: &str) -> bool {
    host.rsplit('.')
        .find(|label| !label.is_empty())
        .and_then(|label| label.bytes().next())
        .is_some_and(|byte| byte.is_ascii_digit())
}

/// Parses `:` followed by 1-5 decimal digits, first nonzero, at most 65535.
pub(crate) fn split_port(value: &str) -> Option<u16> {
    let digits = value.strip_prefix(':')?;
    if digits.is_empty()
        || digits.len() > 5
        || digits.as_bytes()[0] == b'0'
        || !digits.bytes().all(|byte| byte.is_ascii_digit())
    {
        return None;
    }
    let port: u32 = digits.parse().ok()?;
    u16::try_from(port).ok()
}

#[cfg(test)]
#[path = "origin_test.rs"]
mod origin_test;

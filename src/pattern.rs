//! Strict build-time parser for declarative origin patterns such as
//! `https://example.com`, `https://*.example.com`, or `http://localhost:*`.

use crate::origin::{self, MAX_HOST_LEN, Scheme};
use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;

/// Classification of a pattern's host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostKind {
    Domain,
    NonLoopbackIp,
    LoopbackIp,
    /// `*.` prefix: one or more arbitrary subdomain labels.
    Subdomains,
}

/// The pattern's port constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PortPattern {
    /// No explicit port; matches origins that omit theirs.
    None,
    /// `:*` suffix; matches any port, explicit or not.
    Any,
    Exact(u16),
}

/// A parsed, validated origin pattern.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    /// The pattern string exactly as supplied.
    pub(crate) raw: String,
    pub(crate) scheme: Scheme,
    /// The host portion; retains the `*.` prefix for [`HostKind::Subdomains`].
    pub(crate) host: String,
    pub(crate) kind: HostKind,
    pub(crate) port: PortPattern,
}

/// Reasons an origin pattern is rejected at build time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("expected a scheme of \"http\" or \"https\" followed by \"://\"")]
    InvalidScheme,
    #[error("malformed host")]
    InvalidHost,
    #[error("malformed port")]
    InvalidPort,
    #[error("the wildcard origin \"*\" is not a valid pattern; use FromAnyOrigin instead")]
    WildcardOrigin,
    #[error("the \"null\" origin cannot be allowed")]
    NullOrigin,
    #[error("host is not a valid, ASCII-only (IDNA A-label) domain name")]
    InvalidDomain,
    #[error("host exceeds the maximum domain-name length")]
    HostTooLong,
    #[error("host is not an IP address in canonical form")]
    InvalidIpAddress,
    #[error("https origins cannot use IP-address hosts")]
    HttpsWithIpAddress,
    #[error("subdomain wildcards cannot apply to IP-address hosts")]
    SubdomainsOfIpAddress,
    #[error("explicit port equals the scheme's default port and must be omitted")]
    DefaultPort,
    #[error("subdomain wildcards cannot be combined with arbitrary ports")]
    SubdomainsWithAnyPort,
}

pub(crate) fn parse(raw: &str) -> Result<Pattern, PatternError> {
    if raw == "*" {
        return Err(PatternError::WildcardOrigin);
    }
    if raw == "null" {
        return Err(PatternError::NullOrigin);
    }

    let (scheme, rest) = origin::split_scheme(raw).ok_or(PatternError::InvalidScheme)?;
    let (subdomains, rest) = match rest.strip_prefix("*.") {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let (concrete, host_is_ip, rest) = origin::split_host(rest).ok_or(PatternError::InvalidHost)?;

    let port = if rest.is_empty() {
        PortPattern::None
    } else if rest == ":*" {
        PortPattern::Any
    } else {
        PortPattern::Exact(origin::split_port(rest).ok_or(PatternError::InvalidPort)?)
    };
    if let PortPattern::Exact(value) = port
        && value == scheme.default_port()
    {
        return Err(PatternError::DefaultPort);
    }
    if subdomains && port == PortPattern::Any {
        return Err(PatternError::SubdomainsWithAnyPort);
    }

    let kind = if host_is_ip {
        if subdomains {
            return Err(PatternError::SubdomainsOfIpAddress);
        }
        if scheme == Scheme::Https {
            return Err(PatternError::HttpsWithIpAddress);
        }
        validate_ip(concrete)?
    } else {
        validate_domain(concrete, subdomains)?;
        if subdomains {
            HostKind::Subdomains
        } else {
            HostKind::Domain
        }
    };

    let host = if subdomains {
        format!("*.{concrete}")
    } else {
        concrete.to_owned()
    };
    Ok(Pattern {
        raw: raw.to_owned(),
        scheme,
        host,
        kind,
        port,
    })
}

/// Accepts only canonical IP literals: compressed lowercase IPv6 in brackets
/// with no zone and no IPv4-mapped form, or dotted-quad IPv4 with no leading
/// zeros.
fn validate_ip(host: &str) -> Result<HostKind, PatternError> {
    let loopback = if let Some(inner) = host.strip_prefix('[') {
        let inner = inner.strip_suffix(']').ok_or(PatternError::InvalidIpAddress)?;
        if inner.contains('%') {
            return Err(PatternError::InvalidIpAddress);
        }
        let address: Ipv6Addr = inner.parse().map_err(|_| PatternError::InvalidIpAddress)?;
        if address.to_ipv4_mapped().is_some() || address.to_string() != inner {
            return Err(PatternError::InvalidIpAddress);
        }
        address.is_loopback()
    } else {
        let address: Ipv4Addr = host.parse().map_err(|_| PatternError::InvalidIpAddress)?;
        if address.to_string() != host {
            return Err(PatternError::InvalidIpAddress);
        }
        address.is_loopback()
    };
    Ok(if loopback {
        HostKind::LoopbackIp
    } else {
        HostKind::NonLoopbackIp
    })
}

/// Strict IDNA validation: the host must already be in ASCII (A-label) form
/// and be a fixed point of UTS 46 processing with STD3 rules, BiDi and label
/// checks, and DNS length verification.
fn validate_domain(host: &str, subdomains: bool) -> Result<(), PatternError> {
    // Reserve room for the smallest legal concrete subdomain, "a.".
    let max = if subdomains { MAX_HOST_LEN - 2 } else { MAX_HOST_LEN };
    if host.len() > max {
        return Err(PatternError::HostTooLong);
    }
    if !host.is_ascii() {
        return Err(PatternError::InvalidDomain);
    }
    match idna::domain_to_ascii_strict(host) {
        Ok(ascii) if ascii == host => Ok(()),
        _ => Err(PatternError::InvalidDomain),
    }
}

impl Pattern {
    /// The host with any `*.` prefix removed.
    pub(crate) fn concrete_host(&self) -> &str {
        match self.kind {
            HostKind::Subdomains => &self.host[2..],
            _ => &self.host,
        }
    }

    /// An origin is insecure when it uses plain `http` against anything other
    /// than loopback.
    pub(crate) fn is_insecure(&self) -> bool {
        if self.scheme != Scheme::Http {
            return false;
        }
        if self.kind == HostKind::LoopbackIp {
            return false;
        }
        let host = self.concrete_host();
        host != "localhost" && !host.ends_with(".localhost")
    }

    /// Whether a `Subdomains` pattern wildcards directly over an effective
    /// TLD, which would let arbitrary unrelated registrants match.
    pub(crate) fn is_public_suffix_wildcard(&self) -> bool {
        if self.kind != HostKind::Subdomains {
            return false;
        }
        let host = self.concrete_host().trim_end_matches('.');
        psl::suffix(host.as_bytes())
            .is_some_and(|suffix| suffix.is_known() && suffix.as_bytes().len() == host.len())
    }
}

#[cfg(test)]
#[path = "pattern_test.rs"]
mod pattern_test;

//! The closed set of policy options and their application to the
//! configuration accumulator.
//!
//! Options usable in credentialed policies ([`CorsOption`]) and options that
//! are only safe without credentials ([`AnonymousCorsOption`]) are disjoint
//! types with no subtyping relationship, so the compiler rejects passing
//! `FromAnyOrigin` or `ExposeAllResponseHeaders` to
//! [`Cors::allow_access_with_credentials`](crate::Cors::allow_access_with_credentials).

use crate::config::Accumulator;
use crate::errors::PolicyIssue;
use crate::pattern;
use crate::tables;
use crate::util::is_http_token;

/// Policy options that are safe to use with or without credentials.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum CorsOption {
    FromOrigins(Vec<String>),
    WithMethods(Vec<String>),
    WithAnyMethod,
    WithRequestHeaders(Vec<String>),
    WithAnyRequestHeaders,
    MaxAgeInSeconds(u32),
    ExposeResponseHeaders(Vec<String>),
    PreflightSuccessStatus(u16),
    PrivateNetworkAccess,
    PrivateNetworkAccessInNoCorsModeOnly,
    DangerouslyTolerateInsecureOrigins,
    DangerouslyTolerateSubdomainsOfPublicSuffixes,
}

/// Policy options for credentialless policies: everything in [`CorsOption`]
/// plus the two options that must never meet credentialed mode.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnonymousCorsOption {
    Common(CorsOption),
    FromAnyOrigin,
    ExposeAllResponseHeaders,
}

impl From<CorsOption> for AnonymousCorsOption {
    fn from(option: CorsOption) -> Self {
        AnonymousCorsOption::Common(option)
    }
}

impl CorsOption {
    pub fn from_origins<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FromOrigins(patterns.into_iter().map(Into::into).collect())
    }

    pub fn with_methods<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::WithMethods(methods.into_iter().map(Into::into).collect())
    }

    pub fn with_any_method() -> Self {
        Self::WithAnyMethod
    }

    pub fn with_request_headers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::WithRequestHeaders(names.into_iter().map(Into::into).collect())
    }

    pub fn with_any_request_headers() -> Self {
        Self::WithAnyRequestHeaders
    }

    pub fn max_age_in_seconds(seconds: u32) -> Self {
        Self::MaxAgeInSeconds(seconds)
    }

    pub fn expose_response_headers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ExposeResponseHeaders(names.into_iter().map(Into::into).collect())
    }

    pub fn preflight_success_status(status: u16) -> Self {
        Self::PreflightSuccessStatus(status)
    }

    pub fn private_network_access() -> Self {
        Self::PrivateNetworkAccess
    }

    pub fn private_network_access_in_no_cors_mode_only() -> Self {
        Self::PrivateNetworkAccessInNoCorsModeOnly
    }

    pub fn dangerously_tolerate_insecure_origins() -> Self {
        Self::DangerouslyTolerateInsecureOrigins
    }

    pub fn dangerously_tolerate_subdomains_of_public_suffixes() -> Self {
        Self::DangerouslyTolerateSubdomainsOfPublicSuffixes
    }

    pub(crate) fn apply(self, acc: &mut Accumulator) {
        match self {
            CorsOption::FromOrigins(patterns) => apply_from_origins(acc, patterns),
            CorsOption::WithMethods(methods) => apply_with_methods(acc, methods),
            CorsOption::WithAnyMethod => {
                if acc.mark("WithAnyMethod") {
                    acc.any_method = true;
                }
            }
            CorsOption::WithRequestHeaders(names) => apply_with_request_headers(acc, names),
            CorsOption::WithAnyRequestHeaders => {
                if acc.mark("WithAnyRequestHeaders") {
                    acc.any_request_headers = true;
                }
            }
            CorsOption::MaxAgeInSeconds(seconds) => {
                if acc.mark("MaxAgeInSeconds") {
                    if seconds > MAX_AGE_CEILING {
                        acc.issues.push(PolicyIssue::MaxAgeTooLarge { value: seconds });
                    } else {
                        acc.max_age = Some(seconds);
                    }
                }
            }
            CorsOption::ExposeResponseHeaders(names) => apply_expose_response_headers(acc, names),
            CorsOption::PreflightSuccessStatus(status) => {
                if acc.mark("PreflightSuccessStatus") {
                    if (200..300).contains(&status) {
                        acc.preflight_success_status = Some(status);
                    } else {
                        acc.issues
                            .push(PolicyIssue::InvalidPreflightStatus { status });
                    }
                }
            }
            CorsOption::PrivateNetworkAccess => {
                if acc.mark("PrivateNetworkAccess") {
                    acc.private_network_access = true;
                }
            }
            CorsOption::PrivateNetworkAccessInNoCorsModeOnly => {
                if acc.mark("PrivateNetworkAccessInNoCorsModeOnly") {
                    acc.private_network_access_in_no_cors_mode_only = true;
                }
            }
            CorsOption::DangerouslyTolerateInsecureOrigins => {
                if acc.mark("DangerouslyTolerateInsecureOrigins") {
                    acc.tolerate_insecure_origins = true;
                }
            }
            CorsOption::DangerouslyTolerateSubdomainsOfPublicSuffixes => {
                if acc.mark("DangerouslyTolerateSubdomainsOfPublicSuffixes") {
                    acc.tolerate_public_suffixes = true;
                }
            }
        }
    }
}

impl AnonymousCorsOption {
    pub fn from_any_origin() -> Self {
        Self::FromAnyOrigin
    }

    pub fn expose_all_response_headers() -> Self {
        Self::ExposeAllResponseHeaders
    }

    pub(crate) fn apply(self, acc: &mut Accumulator) {
        match self {
            AnonymousCorsOption::Common(option) => option.apply(acc),
            AnonymousCorsOption::FromAnyOrigin => {
                if acc.mark("FromAnyOrigin") {
                    acc.any_origin = true;
                }
            }
            AnonymousCorsOption::ExposeAllResponseHeaders => {
                if acc.mark("ExposeAllResponseHeaders") {
                    acc.expose_all_response_headers = true;
                }
            }
        }
    }
}

const MAX_AGE_CEILING: u32 = 86_400;

/// Methods the Fetch standard normalizes to uppercase.
const NORMALIZED_METHODS: [&str; 6] = ["DELETE", "GET", "HEAD", "OPTIONS", "POST", "PUT"];

fn apply_from_origins(acc: &mut Accumulator, patterns: Vec<String>) {
    if !acc.mark("FromOrigins") {
        return;
    }
    acc.from_origins = true;
    if patterns.is_empty() {
        acc.issues
            .push(PolicyIssue::EmptyOption { name: "FromOrigins" });
        return;
    }
    for raw in patterns {
        match pattern::parse(&raw) {
            Ok(parsed) => acc.patterns.push(parsed),
            Err(source) => acc.issues.push(PolicyIssue::InvalidOriginPattern {
                pattern: raw,
                source,
            }),
        }
    }
}

fn apply_with_methods(acc: &mut Accumulator, methods: Vec<String>) {
    if !acc.mark("WithMethods") {
        return;
    }
    if methods.is_empty() {
        acc.issues
            .push(PolicyIssue::EmptyOption { name: "WithMethods" });
        return;
    }
    let mut accepted = Vec::with_capacity(methods.len());
    for method in methods {
        if method == "*" {
            acc.issues.push(PolicyIssue::WildcardMethod);
        } else if !is_http_token(&method) {
            acc.issues.push(PolicyIssue::InvalidMethod { method });
        } else if tables::is_forbidden_method(&method) {
            acc.issues.push(PolicyIssue::ForbiddenMethod { method });
        } else {
            accepted.push(normalize_method(method));
        }
    }
    acc.methods = Some(accepted);
}

fn normalize_method(method: String) -> String {
    let uppercased = method.to_ascii_uppercase();
    if NORMALIZED_METHODS.contains(&uppercased.as_str()) {
        uppercased
    } else {
        method
    }
}

fn apply_with_request_headers(acc: &mut Accumulator, names: Vec<String>) {
    if !acc.mark("WithRequestHeaders") {
        return;
    }
    if names.is_empty() {
        acc.issues.push(PolicyIssue::EmptyOption {
            name: "WithRequestHeaders",
        });
        return;
    }
    let mut accepted = Vec::with_capacity(names.len());
    for name in names {
        if name == "*" {
            acc.issues.push(PolicyIssue::WildcardRequestHeaderName);
            continue;
        }
        if !is_http_token(&name) {
            acc.issues.push(PolicyIssue::InvalidRequestHeaderName { name });
            continue;
        }
        let lowered = name.to_ascii_lowercase();
        if tables::is_forbidden_request_header(&lowered) {
            acc.issues
                .push(PolicyIssue::ForbiddenRequestHeaderName { name });
        } else if tables::is_prohibited_request_header(&lowered) {
            acc.issues
                .push(PolicyIssue::ProhibitedRequestHeaderName { name });
        } else {
            accepted.push(lowered);
        }
    }
    acc.request_headers = Some(accepted);
}

fn apply_expose_response_headers(acc: &mut Accumulator, names: Vec<String>) {
    if !acc.mark("ExposeResponseHeaders") {
        return;
    }
    if names.is_empty() {
        acc.issues.push(PolicyIssue::EmptyOption {
            name: "ExposeResponseHeaders",
        });
        return;
    }
    let mut accepted = Vec::with_capacity(names.len());
    for name in names {
        if name == "*" {
            acc.issues.push(PolicyIssue::WildcardResponseHeaderName);
            continue;
        }
        if !is_http_token(&name) {
            acc.issues
                .push(PolicyIssue::InvalidResponseHeaderName { name });
            continue;
        }
        let lowered = name.to_ascii_lowercase();
        if tables::is_forbidden_response_header(&lowered) {
            acc.issues
                .push(PolicyIssue::ForbiddenResponseHeaderName { name });
        } else if tables::is_prohibited_response_header(&lowered) {
            acc.issues
                .push(PolicyIssue::ProhibitedResponseHeaderName { name });
        } else if !tables::is_safelisted_response_header(&lowered) {
            // Safelisted response headers are readable regardless, so listing
            // them would be dead weight.
            accepted.push(lowered);
        }
    }
    acc.expose_headers = Some(accepted);
}

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

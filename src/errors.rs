use crate::pattern::PatternError;
use std::fmt;
use thiserror::Error;

/// All problems found while building a policy, reported jointly. Policy
/// construction is all-or-nothing; no partial middleware is ever returned.
#[derive(Debug)]
pub struct InvalidPolicy {
    issues: Vec<PolicyIssue>,
}

impl InvalidPolicy {
    pub(crate) fn new(issues: Vec<PolicyIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[PolicyIssue] {
        &self.issues
    }
}

impl fmt::Display for InvalidPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid CORS policy: ")?;
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidPolicy {}

/// A single rejection encountered during policy construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyIssue {
    #[error("invalid origin pattern {pattern:?}: {source}")]
    InvalidOriginPattern {
        pattern: String,
        source: PatternError,
    },
    #[error("option {name} specified more than once")]
    RepeatedOption { name: &'static str },
    #[error("option {name} requires at least one value")]
    EmptyOption { name: &'static str },
    #[error("invalid method name {method:?}")]
    InvalidMethod { method: String },
    #[error("forbidden method name {method:?}")]
    ForbiddenMethod { method: String },
    #[error("the wildcard method \"*\" is not a valid element; use WithAnyMethod instead")]
    WildcardMethod,
    #[error("invalid request-header name {name:?}")]
    InvalidRequestHeaderName { name: String },
    #[error("forbidden request-header name {name:?}")]
    ForbiddenRequestHeaderName { name: String },
    #[error("prohibited request-header name {name:?}")]
    ProhibitedRequestHeaderName { name: String },
    #[error(
        "the wildcard request-header name \"*\" is not a valid element; use WithAnyRequestHeaders instead"
    )]
    WildcardRequestHeaderName,
    #[error("invalid response-header name {name:?}")]
    InvalidResponseHeaderName { name: String },
    #[error("forbidden response-header name {name:?}")]
    ForbiddenResponseHeaderName { name: String },
    #[error("prohibited response-header name {name:?}")]
    ProhibitedResponseHeaderName { name: String },
    #[error(
        "the wildcard response-header name \"*\" is not a valid element; use ExposeAllResponseHeaders instead"
    )]
    WildcardResponseHeaderName,
    #[error("max age of {value} seconds exceeds the maximum of 86400")]
    MaxAgeTooLarge { value: u32 },
    #[error("preflight success status {status} is not in the 2xx range")]
    InvalidPreflightStatus { status: u16 },
    #[error("options FromOrigins and FromAnyOrigin are mutually exclusive")]
    IncompatibleOriginOptions,
    #[error("one of the FromOrigins and FromAnyOrigin options is required")]
    MissingOriginOption,
    #[error("options WithMethods and WithAnyMethod are mutually exclusive")]
    IncompatibleMethodOptions,
    #[error("options WithRequestHeaders and WithAnyRequestHeaders are mutually exclusive")]
    IncompatibleRequestHeaderOptions,
    #[error("options ExposeResponseHeaders and ExposeAllResponseHeaders are mutually exclusive")]
    IncompatibleExposeOptions,
    #[error(
        "options PrivateNetworkAccess and PrivateNetworkAccessInNoCorsModeOnly are mutually exclusive"
    )]
    IncompatiblePrivateNetworkOptions,
    #[error("option FromAnyOrigin is incompatible with Private-Network Access")]
    AnyOriginWithPrivateNetwork,
    #[error(
        "insecure origin pattern {pattern:?} requires DangerouslyTolerateInsecureOrigins in this configuration"
    )]
    InsecureOriginPattern { pattern: String },
    #[error(
        "origin pattern {pattern:?} wildcards the subdomains of a public suffix; requires DangerouslyTolerateSubdomainsOfPublicSuffixes"
    )]
    PublicSuffixPattern { pattern: String },
}

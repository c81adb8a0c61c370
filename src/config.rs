//! Policy accumulation, cross-option validation, and precomputation of the
//! static portion of the response headers.

use crate::corpus::Corpus;
use crate::errors::{InvalidPolicy, PolicyIssue};
use crate::pattern::{HostKind, Pattern, PortPattern};
use crate::tables;
use crate::util::join_sorted;
use indexmap::IndexSet;

pub(crate) const DEFAULT_PREFLIGHT_SUCCESS_STATUS: u16 = 204;

/// The wildcard in `Access-Control-Allow-Headers` does not cover
/// `Authorization`, so the any-headers precomputation names it explicitly.
const ANY_REQUEST_HEADERS_VALUE: &str = "*,authorization";

/// Transient accumulation state: which options were supplied and with what
/// candidate values. Discarded once [`build`] has produced a [`Config`].
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    pub(crate) issues: Vec<PolicyIssue>,
    seen: IndexSet<&'static str>,
    pub(crate) patterns: Vec<Pattern>,
    pub(crate) from_origins: bool,
    pub(crate) any_origin: bool,
    pub(crate) methods: Option<Vec<String>>,
    pub(crate) any_method: bool,
    pub(crate) request_headers: Option<Vec<String>>,
    pub(crate) any_request_headers: bool,
    pub(crate) max_age: Option<u32>,
    pub(crate) expose_headers: Option<Vec<String>>,
    pub(crate) expose_all_response_headers: bool,
    pub(crate) preflight_success_status: Option<u16>,
    pub(crate) private_network_access: bool,
    pub(crate) private_network_access_in_no_cors_mode_only: bool,
    pub(crate) tolerate_insecure_origins: bool,
    pub(crate) tolerate_public_suffixes: bool,
}

impl Accumulator {
    /// Records that the named option was supplied. Returns false, and records
    /// an issue, when the option kind was already seen.
    pub(crate) fn mark(&mut self, name: &'static str) -> bool {
        if self.seen.insert(name) {
            true
        } else {
            self.issues.push(PolicyIssue::RepeatedOption { name });
            false
        }
    }
}

/// The frozen policy. Built once, then shared read-only across requests.
/// `None` in a precomputed header field means the value is dynamic and
/// derived per request.
#[derive(Debug)]
pub(crate) struct Config {
    pub(crate) acao: Option<String>,
    pub(crate) acam: Option<String>,
    pub(crate) acah: Option<String>,
    pub(crate) aceh: Option<String>,
    pub(crate) acma: Option<String>,
    pub(crate) corpus: Corpus,
    pub(crate) allow_credentials: bool,
    pub(crate) allow_any_origin: bool,
    pub(crate) allow_any_method: bool,
    pub(crate) allow_any_request_headers: bool,
    pub(crate) private_network_access: bool,
    pub(crate) private_network_access_in_no_cors_mode_only: bool,
    pub(crate) preflight_success_status: u16,
}

pub(crate) fn build(credentialed: bool, mut acc: Accumulator) -> Result<Config, InvalidPolicy> {
    validate(credentialed, &mut acc);
    if !acc.issues.is_empty() {
        return Err(InvalidPolicy::new(acc.issues));
    }
    Ok(precompute(credentialed, acc))
}

fn validate(credentialed: bool, acc: &mut Accumulator) {
    if acc.from_origins && acc.any_origin {
        acc.issues.push(PolicyIssue::IncompatibleOriginOptions);
    } else if !acc.from_origins && !acc.any_origin {
        acc.issues.push(PolicyIssue::MissingOriginOption);
    }
    if acc.methods.is_some() && acc.any_method {
        acc.issues.push(PolicyIssue::IncompatibleMethodOptions);
    }
    if acc.request_headers.is_some() && acc.any_request_headers {
        acc.issues.push(PolicyIssue::IncompatibleRequestHeaderOptions);
    }
    if acc.expose_headers.is_some() && acc.expose_all_response_headers {
        acc.issues.push(PolicyIssue::IncompatibleExposeOptions);
    }
    if acc.private_network_access && acc.private_network_access_in_no_cors_mode_only {
        acc.issues.push(PolicyIssue::IncompatiblePrivateNetworkOptions);
    }
    let private_network =
        acc.private_network_access || acc.private_network_access_in_no_cors_mode_only;
    if acc.any_origin && private_network {
        // Credentialless PNA still needs a concrete origin.
        acc.issues.push(PolicyIssue::AnyOriginWithPrivateNetwork);
    }
    if (credentialed || private_network) && !acc.tolerate_insecure_origins {
        for pattern in &acc.patterns {
            if pattern.is_insecure() {
                acc.issues.push(PolicyIssue::InsecureOriginPattern {
                    pattern: pattern.raw.clone(),
                });
            }
        }
    }
    if !acc.tolerate_public_suffixes {
        for pattern in &acc.patterns {
            if pattern.is_public_suffix_wildcard() {
                acc.issues.push(PolicyIssue::PublicSuffixPattern {
                    pattern: pattern.raw.clone(),
                });
            }
        }
    }
}

fn precompute(credentialed: bool, acc: Accumulator) -> Config {
    let mut corpus = Corpus::default();
    for pattern in &acc.patterns {
        corpus.add(pattern);
    }

    let acao = if acc.any_origin {
        Some("*".to_owned())
    } else {
        single_origin(&acc.patterns)
    };

    let acam = if acc.any_method {
        (!credentialed).then(|| "*".to_owned())
    } else {
        acc.methods.as_ref().and_then(|methods| {
            let gated: Vec<String> = methods
                .iter()
                .filter(|method| !tables::is_safelisted_method(method))
                .cloned()
                .collect();
            if gated.is_empty() {
                None
            } else {
                Some(join_sorted(gated))
            }
        })
    };

    let acah = if acc.any_request_headers {
        (!credentialed).then(|| ANY_REQUEST_HEADERS_VALUE.to_owned())
    } else {
        acc.request_headers
            .as_ref()
            .filter(|names| !names.is_empty())
            .map(|names| join_sorted(names.clone()))
    };

    let aceh = if acc.expose_all_response_headers {
        Some("*".to_owned())
    } else {
        acc.expose_headers
            .as_ref()
            .filter(|names| !names.is_empty())
            .map(|names| join_sorted(names.clone()))
    };

    Config {
        acao,
        acam,
        acah,
        aceh,
        acma: acc.max_age.map(|seconds| seconds.to_string()),
        corpus,
        allow_credentials: credentialed,
        allow_any_origin: acc.any_origin,
        allow_any_method: acc.any_method,
        allow_any_request_headers: acc.any_request_headers,
        private_network_access: acc.private_network_access,
        private_network_access_in_no_cors_mode_only: acc
            .private_network_access_in_no_cors_mode_only,
        preflight_success_status: acc
            .preflight_success_status
            .unwrap_or(DEFAULT_PREFLIGHT_SUCCESS_STATUS),
    }
}

/// The static-ACAO fast path: a corpus of exactly one pattern with no
/// subdomain wildcard and no any-port wildcard matches exactly one origin
/// string, so matching degrades to byte equality against the pattern itself.
fn single_origin(patterns: &[Pattern]) -> Option<String> {
    match patterns {
        [only] if only.kind != HostKind::Subdomains && only.port != PortPattern::Any => {
            Some(only.raw.clone())
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

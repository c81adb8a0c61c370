use crate::config::{self, Accumulator, Config};
use crate::constants::{header, method};
use crate::context::RequestContext;
use crate::errors::InvalidPolicy;
use crate::headers::{Headers, ResponseHeaders};
use crate::options::{AnonymousCorsOption, CorsOption};
use crate::origin;
use crate::tables;

/// A compiled CORS policy. Build it once with [`Cors::allow_access`] or
/// [`Cors::allow_access_with_credentials`], then call [`Cors::check`] for
/// every request; the policy is immutable and safe to share across threads.
#[derive(Debug)]
pub struct Cors {
    config: Config,
}

/// What the caller should do with a checked request.
#[derive(Debug, Clone)]
pub enum CorsDecision {
    /// Attach the headers to the response and invoke the downstream handler.
    Passthrough(Headers),
    /// Respond immediately with the given status and headers; the downstream
    /// handler must not run.
    Preflight { status: u16, headers: Headers },
}

impl Cors {
    /// Compiles a credentialless policy from the given options.
    pub fn allow_access<I>(options: I) -> Result<Self, InvalidPolicy>
    where
        I: IntoIterator<Item = AnonymousCorsOption>,
    {
        let mut acc = Accumulator::default();
        for option in options {
            option.apply(&mut acc);
        }
        config::build(false, acc).map(|config| Self { config })
    }

    /// Compiles a credentialed policy. Responses will carry
    /// `Access-Control-Allow-Credentials: true`; the option type keeps the
    /// credentialless-only options out at compile time.
    pub fn allow_access_with_credentials<I>(options: I) -> Result<Self, InvalidPolicy>
    where
        I: IntoIterator<Item = CorsOption>,
    {
        let mut acc = Accumulator::default();
        for option in options {
            option.apply(&mut acc);
        }
        config::build(true, acc).map(|config| Self { config })
    }

    /// Classifies the request and computes the response headers, per the
    /// Fetch standard's CORS protocol and the Private-Network-Access draft.
    pub fn check(&self, request: &RequestContext<'_>) -> CorsDecision {
        let is_options = request.method == method::OPTIONS;
        match (request.origin, request.access_control_request_method) {
            (Some(origin), Some(acrm)) if is_options => self.preflight(request, origin, acrm),
            (origin, _) => CorsDecision::Passthrough(self.actual(is_options, origin)),
        }
    }

    /// Non-preflight handling: covers non-CORS requests (no `Origin`) and
    /// actual CORS requests, allowed or denied. Denial emits no CORS headers
    /// at all; the browser enforces the failure.
    fn actual(&self, is_options: bool, origin: Option<&str>) -> Headers {
        let mut headers = ResponseHeaders::new();
        self.add_vary(&mut headers, is_options);

        if let Some(acao) = &self.config.acao {
            headers.set(header::ACCESS_CONTROL_ALLOW_ORIGIN, acao.clone());
            self.add_credentials(&mut headers);
            self.add_expose_headers(&mut headers);
        } else if let Some(raw) = origin
            && let Some(parsed) = origin::parse(raw)
            && self.config.corpus.contains(&parsed)
        {
            // Echo the Origin value verbatim.
            headers.set(header::ACCESS_CONTROL_ALLOW_ORIGIN, raw);
            self.add_credentials(&mut headers);
            self.add_expose_headers(&mut headers);
        }
        headers.into_headers()
    }

    /// CORS-preflight handling, in the check order of Fetch §4.8 step 7:
    /// origin, private network, method, headers. A failure after the origin
    /// check still answers with the success status but omits the remaining
    /// allow headers, so the browser fails the check client-side while the
    /// server operator can still inspect the request.
    fn preflight(&self, request: &RequestContext<'_>, origin: &str, acrm: &str) -> CorsDecision {
        let mut headers = ResponseHeaders::new();
        self.add_vary(&mut headers, true);

        if !self.origin_allowed(origin) {
            // No CORS context established; the only 4xx in the protocol.
            return CorsDecision::Preflight {
                status: 403,
                headers: headers.into_headers(),
            };
        }
        match &self.config.acao {
            Some(acao) => headers.set(header::ACCESS_CONTROL_ALLOW_ORIGIN, acao.clone()),
            None => headers.set(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
        }
        self.add_credentials(&mut headers);

        if request.access_control_request_private_network == Some("true") {
            let enabled = self.config.private_network_access
                || self.config.private_network_access_in_no_cors_mode_only;
            if !enabled {
                return self.preflight_response(headers);
            }
            headers.set(header::ACCESS_CONTROL_ALLOW_PRIVATE_NETWORK, "true");
            if self.config.private_network_access_in_no_cors_mode_only {
                // No-cors-mode fetches are not subject to method and header
                // gating, so the preflight ends here.
                return self.preflight_response(headers);
            }
        }

        if !tables::is_safelisted_method(acrm) {
            if let Some(acam) = &self.config.acam {
                headers.set(header::ACCESS_CONTROL_ALLOW_METHODS, acam.clone());
            } else if self.config.allow_any_method {
                headers.set(header::ACCESS_CONTROL_ALLOW_METHODS, acrm);
            } else {
                return self.preflight_response(headers);
            }
        }

        if let Some(acrh) = request.access_control_request_headers
            && !acrh.is_empty()
        {
            if let Some(acah) = &self.config.acah {
                headers.set(header::ACCESS_CONTROL_ALLOW_HEADERS, acah.clone());
            } else if self.config.allow_any_request_headers {
                headers.set(header::ACCESS_CONTROL_ALLOW_HEADERS, acrh);
            } else {
                return self.preflight_response(headers);
            }
        }

        if let Some(acma) = &self.config.acma {
            headers.set(header::ACCESS_CONTROL_MAX_AGE, acma.clone());
        }
        self.preflight_response(headers)
    }

    fn origin_allowed(&self, origin: &str) -> bool {
        if self.config.allow_any_origin {
            return true;
        }
        if let Some(acao) = &self.config.acao {
            // Single-pattern fast path: byte equality, no parse.
            return acao == origin;
        }
        origin::parse(origin).is_some_and(|parsed| self.config.corpus.contains(&parsed))
    }

    /// Answers with the configured success status. Also used for a preflight
    /// that failed after the origin check: same status, but with the
    /// remaining allow headers withheld, so the browser fails the check.
    fn preflight_response(&self, headers: ResponseHeaders) -> CorsDecision {
        CorsDecision::Preflight {
            status: self.config.preflight_success_status,
            headers: headers.into_headers(),
        }
    }

    /// `Vary` discipline for cache correctness: any OPTIONS request may be a
    /// preflight for some policy, so it varies on the full preflight tuple;
    /// other requests vary on `Origin` iff the allow-origin value is
    /// per-request.
    fn add_vary(&self, headers: &mut ResponseHeaders, is_options: bool) {
        if is_options {
            headers.add_vary(header::ACCESS_CONTROL_REQUEST_HEADERS);
            headers.add_vary(header::ACCESS_CONTROL_REQUEST_METHOD);
            headers.add_vary(header::ACCESS_CONTROL_REQUEST_PRIVATE_NETWORK);
            headers.add_vary(header::ORIGIN);
        } else if self.config.acao.is_none() {
            headers.add_vary(header::ORIGIN);
        }
    }

    fn add_credentials(&self, headers: &mut ResponseHeaders) {
        if self.config.allow_credentials {
            headers.set(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
        }
    }

    fn add_expose_headers(&self, headers: &mut ResponseHeaders) {
        if let Some(aceh) = &self.config.aceh {
            headers.set(header::ACCESS_CONTROL_EXPOSE_HEADERS, aceh.clone());
        }
    }
}

#[cfg(test)]
#[path = "cors_test.rs"]
mod cors_test;

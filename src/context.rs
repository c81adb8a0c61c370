use crate::constants::header;

/// Borrowed view of the CORS-relevant parts of an incoming request.
///
/// Each header field must carry the *first* value of the corresponding
/// request header; additional values of a repeated header are to be dropped,
/// which resists header smuggling via malformed duplicates.
/// [`RequestContext::from_http`] does this for you.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    pub method: &'a str,
    pub origin: Option<&'a str>,
    pub access_control_request_method: Option<&'a str>,
    pub access_control_request_headers: Option<&'a str>,
    pub access_control_request_private_network: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    /// Builds a context from `http` crate types. `HeaderMap::get` returns
    /// only the first value of a repeated header, which implements the
    /// single-value discipline at this seam.
    pub fn from_http(method: &'a http::Method, headers: &'a http::HeaderMap) -> Self {
        Self {
            method: method.as_str(),
            origin: first_value(headers, header::ORIGIN),
            access_control_request_method: first_value(
                headers,
                header::ACCESS_CONTROL_REQUEST_METHOD,
            ),
            access_control_request_headers: first_value(
                headers,
                header::ACCESS_CONTROL_REQUEST_HEADERS,
            ),
            access_control_request_private_network: first_value(
                headers,
                header::ACCESS_CONTROL_REQUEST_PRIVATE_NETWORK,
            ),
        }
    }
}

fn first_value<'h>(headers: &'h http::HeaderMap, name: &'static str) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use trellis_cors::{CorsDecision, Headers};

pub const PREFLIGHT_VARY: &str =
    "Access-Control-Request-Headers, Access-Control-Request-Method, Access-Control-Request-Private-Network, Origin";

pub fn assert_passthrough(decision: CorsDecision) -> Headers {
    match decision {
        CorsDecision::Passthrough(headers) => headers,
        other => panic!("expected passthrough decision, got {other:?}"),
    }
}

pub fn assert_preflight(decision: CorsDecision) -> (u16, Headers) {
    match decision {
        CorsDecision::Preflight { status, headers } => (status, headers),
        other => panic!("expected preflight decision, got {other:?}"),
    }
}

pub fn assert_header_eq(headers: &Headers, name: &str, expected: &str) {
    match headers.get(name) {
        Some(value) => assert_eq!(value, expected, "unexpected value for {name}"),
        None => panic!("expected header {name} to be present in {headers:?}"),
    }
}

pub fn assert_no_header(headers: &Headers, name: &str) {
    assert!(
        !headers.contains_key(name),
        "expected header {name} to be absent, found {:?}",
        headers.get(name)
    );
}

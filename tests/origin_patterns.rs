mod common;

use common::asserts::{assert_header_eq, assert_no_header, assert_passthrough};
use common::builders::{actual_request, anonymous_policy};
use trellis_cors::constants::{header, method};
use trellis_cors::{Cors, CorsOption};

fn allows(cors: &Cors, origin: &str) -> bool {
    let headers = assert_passthrough(actual_request().method(method::GET).origin(origin).check(cors));
    match headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
        Some(value) => {
            assert_eq!(value, origin);
            true
        }
        None => false,
    }
}

#[test]
fn a_subdomain_wildcard_matches_any_depth_but_not_the_apex() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["https://*.example.com", "https://other.test"]).into(),
    ]);

    assert!(allows(&cors, "https://foo.example.com"));
    assert!(allows(&cors, "https://deep.foo.example.com"));
    assert!(allows(&cors, "https://a.b.c.d.example.com"));
    assert!(!allows(&cors, "https://example.com"));
    assert!(!allows(&cors, "https://fooexample.com"));
    assert!(!allows(&cors, "https://example.com.evil.test"));
}

#[test]
fn a_port_wildcard_matches_explicit_and_implicit_ports() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["http://localhost:*"]).into(),
    ]);

    assert!(allows(&cors, "http://localhost"));
    assert!(allows(&cors, "http://localhost:80"));
    assert!(allows(&cors, "http://localhost:3000"));
    assert!(allows(&cors, "http://localhost:65535"));
    assert!(!allows(&cors, "https://localhost:3000"));
    assert!(!allows(&cors, "http://localhost.evil.test:3000"));
}

#[test]
fn a_portless_pattern_matches_only_the_default_port() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["https://example.com", "https://other.test"]).into(),
    ]);

    assert!(allows(&cors, "https://example.com"));
    assert!(!allows(&cors, "https://example.com:8443"));
}

#[test]
fn an_explicit_port_pattern_matches_only_that_port() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["https://example.com:8443", "https://other.test"]).into(),
    ]);

    assert!(allows(&cors, "https://example.com:8443"));
    assert!(!allows(&cors, "https://example.com"));
    assert!(!allows(&cors, "https://example.com:9443"));
}

#[test]
fn schemes_are_matched_exactly() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["https://example.com", "http://insecure.test:8080"]).into(),
    ]);

    assert!(allows(&cors, "https://example.com"));
    assert!(!allows(&cors, "http://example.com"));
    assert!(allows(&cors, "http://insecure.test:8080"));
    assert!(!allows(&cors, "https://insecure.test:8080"));
}

#[test]
fn trailing_dot_hosts_are_distinct_from_dotless_ones() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["https://example.com", "https://other.test"]).into(),
    ]);

    assert!(!allows(&cors, "https://example.com."));
}

#[test]
fn ip_hosts_match_literally() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["http://127.0.0.1:8080", "http://[::1]:8080"]).into(),
    ]);

    assert!(allows(&cors, "http://127.0.0.1:8080"));
    assert!(allows(&cors, "http://[::1]:8080"));
    assert!(!allows(&cors, "http://127.0.0.1"));
    assert!(!allows(&cors, "http://[::2]:8080"));
}

#[test]
fn origins_are_matched_case_sensitively_as_received() {
    // Browsers send lowercase serialized origins; anything else is not a
    // serialized origin and fails to parse.
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["https://example.com", "https://other.test"]).into(),
    ]);

    let headers = assert_passthrough(
        actual_request()
            .method(method::GET)
            .origin("https://EXAMPLE.com")
            .check(&cors),
    );

    assert_no_header(&headers, header::ACCESS_CONTROL_ALLOW_ORIGIN);
}

#[test]
fn overlapping_patterns_do_not_shadow_each_other() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins([
            "https://foo.example.com",
            "https://*.example.com",
            "https://foo.example.com:8443",
        ])
        .into(),
    ]);

    assert!(allows(&cors, "https://foo.example.com"));
    assert!(allows(&cors, "https://bar.example.com"));
    assert!(allows(&cors, "https://foo.example.com:8443"));
    assert!(!allows(&cors, "https://bar.example.com:8443"));
}

#[test]
fn garbage_origin_values_are_denied_without_panicking() {
    let cors = anonymous_policy(vec![
        CorsOption::from_origins(["https://example.com", "https://other.test"]).into(),
    ]);

    for origin in [
        "",
        "null",
        "example.com",
        "https://",
        "https://exa mple.com",
        "https://example.com:",
        "https://example.com:0",
        "https://example.com:99999",
        "https://.example.com",
        "https://exa..mple.com",
        "ftp://example.com",
    ] {
        assert!(!allows(&cors, origin), "expected {origin:?} to be denied");
    }
}

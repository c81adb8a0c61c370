mod common;

use common::asserts::{assert_passthrough, assert_preflight};
use common::builders::{actual_request, anonymous_policy, preflight_request};
use proptest::prelude::*;
use trellis_cors::constants::{header, method};
use trellis_cors::{Cors, CorsOption};

fn label_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9]{0,11}").unwrap()
}

fn allows(cors: &Cors, origin: &str) -> bool {
    let headers = assert_passthrough(actual_request().method(method::GET).origin(origin).check(cors));
    headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
}

proptest! {
    #[test]
    fn a_subdomain_wildcard_covers_every_label_but_never_the_apex(
        apex in label_strategy(),
        sub in label_strategy(),
        deeper in label_strategy(),
    ) {
        let cors = anonymous_policy(vec![
            CorsOption::from_origins([format!("https://*.{apex}.example")]).into(),
        ]);

        let sub_origin = format!("https://{sub}.{apex}.example");
        let deeper_origin = format!("https://{deeper}.{sub}.{apex}.example");
        let apex_origin = format!("https://{apex}.example");
        prop_assert!(allows(&cors, &sub_origin));
        prop_assert!(allows(&cors, &deeper_origin));
        prop_assert!(!allows(&cors, &apex_origin));
    }

    #[test]
    fn an_exact_pattern_matches_itself_and_nothing_beside_it(
        host in label_strategy(),
        other in label_strategy(),
    ) {
        prop_assume!(host != other);
        let cors = anonymous_policy(vec![
            CorsOption::from_origins([
                format!("https://{host}.example"),
                "https://decoy.invalid".to_owned(),
            ])
            .into(),
        ]);

        let https_host = format!("https://{host}.example");
        let https_other = format!("https://{other}.example");
        let http_host = format!("http://{host}.example");
        prop_assert!(allows(&cors, &https_host));
        prop_assert!(!allows(&cors, &https_other));
        prop_assert!(!allows(&cors, &http_host));
    }

    #[test]
    fn a_port_wildcard_matches_every_port(port in 1..=65535u16) {
        let cors = anonymous_policy(vec![
            CorsOption::from_origins(["http://localhost:*"]).into(),
        ]);

        let http_origin = format!("http://localhost:{port}");
        let https_origin = format!("https://localhost:{port}");
        prop_assert!(allows(&cors, &http_origin));
        prop_assert!(!allows(&cors, &https_origin));
    }

    #[test]
    fn an_exact_port_matches_no_other_port(
        allowed in 1..=65535u16,
        requested in 1..=65535u16,
    ) {
        prop_assume!(allowed != 443);
        let cors = anonymous_policy(vec![
            CorsOption::from_origins([
                format!("https://app.example:{allowed}"),
                "https://decoy.invalid".to_owned(),
            ])
            .into(),
        ]);

        let origin = format!("https://app.example:{requested}");
        prop_assert_eq!(allows(&cors, &origin), requested == allowed);
    }

    #[test]
    fn parsing_an_allowed_origin_is_total_over_arbitrary_input(input in ".{0,64}") {
        // Checking any byte soup must neither panic nor grant access.
        let cors = anonymous_policy(vec![
            CorsOption::from_origins(["https://only.example", "https://decoy.invalid"]).into(),
        ]);

        let origin_allowed = allows(&cors, &input);
        prop_assert_eq!(origin_allowed, input == "https://only.example");
    }

    #[test]
    fn allowed_methods_survive_precomputation(sub in label_strategy()) {
        let cors = Cors::allow_access(vec![
            CorsOption::from_origins([format!("https://{sub}.example")]).into(),
            CorsOption::with_methods([method::PATCH, method::DELETE]).into(),
        ])
        .expect("policy should build");

        let decision = preflight_request()
            .origin(format!("https://{sub}.example"))
            .request_method(method::PATCH)
            .check(&cors);

        let (status, headers) = assert_preflight(decision);
        prop_assert_eq!(status, 204);
        prop_assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).map(String::as_str),
            Some("DELETE,PATCH")
        );
    }
}

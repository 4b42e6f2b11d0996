//! Baggage round trips through an [`HttpCarrier`].

use hermes_baggage::{canonical_header_key, must, Baggage};
use hermes_core::{Carrier, HttpCarrier};
use http::Method;
use proptest::prelude::*;

fn request() -> HttpCarrier {
    HttpCarrier::from_url(Method::GET, "http://authcar.amap.com/ws/authcar/jwks").unwrap()
}

#[test]
fn test_header_round_trip() {
    let mut outgoing = Baggage::new(["x"]).with_header_prefix("x-proxy-user-");
    outgoing.set_attribute("tid", "1").set_attribute("uid", "2");

    let mut carrier = request();
    outgoing.inject_headers(Some(&mut carrier));

    let mut incoming = Baggage::new(["x"]).with_header_prefix("x-proxy-user-");
    incoming.extract(Some(&mut carrier));
    assert_eq!(incoming.attributes(), outgoing.attributes());
    assert!(incoming.errors().is_empty());
}

#[test]
fn test_param_round_trip() {
    let mut outgoing = Baggage::new(["x-tproxy", "user"]);
    outgoing
        .set_attribute("tid", "2")
        .set_attribute("user_name", "alice smith");

    let mut carrier = HttpCarrier::from_url(Method::GET, "/ws/authcar/jwks?keep=1").unwrap();
    outgoing.inject_params(Some(&mut carrier));
    assert_eq!(carrier.query().get("keep"), Some("1"));

    let mut incoming = Baggage::new(["x-tproxy", "user"]);
    incoming.extract(Some(&mut carrier));
    assert_eq!(incoming.attributes(), outgoing.attributes());
}

#[test]
fn test_user_domain_scenario() {
    let mut user = Baggage::new(["x-tprOxy", "user"]);
    user.set_attribute("auth_backend", "ssoauth");
    assert_eq!(user.attr("auth-backend"), "ssoauth");
    user.set_attribute("tid", "1");
    assert_eq!(must(user.attr("tid").int64()), 1);

    user.replace_attributes(Vec::<(&str, &str)>::new());
    assert!(user.attr("tid").is_empty());

    user.merge_attributes([
        ("auth_backend", "jwtauth"),
        ("tid", "2"),
        ("uid", "2"),
        ("user_name", "alice"),
    ]);

    let mut carrier = request();
    let mut peer = Baggage::new(["x-tproxy", "user"]);
    assert!(peer.extract(Some(&mut carrier)).attr("tid").is_empty());

    user.inject_headers(Some(&mut carrier));
    assert_eq!(carrier.headers()["X-Tproxy-User-User-Name"], "alice");
    assert_eq!(carrier.headers()["X-Tproxy-User-Uid"], "2");
    assert_eq!(must(peer.extract(Some(&mut carrier)).attr("uid").int64()), 2);

    carrier.headers_mut().clear();
    user.inject_params(Some(&mut carrier));
    assert_eq!(carrier.form().get("x-tproxy-user-tid"), Some("2"));

    let mut fresh = Baggage::new(["x-tproxy", "user"]);
    assert_eq!(must(fresh.extract(Some(&mut carrier)).attr("tid").int64()), 2);
    assert!(user.errors().is_empty());
}

#[test]
fn test_form_body_values_are_extracted() {
    let mut carrier = HttpCarrier::builder()
        .method(Method::POST)
        .url("/login")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("x-tproxy-user-tid=11")
        .build()
        .unwrap();
    let mut baggage = Baggage::new(["x-tproxy", "user"]);
    baggage.extract(Some(&mut carrier));
    assert_eq!(baggage.attr("tid").int().unwrap(), 11);
}

proptest! {
    #[test]
    fn prop_header_round_trip(
        attributes in proptest::collection::btree_map("[a-z][a-z0-9_-]{0,11}", "[ -~]{0,24}", 0..6)
    ) {
        let mut outgoing = Baggage::new(["x", "proxy", "user"]);
        outgoing.merge_attributes(attributes.iter());

        let mut carrier = request();
        outgoing.inject_headers(Some(&mut carrier));
        let mut incoming = Baggage::new(["x", "proxy", "user"]);
        incoming.extract(Some(&mut carrier));

        prop_assert!(outgoing.errors().is_empty());
        prop_assert_eq!(incoming.attributes(), outgoing.attributes());
        for name in attributes.keys() {
            let header = canonical_header_key(&format!("x-proxy-user-{}", name));
            prop_assert!(outgoing.headers().contains_key(&header));
        }
    }

    #[test]
    fn prop_param_round_trip(
        attributes in proptest::collection::btree_map("[a-z][a-z0-9_-]{0,11}", "\\PC{0,24}", 0..6)
    ) {
        let mut outgoing = Baggage::new(["x", "proxy", "user"]);
        outgoing.merge_attributes(attributes.iter());

        let mut carrier = request();
        outgoing.inject_params(Some(&mut carrier));
        let mut incoming = Baggage::new(["x", "proxy", "user"]);
        incoming.extract(Some(&mut carrier));

        prop_assert_eq!(incoming.attributes(), outgoing.attributes());
    }
}

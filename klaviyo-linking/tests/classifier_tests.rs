use klaviyo_linking::{LinkingConfig, MessageClassifier, PushPayload, Url};

fn classifier() -> MessageClassifier {
    MessageClassifier::default()
}

fn marked(extra: &[(&str, &str)]) -> PushPayload {
    let mut data = vec![("_k", "{\"c\":\"abc\"}")];
    data.extend_from_slice(extra);
    PushPayload::from_remote_data(data)
}

// ── Payload membership ────────────────────────────────────────────

#[test]
fn marker_makes_payload_platform() {
    assert!(classifier().is_platform_payload(&marked(&[])));
}

#[test]
fn payload_without_marker_is_foreign() {
    let payload =
        PushPayload::from_remote_data([("title", "Sale"), ("url", "https://trk.klviyomail.com/x")]);
    assert!(!classifier().is_platform_payload(&payload));
    assert!(!classifier().is_notification(&payload));
    assert_eq!(classifier().tracking_link_in(&payload), None);
}

#[test]
fn empty_payload_is_foreign() {
    let payload = PushPayload::from_remote_data(Vec::<(String, String)>::new());
    assert!(!classifier().is_platform_payload(&payload));
}

// ── Notification vs silent ────────────────────────────────────────

#[test]
fn title_or_body_makes_notification() {
    assert!(classifier().is_notification(&marked(&[("title", "Hi")])));
    assert!(classifier().is_notification(&marked(&[("body", "There")])));
}

#[test]
fn silent_platform_payload_is_not_notification() {
    let payload = marked(&[("key_value_pairs", "{}")]);
    assert!(classifier().is_platform_payload(&payload));
    assert!(!classifier().is_notification(&payload));
}

// ── URIs ──────────────────────────────────────────────────────────

#[test]
fn tracking_domain_link_is_universal_tracking_link() {
    assert!(classifier().is_universal_tracking_link("https://trk.klviyomail.com/abc"));
}

#[test]
fn unrelated_domain_is_not_tracking_link() {
    assert!(!classifier().is_universal_tracking_link("https://example.com/abc"));
    assert!(!classifier().is_platform_uri("https://example.com/abc"));
}

#[test]
fn tracking_path_prefix_on_custom_domain() {
    assert!(classifier().is_universal_tracking_link("https://links.shop.example/u/abc123"));
    assert!(classifier().is_universal_tracking_link("http://links.shop.example/u/abc123"));
}

#[test]
fn disallowed_scheme_never_matches() {
    assert!(!classifier().is_platform_uri("myapp://trk.klviyomail.com/abc"));
    assert!(!classifier().is_universal_tracking_link("ftp://trk.klviyomail.com/u/abc"));
}

#[test]
fn lookalike_host_is_rejected() {
    assert!(!classifier().is_platform_uri("https://evilklviyomail.com/abc"));
    assert!(!classifier().is_platform_uri("https://klviyomail.com.evil.example/abc"));
}

#[test]
fn bare_tracking_domain_belongs_but_is_not_a_link() {
    let c = classifier();
    assert!(c.is_platform_uri("https://klviyomail.com"));
    assert!(!c.is_universal_tracking_link("https://klviyomail.com"));
    assert!(!c.is_universal_tracking_link("https://trk.klviyomail.com/"));
}

#[test]
fn host_match_is_case_insensitive() {
    assert!(classifier().is_universal_tracking_link("HTTPS://TRK.KLVIYOMAIL.COM/abc"));
}

#[test]
fn malformed_uris_do_not_match() {
    let c = classifier();
    for input in ["", "not a uri", "https://", "://trk.klviyomail.com/abc", "https://[::1"] {
        assert!(!c.is_platform_uri(input), "{input}");
        assert!(!c.is_universal_tracking_link(input), "{input}");
    }
}

// ── Payload links ─────────────────────────────────────────────────

#[test]
fn tracking_link_in_platform_payload() {
    let payload = marked(&[("url", "https://trk.klviyomail.com/abc")]);
    assert_eq!(
        classifier().tracking_link_in(&payload),
        Some(Url::parse("https://trk.klviyomail.com/abc").unwrap())
    );
}

#[test]
fn plain_deep_link_is_not_a_tracking_link() {
    let payload = marked(&[("url", "myapp://product/42")]);
    assert_eq!(classifier().tracking_link_in(&payload), None);
}

// ── Configuration ─────────────────────────────────────────────────

#[test]
fn custom_tracking_domains() {
    let c = MessageClassifier::new(LinkingConfig {
        tracking_domains: vec!["click.brand.example".into()],
        tracking_path_prefix: String::new(),
        allowed_schemes: vec!["https".into()],
    });
    assert!(c.is_universal_tracking_link("https://click.brand.example/abc"));
    assert!(!c.is_universal_tracking_link("https://trk.klviyomail.com/abc"));
    assert!(!c.is_universal_tracking_link("http://click.brand.example/abc"));
    assert!(!c.is_universal_tracking_link("https://other.example/u/abc"));
}

#[test]
fn default_config_values() {
    let config = LinkingConfig::default();
    assert_eq!(config.tracking_domains, vec!["klviyomail.com"]);
    assert_eq!(config.tracking_path_prefix, "/u/");
    assert_eq!(config.allowed_schemes, vec!["https", "http"]);
}

#[test]
fn config_fields_default_when_missing() {
    let config: LinkingConfig =
        serde_json::from_str(r#"{"tracking_domains": ["a.example"]}"#).unwrap();
    assert_eq!(config.tracking_domains, vec!["a.example"]);
    assert_eq!(config.tracking_path_prefix, "/u/");
}

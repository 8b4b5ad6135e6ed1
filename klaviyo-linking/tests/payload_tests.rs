use klaviyo_linking::{PayloadSource, PushPayload, Url};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;

fn full_payload() -> PushPayload {
    PushPayload::from_remote_data([
        ("_k", "{\"m\":\"1\"}"),
        ("title", "Flash sale"),
        ("body", "50% off today"),
        ("url", "https://trk.klviyomail.com/u/abc"),
        ("image_url", "https://cdn.example.com/img.png"),
        ("notification_tag", "sale"),
        ("notification_count", "3"),
        ("key_value_pairs", r#"{"promo":"SPRING","tier":2}"#),
    ])
}

// ── Remote data ───────────────────────────────────────────────────

#[test]
fn remote_data_accessors() {
    let payload = full_payload();
    assert_eq!(payload.source(), PayloadSource::RemoteData);
    assert!(payload.has_marker());
    assert_eq!(payload.title(), Some("Flash sale"));
    assert_eq!(payload.body(), Some("50% off today"));
    assert_eq!(
        payload.deep_link(),
        Some(Url::parse("https://trk.klviyomail.com/u/abc").unwrap())
    );
    assert_eq!(
        payload.image_url().map(|u| u.to_string()),
        Some("https://cdn.example.com/img.png".to_string())
    );
    assert_eq!(payload.notification_tag(), Some("sale"));
    assert_eq!(payload.notification_count(), 3);
}

#[test]
fn remote_marker_counts_even_when_empty() {
    assert!(PushPayload::from_remote_data([("_k", "")]).has_marker());
}

#[test]
fn notification_count_defaults_to_one() {
    assert_eq!(PushPayload::from_remote_data([("_k", "x")]).notification_count(), 1);
    assert_eq!(
        PushPayload::from_remote_data([("notification_count", "lots")]).notification_count(),
        1
    );
}

#[test]
fn unparseable_urls_are_absent() {
    let payload = PushPayload::from_remote_data([("url", "not a url"), ("image_url", "")]);
    assert_eq!(payload.deep_link(), None);
    assert_eq!(payload.image_url(), None);
}

#[test]
fn key_value_pairs_parse() {
    let pairs = full_payload().key_value_pairs().unwrap();
    let expected: BTreeMap<String, String> = [
        ("promo".to_string(), "SPRING".to_string()),
        ("tier".to_string(), "2".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn malformed_key_value_pairs_are_none() {
    let payload = PushPayload::from_remote_data([("key_value_pairs", "{oops")]);
    assert_eq!(payload.key_value_pairs(), None);
    assert_eq!(PushPayload::from_remote_data([("_k", "")]).key_value_pairs(), None);
}

// ── Intent extras ─────────────────────────────────────────────────

#[test]
fn intent_extras_strip_namespace_and_drop_foreign_keys() {
    let payload = PushPayload::from_intent_extras([
        ("com.klaviyo._k", "abc"),
        ("com.klaviyo.title", "Hello"),
        ("android.intent.extra.TEXT", "ignored"),
    ]);
    assert_eq!(payload.source(), PayloadSource::IntentExtras);
    assert!(payload.has_marker());
    assert_eq!(payload.title(), Some("Hello"));
    assert_eq!(payload.get("android.intent.extra.TEXT"), None);
    assert_eq!(payload.iter().count(), 2);
}

#[test]
fn intent_marker_must_be_non_empty() {
    let payload = PushPayload::from_intent_extras([("com.klaviyo._k", "")]);
    assert!(!payload.has_marker());
    let payload = PushPayload::from_intent_extras([("_k", "abc")]);
    assert!(!payload.has_marker());
}

#[test]
fn intent_extras_roundtrip() {
    let payload = full_payload();
    let extras = payload.to_intent_extras();
    assert_eq!(extras.get("com.klaviyo.title").map(String::as_str), Some("Flash sale"));
    let reopened = PushPayload::from_intent_extras(extras);
    assert!(reopened.has_marker());
    assert_eq!(reopened.iter().collect::<Vec<_>>(), payload.iter().collect::<Vec<_>>());
}

// ── JSON ──────────────────────────────────────────────────────────

#[test]
fn from_json_stringifies_values() {
    let payload = PushPayload::from_json(&json!({"_k": "x", "notification_count": 5})).unwrap();
    assert!(payload.has_marker());
    assert_eq!(payload.get("notification_count"), Some("5"));
    assert_eq!(payload.notification_count(), 5);
}

#[test]
fn from_json_rejects_non_objects() {
    assert!(PushPayload::from_json(&json!(["_k"])).is_err());
    assert!(PushPayload::from_json(&json!(null)).is_err());
    assert!(PushPayload::from_json_str("{").is_err());
    assert!(PushPayload::from_json_str("{}").unwrap().is_empty());
}

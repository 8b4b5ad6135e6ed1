//! Property-based tests for identifier validation in the SDK context.
//!
//! - Stored identifiers are always trimmed and never empty
//! - Re-setting an unchanged identifier never enqueues another update

use klaviyo_sdk::transport::mock::RecordingTransport;
use klaviyo_sdk::{Klaviyo, SdkConfig};
use proptest::prelude::*;
use std::sync::Arc;

fn padded() -> impl Strategy<Value = String> {
    ("[ \t]{0,3}", "[a-z0-9@.+]{0,12}", "[ \t]{0,3}")
        .prop_map(|(l, core, r)| format!("{l}{core}{r}"))
}

proptest! {
    #[test]
    fn stored_email_is_trimmed(inputs in prop::collection::vec(padded(), 1..8)) {
        let transport = RecordingTransport::new();
        let klaviyo = Klaviyo::new(SdkConfig::default(), Arc::new(transport.clone()));
        for input in &inputs {
            klaviyo.set_email(input);
        }

        let expected = inputs.iter().rev().map(|s| s.trim()).find(|s| !s.is_empty());
        let stored = klaviyo.email();
        prop_assert_eq!(stored.as_deref(), expected);
        if let Some(email) = klaviyo.email() {
            prop_assert_eq!(email.trim(), email.as_str());
        }
    }

    #[test]
    fn repeating_an_identifier_is_idempotent(email in "[a-z]{1,8}@example\\.com") {
        let transport = RecordingTransport::new();
        let klaviyo = Klaviyo::new(SdkConfig::default(), Arc::new(transport.clone()));
        klaviyo.set_email(&email);
        let after_first = transport.len();
        klaviyo.set_email(&email).set_email(&format!(" {email} "));
        prop_assert_eq!(transport.len(), after_first);
    }
}

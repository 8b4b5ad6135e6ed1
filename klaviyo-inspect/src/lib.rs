//! Classification reports printed by `klaviyo-inspect`.

use klaviyo_linking::{
    DeepLinkRegistry, Inbound, LinkDispatcher, LinkingConfig, MessageClassifier, PushPayload,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UriReport {
    pub uri: String,
    pub platform: bool,
    pub universal_tracking_link: bool,
    pub outcome: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PushReport {
    pub platform: bool,
    pub notification: bool,
    pub title: Option<String>,
    pub body: Option<String>,
    pub deep_link: Option<String>,
    pub tracking_link: Option<String>,
    pub notification_count: u32,
    pub outcome: String,
}

/// Classifies `uri` and reports what dispatching it with no handler
/// registered would do.
pub fn inspect_uri(config: &LinkingConfig, uri: &str) -> UriReport {
    let dispatcher = dispatcher(config);
    let classifier = dispatcher.classifier();
    UriReport {
        uri: uri.to_string(),
        platform: classifier.is_platform_uri(uri),
        universal_tracking_link: classifier.is_universal_tracking_link(uri),
        outcome: dispatcher.dispatch(&Inbound::uri(uri)).to_string(),
    }
}

/// Parses a push payload from JSON and classifies it.
pub fn inspect_push(config: &LinkingConfig, json: &str) -> klaviyo_types::Result<PushReport> {
    let payload = PushPayload::from_json_str(json)?;
    let dispatcher = dispatcher(config);
    let classifier = dispatcher.classifier();
    Ok(PushReport {
        platform: classifier.is_platform_payload(&payload),
        notification: classifier.is_notification(&payload),
        title: payload.title().map(str::to_owned),
        body: payload.body().map(str::to_owned),
        deep_link: payload.deep_link().map(|url| url.to_string()),
        tracking_link: classifier.tracking_link_in(&payload).map(|url| url.to_string()),
        notification_count: payload.notification_count(),
        outcome: dispatcher.dispatch(&Inbound::push(payload)).to_string(),
    })
}

fn dispatcher(config: &LinkingConfig) -> LinkDispatcher {
    LinkDispatcher::new(
        MessageClassifier::new(config.clone()),
        Arc::new(DeepLinkRegistry::new()),
    )
}

//! Push payloads as delivered by the platform.
//!
//! The same notification reaches the app twice: once as raw remote data
//! when the push arrives, and again as intent extras when the user taps it.
//! Extras carry every data key under [`INTENT_EXTRA_PREFIX`]. Both forms are
//! normalised to un-prefixed keys here.

use klaviyo_types::{Error, Map, Result, Value};
use std::collections::BTreeMap;
use url::Url;

/// Data key whose presence marks a payload as Klaviyo's.
pub const MARKER_KEY: &str = "_k";

/// Namespace prefix for data keys copied onto a notification-tap intent.
pub const INTENT_EXTRA_PREFIX: &str = "com.klaviyo.";

const TITLE_KEY: &str = "title";
const BODY_KEY: &str = "body";
const URL_KEY: &str = "url";
const IMAGE_KEY: &str = "image_url";
const NOTIFICATION_TAG_KEY: &str = "notification_tag";
const NOTIFICATION_COUNT_KEY: &str = "notification_count";
const KEY_VALUE_PAIRS_KEY: &str = "key_value_pairs";

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// Raw data of a received push.
    RemoteData,
    /// Extras of the intent that opened the app from a notification.
    IntentExtras,
}

/// A push payload with un-namespaced string data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPayload {
    source: PayloadSource,
    data: BTreeMap<String, String>,
}

impl PushPayload {
    /// Wraps the data map of a received push.
    pub fn from_remote_data<I, K, V>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: PayloadSource::RemoteData,
            data: data.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Keeps the `com.klaviyo.`-namespaced extras of a notification-tap
    /// intent, with the prefix stripped. Other extras are dropped.
    pub fn from_intent_extras<I, K, V>(extras: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let data = extras
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(INTENT_EXTRA_PREFIX)
                    .map(|name| (name.to_owned(), value.into()))
            })
            .collect();
        Self {
            source: PayloadSource::IntentExtras,
            data,
        }
    }

    /// Parses remote data from a JSON object. Non-string values are kept in
    /// their JSON text form.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_remote_data(
                map.iter().map(|(k, v)| (k.clone(), json_text(v))),
            )),
            Value::Null => Err(Error::NotAnObject("null")),
            Value::Array(_) => Err(Error::NotAnObject("an array")),
            _ => Err(Error::NotAnObject("a scalar")),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    #[must_use]
    pub fn source(&self) -> PayloadSource {
        self.source
    }

    /// Whether the Klaviyo marker is present. Intent extras only count with
    /// a non-empty marker value.
    #[must_use]
    pub fn has_marker(&self) -> bool {
        match self.source {
            PayloadSource::RemoteData => self.data.contains_key(MARKER_KEY),
            PayloadSource::IntentExtras => {
                self.data.get(MARKER_KEY).is_some_and(|v| !v.is_empty())
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Every data entry, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get(TITLE_KEY)
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.get(BODY_KEY)
    }

    /// The deep link carried in the `url` field, if it parses.
    #[must_use]
    pub fn deep_link(&self) -> Option<Url> {
        self.parsed_url(URL_KEY)
    }

    #[must_use]
    pub fn image_url(&self) -> Option<Url> {
        self.parsed_url(IMAGE_KEY)
    }

    /// Collapses notifications that share a tag.
    #[must_use]
    pub fn notification_tag(&self) -> Option<&str> {
        self.get(NOTIFICATION_TAG_KEY)
    }

    /// Badge count, defaulting to one when absent or not a number.
    #[must_use]
    pub fn notification_count(&self) -> u32 {
        self.get(NOTIFICATION_COUNT_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1)
    }

    /// Custom key/value pairs sent as a JSON object of strings.
    ///
    /// Returns `None` when absent or malformed; non-string members are kept
    /// in their JSON text form.
    #[must_use]
    pub fn key_value_pairs(&self) -> Option<BTreeMap<String, String>> {
        let raw = self.get(KEY_VALUE_PAIRS_KEY)?;
        match serde_json::from_str::<Map<String, Value>>(raw) {
            Ok(map) => Some(map.iter().map(|(k, v)| (k.clone(), json_text(v))).collect()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse key_value_pairs");
                None
            }
        }
    }

    /// The intent extras a notification built from this payload would carry.
    #[must_use]
    pub fn to_intent_extras(&self) -> BTreeMap<String, String> {
        self.data
            .iter()
            .map(|(k, v)| (format!("{INTENT_EXTRA_PREFIX}{k}"), v.clone()))
            .collect()
    }

    fn parsed_url(&self, key: &str) -> Option<Url> {
        let raw = self.get(key)?;
        match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::debug!(field = key, error = %err, "ignoring unparseable url");
                None
            }
        }
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

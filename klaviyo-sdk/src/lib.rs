//! Client context for the Klaviyo SDK core.
//!
//! The host builds one [`Klaviyo`] from an [`SdkConfig`] and a [`Transport`]
//! and shares it by reference. It tracks the current profile and push token,
//! turns opened pushes into `$opened_push` events, and routes tracking links
//! to the registered deep link handler.

mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod transport;

pub use client::Klaviyo;
pub use config::SdkConfig;
pub use error::{SdkError, SdkResult};
pub use transport::Transport;

pub use klaviyo_linking::{DeepLinkHandler, DispatchOutcome, Inbound, LinkingConfig, PushPayload};
pub use klaviyo_model::{Event, Profile};
pub use klaviyo_types::{AttributeKey, EventKey, MetricName, ProfileKey, SessionTimeout, Value};

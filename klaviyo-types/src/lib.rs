//! Core type definitions for the Klaviyo client.
//!
//! This crate defines the key/value discipline shared by every other crate:
//! - Attribute keys for profiles, events and metric names, each a closed set
//!   of well-known names plus an open `Custom` case
//! - [`AttributeBag`], the ordered key → [`Value`] store behind profiles and events
//! - Anonymous profile identifiers and event timestamps
//! - [`SessionTimeout`], the session length consumed by lifecycle collaborators
//!
//! Nothing here performs I/O. Wire encoding stops at a JSON object; batching
//! and delivery belong to the transport.

mod bag;
mod ids;
mod keys;
mod timeout;
mod timestamp;

pub use bag::AttributeBag;
pub use ids::AnonymousId;
pub use keys::{AttributeKey, EventKey, MetricName, ProfileKey};
pub use serde_json::{Map, Value};
pub use timeout::SessionTimeout;
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid session timeout: {0}")]
    InvalidSessionTimeout(String),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

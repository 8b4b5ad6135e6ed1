//! Recognising and routing messages that originate from Klaviyo.
//!
//! Inbound push payloads and URIs are first classified by
//! [`MessageClassifier`]. Anything that belongs to the platform is then
//! routed by [`LinkDispatcher`], which hands tracking-link destinations to
//! the handler held in [`DeepLinkRegistry`].
//!
//! Nothing here blocks, spawns threads or performs network I/O. Malformed
//! input is never an error: it simply does not match.

mod classifier;
mod config;
mod dispatcher;
mod payload;
mod registry;

pub use classifier::MessageClassifier;
pub use config::LinkingConfig;
pub use dispatcher::{DispatchOutcome, Inbound, LinkDispatcher};
pub use payload::{INTENT_EXTRA_PREFIX, MARKER_KEY, PayloadSource, PushPayload};
pub use registry::{DeepLinkHandler, DeepLinkRegistry};
pub use url::Url;

use crate::classifier::MessageClassifier;
use crate::payload::PushPayload;
use crate::registry::DeepLinkRegistry;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// One inbound message: a push payload, a URI, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inbound {
    pub payload: Option<PushPayload>,
    pub uri: Option<String>,
}

impl Inbound {
    #[must_use]
    pub fn push(payload: PushPayload) -> Self {
        Self {
            payload: Some(payload),
            uri: None,
        }
    }

    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            payload: None,
            uri: Some(uri.into()),
        }
    }

    /// Attaches a URI delivered alongside the payload.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// Result of dispatching one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// Not Klaviyo's; nothing was done.
    NotHandled,
    /// Klaviyo's, but carries no tracking link.
    HandledNoLink,
    /// A tracking link was recognised but no handler is registered.
    HandledNoCallback,
    /// The registered handler received the destination.
    HandledWithCallback,
}

impl DispatchOutcome {
    /// Whether the message belonged to the platform.
    #[must_use]
    pub fn is_handled(self) -> bool {
        self != Self::NotHandled
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotHandled => "NOT_HANDLED",
            Self::HandledNoLink => "HANDLED_NO_LINK",
            Self::HandledNoCallback => "HANDLED_NO_CALLBACK",
            Self::HandledWithCallback => "HANDLED_WITH_CALLBACK",
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes classified messages to the registered deep link handler.
///
/// Each dispatch runs to completion in one pass. When a payload is present
/// its marker alone decides platform membership; a URI-only message is
/// judged by the URI. A panicking handler unwinds through `dispatch`.
#[derive(Debug, Clone)]
pub struct LinkDispatcher {
    classifier: MessageClassifier,
    registry: Arc<DeepLinkRegistry>,
}

impl LinkDispatcher {
    #[must_use]
    pub fn new(classifier: MessageClassifier, registry: Arc<DeepLinkRegistry>) -> Self {
        Self {
            classifier,
            registry,
        }
    }

    #[must_use]
    pub fn classifier(&self) -> &MessageClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<DeepLinkRegistry> {
        &self.registry
    }

    pub fn dispatch(&self, inbound: &Inbound) -> DispatchOutcome {
        let outcome = match self.tracking_link(inbound) {
            None => DispatchOutcome::NotHandled,
            Some(None) => DispatchOutcome::HandledNoLink,
            Some(Some(link)) => self.deliver(&link),
        };
        tracing::debug!(%outcome, "dispatched inbound message");
        outcome
    }

    /// `None` when the message is not Klaviyo's, otherwise the tracking
    /// link it carries, if any.
    fn tracking_link(&self, inbound: &Inbound) -> Option<Option<Url>> {
        let uri = inbound.uri.as_deref().and_then(|raw| Url::parse(raw).ok());
        let uri_link = uri.as_ref().filter(|url| self.classifier.is_tracking_url(url)).cloned();

        match &inbound.payload {
            Some(payload) => {
                if !self.classifier.is_platform_payload(payload) {
                    return None;
                }
                Some(uri_link.or_else(|| self.classifier.tracking_link_in(payload)))
            }
            None => {
                let url = uri?;
                if !self.classifier.is_platform_url(&url) {
                    return None;
                }
                Some(uri_link)
            }
        }
    }

    fn deliver(&self, link: &Url) -> DispatchOutcome {
        let destination = resolve(link);
        match self.registry.current() {
            Some(handler) => {
                tracing::info!(url = %destination, "invoking deep link handler");
                handler.handle(&destination);
                DispatchOutcome::HandledWithCallback
            }
            None => {
                tracing::info!(url = %destination, "no deep link handler registered");
                DispatchOutcome::HandledNoCallback
            }
        }
    }
}

/// Short-link resolution happens outside this crate; the tracking URL is
/// handed over as is.
fn resolve(link: &Url) -> Url {
    link.clone()
}

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use url::Url;

/// Host callback receiving the destination of a Klaviyo link.
///
/// Any `Fn(&Url) + Send + Sync` closure is a handler.
pub trait DeepLinkHandler: Send + Sync {
    fn handle(&self, url: &Url);
}

impl<F> DeepLinkHandler for F
where
    F: Fn(&Url) + Send + Sync,
{
    fn handle(&self, url: &Url) {
        self(url)
    }
}

/// Holds at most one deep link handler.
///
/// Register, unregister and lookup are atomic with respect to each other.
/// A lookup returns a clone of the handler so it can be invoked without
/// holding the lock; a dispatch racing a registration therefore uses
/// exactly one of the two handlers.
#[derive(Default)]
pub struct DeepLinkRegistry {
    slot: RwLock<Option<Arc<dyn DeepLinkHandler>>>,
}

impl DeepLinkRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler`, replacing any previous one.
    pub fn register<H: DeepLinkHandler + 'static>(&self, handler: H) {
        self.register_shared(Arc::new(handler));
    }

    pub fn register_shared(&self, handler: Arc<dyn DeepLinkHandler>) {
        let replaced = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handler)
            .is_some();
        tracing::debug!(replaced, "deep link handler registered");
    }

    /// Removes the handler. Returns whether one was registered.
    pub fn unregister(&self) -> bool {
        let removed = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        tracing::debug!(removed, "deep link handler unregistered");
        removed
    }

    #[must_use]
    pub fn current(&self) -> Option<Arc<dyn DeepLinkHandler>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for DeepLinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepLinkRegistry")
            .field("registered", &self.is_registered())
            .finish()
    }
}

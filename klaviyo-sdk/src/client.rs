use crate::config::SdkConfig;
use crate::transport::Transport;
use klaviyo_linking::{
    DeepLinkHandler, DeepLinkRegistry, DispatchOutcome, Inbound, LinkDispatcher,
    MessageClassifier, PushPayload,
};
use klaviyo_model::{Event, Profile};
use klaviyo_types::{
    AnonymousId, AttributeKey, EventKey, MetricName, ProfileKey, SessionTimeout, Value,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

#[derive(Debug)]
struct State {
    profile: Profile,
    push_token: Option<String>,
}

/// The SDK context: current profile, push token and deep link routing.
///
/// All methods take `&self`; profile state sits behind a mutex so the
/// context can be shared across threads. The lock is never held while the
/// transport or a deep link handler runs, so either may call back into the
/// context.
pub struct Klaviyo {
    config: SdkConfig,
    transport: Arc<dyn Transport>,
    state: Mutex<State>,
    dispatcher: LinkDispatcher,
}

impl Klaviyo {
    pub fn new(config: SdkConfig, transport: Arc<dyn Transport>) -> Self {
        let classifier = MessageClassifier::new(config.linking.clone());
        let dispatcher = LinkDispatcher::new(classifier, Arc::new(DeepLinkRegistry::new()));
        let profile = Profile::new();
        info!(
            anonymous_id = %profile.anonymous_id(),
            session_timeout = %config.session_timeout,
            "Klaviyo SDK initialized"
        );
        Self {
            config,
            transport,
            state: Mutex::new(State {
                profile,
                push_token: None,
            }),
            dispatcher,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    #[must_use]
    pub fn session_timeout(&self) -> SessionTimeout {
        self.config.session_timeout
    }

    #[must_use]
    pub fn classifier(&self) -> &MessageClassifier {
        self.dispatcher.classifier()
    }

    // ── Profile ───────────────────────────────────────────────────

    /// Replaces the tracked profile.
    ///
    /// An identified profile is reset first; an anonymous one is merged
    /// into. Identifiers go through the same validation as
    /// [`Klaviyo::set_email`] and friends.
    pub fn set_profile(&self, profile: Profile) -> &Self {
        if self.state().profile.is_identified() {
            self.reset_profile();
        }

        let identifiers = [
            (ProfileKey::ExternalId, profile.external_id()),
            (ProfileKey::Email, profile.email()),
            (ProfileKey::PhoneNumber, profile.phone_number()),
        ];
        for (key, value) in identifiers {
            if let Some(value) = value {
                self.set_profile_attribute(key, value);
            }
        }

        if !profile.properties().is_empty() {
            let snapshot = {
                let mut state = self.state();
                for (key, value) in profile.properties().iter() {
                    state.profile.set_property(key.clone(), value.clone());
                }
                state.profile.clone()
            };
            self.transport.enqueue_profile(&snapshot);
        }
        self
    }

    /// A copy of the tracked profile.
    #[must_use]
    pub fn profile(&self) -> Profile {
        self.state().profile.clone()
    }

    pub fn set_email(&self, email: &str) -> &Self {
        self.set_profile_attribute(ProfileKey::Email, email)
    }

    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.state().profile.email().map(str::to_owned)
    }

    pub fn set_phone_number(&self, phone_number: &str) -> &Self {
        self.set_profile_attribute(ProfileKey::PhoneNumber, phone_number)
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<String> {
        self.state().profile.phone_number().map(str::to_owned)
    }

    pub fn set_external_id(&self, external_id: &str) -> &Self {
        self.set_profile_attribute(ProfileKey::ExternalId, external_id)
    }

    #[must_use]
    pub fn external_id(&self) -> Option<String> {
        self.state().profile.external_id().map(str::to_owned)
    }

    #[must_use]
    pub fn anonymous_id(&self) -> AnonymousId {
        self.state().profile.anonymous_id()
    }

    /// Sets one attribute on the tracked profile.
    ///
    /// Identifier values are trimmed. Empty identifiers are ignored with a
    /// warning (use [`Klaviyo::reset_profile`] to clear them) and unchanged
    /// ones are ignored. The anonymous id cannot be set from outside.
    pub fn set_profile_attribute(&self, key: ProfileKey, value: impl Into<Value>) -> &Self {
        let value = value.into();
        let snapshot = {
            let mut state = self.state();
            match key {
                ProfileKey::AnonymousId => {
                    warn!("anonymous_id is managed by the SDK, the update will be ignored");
                    None
                }
                ProfileKey::ExternalId | ProfileKey::Email | ProfileKey::PhoneNumber => {
                    update_identifier(&mut state.profile, key, &value)
                }
                key => {
                    state.profile.set_property(key, value);
                    Some(state.profile.clone())
                }
            }
        };
        if let Some(profile) = snapshot {
            self.transport.enqueue_profile(&profile);
        }
        self
    }

    /// Clears identifiers, attributes and the push token and starts a new
    /// anonymous profile.
    ///
    /// A push token has to be set again to associate the device with the
    /// new profile.
    pub fn reset_profile(&self) -> &Self {
        let mut state = self.state();
        state.profile.reset();
        state.push_token = None;
        info!(anonymous_id = %state.profile.anonymous_id(), "profile reset");
        self
    }

    // ── Push token ────────────────────────────────────────────────

    pub fn set_push_token(&self, token: &str) -> &Self {
        let token = token.trim();
        if token.is_empty() {
            warn!("empty push token will be ignored");
            return self;
        }
        let snapshot = {
            let mut state = self.state();
            if state.push_token.as_deref() == Some(token) {
                info!("push token unchanged, the update will be ignored");
                None
            } else {
                state.push_token = Some(token.to_owned());
                Some(state.profile.clone())
            }
        };
        if let Some(profile) = snapshot {
            self.transport.enqueue_push_token(token, &profile);
        }
        self
    }

    #[must_use]
    pub fn push_token(&self) -> Option<String> {
        self.state().push_token.clone()
    }

    // ── Events ────────────────────────────────────────────────────

    /// Enqueues `event` for the tracked profile.
    pub fn create_event(&self, event: Event) -> &Self {
        let profile = self.profile();
        debug!(metric = %event.metric(), "enqueuing event");
        self.transport.enqueue_event(&event, &profile);
        self
    }

    /// Enqueues an event with only a metric and optional value.
    pub fn create_metric(&self, metric: MetricName, value: Option<f64>) -> &Self {
        let mut event = Event::new(metric);
        if let Some(value) = value {
            event.set_value(value);
        }
        self.create_event(event)
    }

    /// Records the opening of a push notification and routes its link.
    ///
    /// Payloads without the Klaviyo marker are ignored. Otherwise an
    /// `$opened_push` event carrying every payload field and the current
    /// push token is enqueued before the payload is dispatched.
    pub fn handle_push(&self, payload: &PushPayload) -> DispatchOutcome {
        if !self.classifier().is_platform_payload(payload) {
            debug!("non-Klaviyo push ignored");
            return DispatchOutcome::NotHandled;
        }

        let mut event = Event::new(MetricName::OpenedPush);
        for (key, value) in payload.iter() {
            event.set_property(EventKey::custom(key), value);
        }
        if let Some(token) = self.push_token() {
            event.set_property(EventKey::PushToken, token);
        }
        self.create_event(event);

        self.dispatcher.dispatch(&Inbound::push(payload.clone()))
    }

    // ── Deep links ────────────────────────────────────────────────

    /// Routes a universal tracking link to the deep link handler.
    ///
    /// Returns false, without dispatching, when `uri` is not a Klaviyo
    /// tracking link.
    pub fn handle_universal_tracking_link(&self, uri: &str) -> bool {
        if !self.classifier().is_universal_tracking_link(uri) {
            error!(uri = %uri, "not a Klaviyo universal tracking URI");
            return false;
        }
        self.dispatcher.dispatch(&Inbound::uri(uri));
        true
    }

    /// Classifies and routes an arbitrary inbound message.
    pub fn dispatch(&self, inbound: &Inbound) -> DispatchOutcome {
        self.dispatcher.dispatch(inbound)
    }

    pub fn register_deep_link_handler<H: DeepLinkHandler + 'static>(&self, handler: H) -> &Self {
        self.dispatcher.registry().register(handler);
        self
    }

    pub fn unregister_deep_link_handler(&self) -> &Self {
        self.dispatcher.registry().unregister();
        self
    }

    #[must_use]
    pub fn is_deep_link_handler_registered(&self) -> bool {
        self.dispatcher.registry().is_registered()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Applies a validated identifier change, returning the profile snapshot to
/// enqueue when something changed.
fn update_identifier(profile: &mut Profile, key: ProfileKey, value: &Value) -> Option<Profile> {
    let raw = match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        warn!(
            key = %key,
            "empty identifier will be ignored, use reset_profile to clear identifiers"
        );
        return None;
    }
    if profile.property(&key).as_ref().and_then(Value::as_str) == Some(trimmed) {
        info!(key = %key, "identifier unchanged, the update will be ignored");
        return None;
    }
    profile.set_property(key, trimmed);
    Some(profile.clone())
}

impl std::fmt::Debug for Klaviyo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Klaviyo")
            .field("config", &self.config)
            .field("state", &*self.state())
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

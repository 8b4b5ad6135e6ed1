//! The seam to the request queue that delivers profiles and events.
//!
//! Serialization, batching, retry and persistence all live behind
//! [`Transport`]; this crate only decides what to enqueue.

use klaviyo_model::{Event, Profile};

/// Accepts finished profiles and events.
///
/// Every call carries a snapshot of the profile the data belongs to.
pub trait Transport: Send + Sync {
    /// Profile identifiers or attributes changed.
    fn enqueue_profile(&self, profile: &Profile);

    /// An event occurred for `profile`.
    fn enqueue_event(&self, event: &Event, profile: &Profile);

    /// A push token was assigned to `profile`.
    fn enqueue_push_token(&self, token: &str, profile: &Profile);
}

/// A transport that drops everything. Useful before a real queue exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn enqueue_profile(&self, _profile: &Profile) {}

    fn enqueue_event(&self, _event: &Event, _profile: &Profile) {}

    fn enqueue_push_token(&self, _token: &str, _profile: &Profile) {}
}

pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// One enqueued request.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Enqueued {
        Profile(Profile),
        Event { event: Event, profile: Profile },
        PushToken { token: String, profile: Profile },
    }

    /// A transport that records every request in order.
    ///
    /// Clones share the same queue, so a test can keep one handle and give
    /// the other to the SDK.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingTransport {
        queue: Arc<Mutex<VecDeque<Enqueued>>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Takes the oldest recorded request.
        pub fn take_next(&self) -> Option<Enqueued> {
            self.queue().pop_front()
        }

        /// Takes every recorded request.
        pub fn drain(&self) -> Vec<Enqueued> {
            self.queue().drain(..).collect()
        }

        /// Recorded events, oldest first, without removing them.
        pub fn events(&self) -> Vec<Event> {
            self.queue()
                .iter()
                .filter_map(|entry| match entry {
                    Enqueued::Event { event, .. } => Some(event.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn len(&self) -> usize {
            self.queue().len()
        }

        pub fn is_empty(&self) -> bool {
            self.queue().is_empty()
        }

        fn queue(&self) -> MutexGuard<'_, VecDeque<Enqueued>> {
            self.queue.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn push(&self, entry: Enqueued) {
            self.queue().push_back(entry);
        }
    }

    impl Transport for RecordingTransport {
        fn enqueue_profile(&self, profile: &Profile) {
            self.push(Enqueued::Profile(profile.clone()));
        }

        fn enqueue_event(&self, event: &Event, profile: &Profile) {
            self.push(Enqueued::Event {
                event: event.clone(),
                profile: profile.clone(),
            });
        }

        fn enqueue_push_token(&self, token: &str, profile: &Profile) {
            self.push(Enqueued::PushToken {
                token: token.to_owned(),
                profile: profile.clone(),
            });
        }
    }
}

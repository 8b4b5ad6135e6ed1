//! Profile and event builders for the Klaviyo client.
//!
//! - [`Profile`]: identity of the current user plus free-form attributes
//! - [`Event`]: one occurrence of a metric, with optional value and dedup id
//!
//! Both are plain owned values mutated through `&mut self` setters that return
//! `&mut Self` for chaining. Neither type synchronizes internally: share one
//! across threads behind a lock (the SDK context keeps its profile in a
//! `Mutex`). Both expose a wire map, the JSON object a transport serializes.

mod event;
mod profile;

pub use event::Event;
pub use profile::Profile;

use klaviyo_types::Value;

/// Coerces a property value into an optional string slot.
///
/// `null` clears the slot; strings are kept verbatim; anything else is
/// stored in its JSON text form (`0` becomes `"0"`).
pub(crate) fn string_slot(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

//! Attribute key namespaces.
//!
//! Every key space is a closed vocabulary of names recognised by the Klaviyo
//! APIs plus one open `Custom(name)` case:
//!
//! - [`ProfileKey`]: profile attributes (identifiers, personal and location data)
//! - [`EventKey`]: reserved event properties
//! - [`MetricName`]: metric identity of an event
//!
//! Fixed variants are unit variants, so two references to the same variant are
//! always equal. Custom keys compare by their name string. A custom key that
//! happens to spell a reserved name (`ProfileKey::custom("email")`) is still a
//! different key from the fixed one: nothing here coerces strings into fixed
//! variants except [`AttributeKey::from_name`], which exists for decoding wire
//! maps.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Behaviour shared by all attribute key namespaces.
pub trait AttributeKey: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The wire-format name of this key.
    fn name(&self) -> &str;

    /// Creates an open, name-valued key. Never resolves to a fixed variant.
    fn custom(name: impl Into<String>) -> Self;

    /// Resolves a wire name, preferring the fixed vocabulary.
    fn from_name(name: &str) -> Self;

    /// Returns true for the `Custom` case.
    fn is_custom(&self) -> bool;

    /// The complete fixed vocabulary of this namespace.
    fn fixed() -> &'static [Self];

    /// Returns true for a custom key spelling a name from the fixed
    /// vocabulary. Such keys have no wire representation.
    fn shadows_fixed(&self) -> bool {
        self.is_custom() && Self::fixed().iter().any(|fixed| fixed.name() == self.name())
    }
}

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A key outside the fixed vocabulary, equal to another custom key
            /// iff the names are equal.
            Custom(String),
        }

        impl AttributeKey for $name {
            fn name(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Custom(name) => name.as_str(),
                }
            }

            fn custom(name: impl Into<String>) -> Self {
                Self::Custom(name.into())
            }

            fn from_name(name: &str) -> Self {
                match name {
                    $( $wire => Self::$variant, )+
                    other => Self::Custom(other.to_owned()),
                }
            }

            fn is_custom(&self) -> bool {
                matches!(self, Self::Custom(_))
            }

            fn fixed() -> &'static [Self] {
                static FIXED: &[$name] = &[ $( $name::$variant, )+ ];
                FIXED
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_str(KeyVisitor::<$name>::new())
            }
        }
    };
}

struct KeyVisitor<K>(std::marker::PhantomData<K>);

impl<K> KeyVisitor<K> {
    fn new() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<K: AttributeKey> Visitor<'_> for KeyVisitor<K> {
    type Value = K;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an attribute key name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<K, E> {
        Ok(K::from_name(v))
    }
}

keyword_enum! {
    /// Profile attributes recognised by the Klaviyo APIs.
    ///
    /// Identifiers should be set through the dedicated profile setters rather
    /// than as generic properties.
    pub enum ProfileKey {
        // Identifiers
        ExternalId => "external_id",
        Email => "email",
        PhoneNumber => "phone_number",
        AnonymousId => "anonymous_id",

        // Push
        PushToken => "push_token",
        PushState => "push_state",

        // Personal information
        FirstName => "first_name",
        LastName => "last_name",
        Organization => "organization",
        Title => "title",
        Image => "image",

        // Location
        Address1 => "address1",
        Address2 => "address2",
        City => "city",
        Country => "country",
        Latitude => "latitude",
        Longitude => "longitude",
        Region => "region",
        Zip => "zip",
        Timezone => "timezone",
    }
}

static IDENTIFIERS: &[ProfileKey] = &[
    ProfileKey::ExternalId,
    ProfileKey::Email,
    ProfileKey::PhoneNumber,
    ProfileKey::AnonymousId,
];

impl ProfileKey {
    /// Keys that identify a profile to the backend, as opposed to free-form
    /// properties.
    #[must_use]
    pub fn identifiers() -> &'static [ProfileKey] {
        IDENTIFIERS
    }

    /// Returns true if this is one of [`ProfileKey::identifiers`].
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        IDENTIFIERS.contains(self)
    }
}

keyword_enum! {
    /// Event properties with a reserved meaning.
    pub enum EventKey {
        /// Client-supplied deduplication token.
        EventId => "$event_id",
        /// Monetary or numeric value of the event.
        Value => "$value",
        /// Device token appended to opened-push events.
        PushToken => "push_token",
        /// Enqueue time, stamped by the transport.
        Time => "_time",
    }
}

keyword_enum! {
    /// Metric names understood by Klaviyo out of the box.
    pub enum MetricName {
        /// Recorded by the client when a notification is opened.
        OpenedPush => "$opened_push",
        OpenedApp => "Opened App",
        ViewedProduct => "Viewed Product",
        AddedToCart => "Added to Cart",
        StartedCheckout => "Started Checkout",
    }
}

use crate::string_slot;
use klaviyo_types::{AnonymousId, AttributeBag, Map, ProfileKey, Result, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The user a device reports activity for.
///
/// Identifiers live in dedicated slots rather than the property bag, so
/// setting an email through [`Profile::set_email`] or through
/// `set_property(ProfileKey::Email, ..)` updates the same field. The
/// [`Profile::attributes`] view merges both for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    external_id: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    anonymous_id: AnonymousId,
    properties: AttributeBag<ProfileKey>,
}

impl Profile {
    /// An anonymous profile with a fresh anonymous id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            external_id: None,
            email: None,
            phone_number: None,
            anonymous_id: AnonymousId::new(),
            properties: AttributeBag::new(),
        }
    }

    /// A profile built from existing identifiers.
    #[must_use]
    pub fn with_identity(
        external_id: Option<String>,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Self {
        Self {
            external_id,
            email,
            phone_number,
            ..Self::new()
        }
    }

    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn clear_external_id(&mut self) -> &mut Self {
        self.external_id = None;
        self
    }

    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = Some(email.into());
        self
    }

    pub fn clear_email(&mut self) -> &mut Self {
        self.email = None;
        self
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) -> &mut Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn clear_phone_number(&mut self) -> &mut Self {
        self.phone_number = None;
        self
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Restores a previously issued anonymous id.
    pub fn set_anonymous_id(&mut self, anonymous_id: AnonymousId) -> &mut Self {
        self.anonymous_id = anonymous_id;
        self
    }

    #[must_use]
    pub fn anonymous_id(&self) -> AnonymousId {
        self.anonymous_id
    }

    /// Sets an attribute.
    ///
    /// The fixed identifier keys route to their slots: `null` clears the
    /// slot and non-string values are stored in their JSON text form. An
    /// anonymous id that does not parse as a UUID is ignored. Every other
    /// key, including a custom key spelling an identifier name, goes to the
    /// property bag.
    pub fn set_property(&mut self, key: ProfileKey, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match key {
            ProfileKey::ExternalId => self.external_id = string_slot(value),
            ProfileKey::Email => self.email = string_slot(value),
            ProfileKey::PhoneNumber => self.phone_number = string_slot(value),
            ProfileKey::AnonymousId => match string_slot(value).map(|s| AnonymousId::parse(&s)) {
                Some(Ok(id)) => self.anonymous_id = id,
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "ignoring anonymous_id that is not a UUID");
                }
                None => tracing::warn!("anonymous_id cannot be cleared, use reset"),
            },
            key => {
                self.properties.set(key, value);
            }
        }
        self
    }

    /// Reads an attribute, identifiers included.
    #[must_use]
    pub fn property(&self, key: &ProfileKey) -> Option<Value> {
        match key {
            ProfileKey::ExternalId => self.external_id.clone().map(Value::String),
            ProfileKey::Email => self.email.clone().map(Value::String),
            ProfileKey::PhoneNumber => self.phone_number.clone().map(Value::String),
            ProfileKey::AnonymousId => Some(Value::String(self.anonymous_id.to_string())),
            key => self.properties.get(key).cloned(),
        }
    }

    /// Removes an attribute. Identifier slots are cleared; the anonymous id
    /// is kept.
    pub fn remove_property(&mut self, key: &ProfileKey) -> &mut Self {
        match key {
            ProfileKey::ExternalId => self.external_id = None,
            ProfileKey::Email => self.email = None,
            ProfileKey::PhoneNumber => self.phone_number = None,
            ProfileKey::AnonymousId => {}
            key => {
                self.properties.remove(key);
            }
        }
        self
    }

    /// Free-form attributes, without identifiers.
    #[must_use]
    pub fn properties(&self) -> &AttributeBag<ProfileKey> {
        &self.properties
    }

    /// Copies `other` into this profile. Identifiers set on `other` replace
    /// ours; its properties override ours key by key. The anonymous id of
    /// `self` is kept.
    pub fn merge(&mut self, other: &Profile) -> &mut Self {
        if let Some(id) = &other.external_id {
            self.external_id = Some(id.clone());
        }
        if let Some(email) = &other.email {
            self.email = Some(email.clone());
        }
        if let Some(phone) = &other.phone_number {
            self.phone_number = Some(phone.clone());
        }
        self.properties.merge(&other.properties);
        self
    }

    /// Forgets the current user: clears identifiers and properties and
    /// issues a new anonymous id.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    /// Whether any of external id, email or phone number is set.
    #[must_use]
    pub fn is_identified(&self) -> bool {
        self.external_id.is_some() || self.email.is_some() || self.phone_number.is_some()
    }

    /// Identifiers followed by properties, as one bag.
    #[must_use]
    pub fn attributes(&self) -> AttributeBag<ProfileKey> {
        let mut bag = AttributeBag::new();
        for key in ProfileKey::identifiers() {
            if let Some(value) = self.property(key) {
                bag.set(key.clone(), value);
            }
        }
        bag.merge(&self.properties);
        bag
    }

    #[must_use]
    pub fn to_wire_map(&self) -> Map<String, Value> {
        self.attributes().to_wire_map()
    }

    /// Rebuilds a profile from a wire map. A missing or malformed
    /// `anonymous_id` yields a fresh one.
    #[must_use]
    pub fn from_wire_map(map: &Map<String, Value>) -> Self {
        Self::from_attributes(AttributeBag::from_wire_map(map))
    }

    /// Like [`Profile::from_wire_map`], for a value that must be an object.
    pub fn from_wire_value(value: &Value) -> Result<Self> {
        AttributeBag::from_wire_value(value).map(Self::from_attributes)
    }

    fn from_attributes(bag: AttributeBag<ProfileKey>) -> Self {
        let mut profile = Self::new();
        for (key, value) in bag.iter() {
            profile.set_property(key.clone(), value.clone());
        }
        profile
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_wire_map(&map))
    }
}

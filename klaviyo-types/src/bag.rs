//! Ordered attribute storage shared by profiles and events.
//!
//! Entries keep their first-insertion order, which is the order they are
//! written to the wire. Equality ignores order: two bags are equal when they
//! hold the same keys mapped to identical values.

use crate::keys::AttributeKey;
use crate::{Error, Map, Result, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// An insertion-ordered map from attribute keys to JSON values.
///
/// `Value::Null` is a real value meaning "present but empty"; use
/// [`AttributeBag::remove`] to drop a key.
#[derive(Clone)]
pub struct AttributeBag<K: AttributeKey> {
    entries: Vec<(K, Value)>,
    index: HashMap<K, usize>,
}

impl<K: AttributeKey> AttributeBag<K> {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Sets `key` to `value`, overwriting any entry for an equal key.
    ///
    /// An overwritten key keeps its original position.
    pub fn set(&mut self, key: K, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
        self
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&Value> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<Value> {
        let slot = self.index.remove(key)?;
        let (_, value) = self.entries.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(value)
    }

    /// Copies every entry of `other` into this bag. Entries of `other` win
    /// for equal keys; new keys are appended in `other`'s order.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        for (key, value) in &other.entries {
            self.set(key.clone(), value.clone());
        }
        self
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Encodes the bag as a JSON object keyed by wire name.
    ///
    /// A custom key spelling a reserved name (`ProfileKey::custom("email")`)
    /// would decode as the fixed key, so it is dropped with a warning.
    #[must_use]
    pub fn to_wire_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            if key.shadows_fixed() {
                tracing::warn!(key = %key, "custom key spells a reserved name and was not encoded");
                continue;
            }
            map.insert(key.name().to_owned(), value.clone());
        }
        map
    }

    /// Decodes a JSON object produced by [`AttributeBag::to_wire_map`].
    ///
    /// Names in the fixed vocabulary decode to fixed keys.
    #[must_use]
    pub fn from_wire_map(map: &Map<String, Value>) -> Self {
        let mut bag = Self::new();
        for (name, value) in map {
            bag.set(K::from_name(name), value.clone());
        }
        bag
    }

    /// Decodes an arbitrary JSON value, which must be an object.
    pub fn from_wire_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_wire_map(map)),
            other => Err(Error::NotAnObject(json_type_name(other))),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<K: AttributeKey> Default for AttributeBag<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AttributeKey> PartialEq for AttributeBag<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: AttributeKey> fmt::Debug for AttributeBag<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AttributeKey> FromIterator<(K, Value)> for AttributeBag<K> {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (key, value) in iter {
            bag.set(key, value);
        }
        bag
    }
}

impl<K: AttributeKey> Extend<(K, Value)> for AttributeBag<K> {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: AttributeKey> Serialize for AttributeBag<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire_map().serialize(serializer)
    }
}

impl<'de, K: AttributeKey> Deserialize<'de> for AttributeBag<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_wire_map(&map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileKey;
    use serde_json::json;

    #[test]
    fn remove_keeps_index_consistent() {
        let mut bag = AttributeBag::new();
        bag.set(ProfileKey::City, "Boston")
            .set(ProfileKey::Zip, "02110")
            .set(ProfileKey::Region, "MA");

        assert_eq!(bag.remove(&ProfileKey::City), Some(json!("Boston")));
        assert_eq!(bag.get(&ProfileKey::Zip), Some(&json!("02110")));
        assert_eq!(bag.get(&ProfileKey::Region), Some(&json!("MA")));

        bag.set(ProfileKey::Zip, "02111");
        let keys: Vec<_> = bag.keys().cloned().collect();
        assert_eq!(keys, vec![ProfileKey::Zip, ProfileKey::Region]);
    }
}

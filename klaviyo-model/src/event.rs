use crate::string_slot;
use klaviyo_types::{
    AttributeBag, AttributeKey, EventKey, Map, MetricName, Result, Timestamp, Value,
};
use serde::{Deserialize, Serialize};

/// A single occurrence of a metric.
///
/// The metric is fixed at construction. `$value` and `$event_id` have
/// dedicated slots; everything else lives in the property bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    metric: MetricName,
    value: Option<f64>,
    unique_id: Option<String>,
    created_at: Timestamp,
    properties: AttributeBag<EventKey>,
}

impl Event {
    /// A new event stamped with the current time.
    #[must_use]
    pub fn new(metric: MetricName) -> Self {
        Self::at(metric, Timestamp::now())
    }

    /// A new event with an explicit creation time.
    #[must_use]
    pub fn at(metric: MetricName, created_at: Timestamp) -> Self {
        Self {
            metric,
            value: None,
            unique_id: None,
            created_at,
            properties: AttributeBag::new(),
        }
    }

    /// A new event carrying `properties`, routed through
    /// [`Event::set_property`].
    #[must_use]
    pub fn with_properties(metric: MetricName, properties: AttributeBag<EventKey>) -> Self {
        let mut event = Self::new(metric);
        for (key, value) in properties.iter() {
            event.set_property(key.clone(), value.clone());
        }
        event
    }

    #[must_use]
    pub fn metric(&self) -> &MetricName {
        &self.metric
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Sets the event value. NaN and infinities are rejected with a warning.
    pub fn set_value(&mut self, value: f64) -> &mut Self {
        if value.is_finite() {
            self.value = Some(value);
        } else {
            tracing::warn!(metric = %self.metric, value, "event value is not finite");
        }
        self
    }

    pub fn clear_value(&mut self) -> &mut Self {
        self.value = None;
        self
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Sets the client-side deduplication token.
    pub fn set_unique_id(&mut self, unique_id: impl Into<String>) -> &mut Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn clear_unique_id(&mut self) -> &mut Self {
        self.unique_id = None;
        self
    }

    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// Sets a property.
    ///
    /// [`EventKey::Value`] accepts finite numbers and numeric strings;
    /// `null` clears it and anything else is rejected with a warning.
    /// [`EventKey::EventId`] stores the JSON text of non-string values.
    pub fn set_property(&mut self, key: EventKey, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match key {
            EventKey::Value => match numeric(&value) {
                Ok(number) => self.value = number,
                Err(()) => {
                    tracing::warn!(
                        metric = %self.metric,
                        value = %value,
                        "event value is not a number"
                    );
                }
            },
            EventKey::EventId => self.unique_id = string_slot(value),
            key => {
                self.properties.set(key, value);
            }
        }
        self
    }

    #[must_use]
    pub fn property(&self, key: &EventKey) -> Option<Value> {
        match key {
            EventKey::Value => self.value.map(Value::from),
            EventKey::EventId => self.unique_id.clone().map(Value::String),
            key => self.properties.get(key).cloned(),
        }
    }

    pub fn remove_property(&mut self, key: &EventKey) -> &mut Self {
        match key {
            EventKey::Value => self.value = None,
            EventKey::EventId => self.unique_id = None,
            key => {
                self.properties.remove(key);
            }
        }
        self
    }

    /// Properties without `$value` and `$event_id`.
    #[must_use]
    pub fn properties(&self) -> &AttributeBag<EventKey> {
        &self.properties
    }

    /// Copies value, unique id and properties set on `other` into this
    /// event. Metric and creation time stay as they are.
    pub fn merge(&mut self, other: &Event) -> &mut Self {
        if other.value.is_some() {
            self.value = other.value;
        }
        if let Some(unique_id) = &other.unique_id {
            self.unique_id = Some(unique_id.clone());
        }
        self.properties.merge(&other.properties);
        self
    }

    /// Properties followed by `$value` and `$event_id` when set.
    #[must_use]
    pub fn attributes(&self) -> AttributeBag<EventKey> {
        let mut bag = self.properties.clone();
        for key in [EventKey::Value, EventKey::EventId] {
            if let Some(value) = self.property(&key) {
                bag.set(key, value);
            }
        }
        bag
    }

    #[must_use]
    pub fn to_wire_map(&self) -> Map<String, Value> {
        self.attributes().to_wire_map()
    }

    /// Decodes an event from its serialized form.
    pub fn from_wire_value(value: &Value) -> Result<Self> {
        let repr = EventRepr::deserialize(value)?;
        Ok(repr.into())
    }
}

fn numeric(value: &Value) -> std::result::Result<Option<f64>, ()> {
    let number = match value {
        Value::Null => return Ok(None),
        Value::Number(number) => number.as_f64().ok_or(())?,
        Value::String(text) => text.trim().parse::<f64>().map_err(|_| ())?,
        _ => return Err(()),
    };
    if number.is_finite() {
        Ok(Some(number))
    } else {
        Err(())
    }
}

#[derive(Serialize, Deserialize)]
struct EventRepr {
    metric: MetricName,
    time: Timestamp,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl From<&Event> for EventRepr {
    fn from(event: &Event) -> Self {
        Self {
            metric: event.metric.clone(),
            time: event.created_at,
            properties: event.to_wire_map(),
        }
    }
}

impl From<EventRepr> for Event {
    fn from(repr: EventRepr) -> Self {
        let mut event = Event::at(repr.metric, repr.time);
        for (key, value) in repr.properties {
            event.set_property(EventKey::from_name(&key), value);
        }
        event
    }
}

impl Serialize for Event {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        EventRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        EventRepr::deserialize(deserializer).map(Event::from)
    }
}

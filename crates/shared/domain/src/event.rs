use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Category of an [`Event`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventChannel {
    /// The external value changed.
    Value,
    /// A request for the external side to act.
    Command,
    /// Health or state reports.
    Status,
    /// Conditions requiring attention.
    Alarm,
    /// Connect/disconnect and similar transitions.
    Lifecycle,
}

/// Envelope exchanged between a connector and a reference.
///
/// Immutable once built: fields are only reachable through getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    reference: String,
    channel: EventChannel,
    payload: Value,
}

impl Event {
    #[must_use]
    pub fn new(reference: impl Into<String>, channel: EventChannel, payload: impl Into<Value>) -> Self {
        Self { reference: reference.into(), channel, payload: payload.into() }
    }

    /// External name of the reference this event belongs to.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    #[must_use]
    pub const fn channel(&self) -> EventChannel {
        self.channel
    }

    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Splits the envelope into its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, EventChannel, Value) {
        (self.reference, self.channel, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_exposes_its_parts() {
        let event = Event::new("boiler.temp", EventChannel::Alarm, json!({ "limit": 90 }));
        assert_eq!(event.reference(), "boiler.temp");
        assert_eq!(event.channel(), EventChannel::Alarm);
        assert_eq!(event.payload()["limit"], 90);

        let (reference, channel, payload) = event.into_parts();
        assert_eq!((reference.as_str(), channel), ("boiler.temp", EventChannel::Alarm));
        assert_eq!(payload, json!({ "limit": 90 }));
    }

    #[test]
    fn event_serializes_with_lowercase_channel() {
        let event = Event::new("pump.state", EventChannel::Status, "running");
        let raw = serde_json::to_value(&event).unwrap();
        assert_eq!(raw, json!({ "reference": "pump.state", "channel": "status", "payload": "running" }));

        let back: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(back, event);
    }
}

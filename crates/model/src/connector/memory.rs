use crate::connector::ModelConnector;
use crate::error::ConnectorError;
use fxhash::FxHashMap;
use maskarade_domain::{Event, Value};
use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::trace;

/// In-process connector backed by a hash map.
///
/// Sent events are kept in an outbox for inspection; inbound events are queued with
/// [`MemoryConnector::push_incoming`] and handed out by the blocking
/// [`ModelConnector::receive_event`]. Every trait call is counted, which lets tests
/// prove that an operation never reached the connector.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    values: RwLock<FxHashMap<String, Value>>,
    outbox: Mutex<Vec<Event>>,
    inbox: Mutex<VecDeque<Event>>,
    arrived: Condvar,
    closed: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value, builder style.
    #[must_use]
    pub fn with_value(self, reference: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(reference, value);
        self
    }

    /// Sets a value without counting it as a connector call.
    pub fn insert(&self, reference: impl Into<String>, value: impl Into<Value>) {
        self.values.write().insert(reference.into(), value.into());
    }

    /// Reads a value without counting it as a connector call.
    #[must_use]
    pub fn value(&self, reference: &str) -> Option<Value> {
        self.values.read().get(reference).cloned()
    }

    /// Queues an event for [`ModelConnector::receive_event`].
    pub fn push_incoming(&self, event: Event) {
        self.inbox.lock().push_back(event);
        self.arrived.notify_one();
    }

    /// Events sent through [`ModelConnector::send_event`], oldest first.
    #[must_use]
    pub fn sent_events(&self) -> Vec<Event> {
        self.outbox.lock().clone()
    }

    /// Number of trait calls served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Wakes blocked receivers; once the inbox drains they get
    /// [`ConnectorError::Unavailable`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let _inbox = self.inbox.lock();
        self.arrived.notify_all();
    }

    fn count_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl ModelConnector for MemoryConnector {
    fn get_value(&self, reference: &str) -> Result<Value, ConnectorError> {
        self.count_call();
        self.values.read().get(reference).cloned().ok_or_else(|| {
            ConnectorError::UnknownReference { reference: reference.to_owned(), context: None }
        })
    }

    fn set_value(&self, reference: &str, value: Value) -> Result<(), ConnectorError> {
        self.count_call();
        trace!(reference, %value, "Memory connector stored value");
        self.values.write().insert(reference.to_owned(), value);
        Ok(())
    }

    fn send_event(&self, event: Event) -> Result<(), ConnectorError> {
        self.count_call();
        self.outbox.lock().push(event);
        Ok(())
    }

    fn receive_event(&self) -> Result<Event, ConnectorError> {
        self.count_call();
        let mut inbox = self.inbox.lock();
        loop {
            if let Some(event) = inbox.pop_front() {
                return Ok(event);
            }
            if self.closed.load(Ordering::Acquire) {
                return Err(ConnectorError::Unavailable {
                    message: "memory connector is closed".into(),
                    context: None,
                });
            }
            self.arrived.wait(&mut inbox);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskarade_domain::EventChannel;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn values_round_trip_and_calls_are_counted() {
        let connector = MemoryConnector::new().with_value("tank.level", 42);
        assert_eq!(connector.calls(), 0);

        assert_eq!(connector.get_value("tank.level").unwrap(), json!(42));
        connector.set_value("tank.level", json!(40)).unwrap();
        assert_eq!(connector.value("tank.level"), Some(json!(40)));
        assert_eq!(connector.calls(), 2);
    }

    #[test]
    fn unknown_reference_is_reported() {
        let connector = MemoryConnector::new();
        let err = connector.get_value("tank.missing").unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownReference { ref reference, .. } if reference == "tank.missing"));
    }

    #[test]
    fn receive_blocks_until_an_event_arrives() {
        let connector = Arc::new(MemoryConnector::new());
        let receiver = {
            let connector = Arc::clone(&connector);
            thread::spawn(move || connector.receive_event())
        };

        connector.push_incoming(Event::new("tank.level", EventChannel::Value, 12));
        let event = receiver.join().unwrap().unwrap();
        assert_eq!(event.reference(), "tank.level");
        assert_eq!(event.payload(), &json!(12));
    }

    #[test]
    fn close_releases_blocked_receivers() {
        let connector = Arc::new(MemoryConnector::new());
        let receiver = {
            let connector = Arc::clone(&connector);
            thread::spawn(move || connector.receive_event())
        };

        connector.close();
        let err = receiver.join().unwrap().unwrap_err();
        assert_eq!(err.kind(), "Unavailable");
    }
}

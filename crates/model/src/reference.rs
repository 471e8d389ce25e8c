//! Reference proxies: the runtime handle of one external data point.

use crate::connector::SharedConnector;
use crate::error::{TemplateError, UsageError, UsageErrorExt};
use crate::template::{self, FormatParams, Placeholders};
use maskarade_domain::{Event, EventChannel, Value, ValueType};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback invoked by [`ModelRef::handle`].
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Proxy for a named value living behind a [`crate::ModelConnector`].
///
/// A reference starts unbound. `read`, `write` and `emit` fail with
/// [`UsageError::Unbound`] until [`ModelRef::bind`] injects a connector, and never
/// reach a connector before that.
///
/// The declared [`ValueType`] is advisory: a mismatching value is logged with
/// `warn!` and passed through untouched.
pub struct ModelRef {
    value_type: ValueType,
    pattern: String,
    name: String,
    connector: RwLock<Option<SharedConnector>>,
    handler: RwLock<Option<EventHandler>>,
}

impl ModelRef {
    /// Creates an unbound reference.
    ///
    /// The resolved name is `pattern` with escapes applied; placeholders stay in place
    /// until the factory renders the pattern with parameters. A malformed pattern is
    /// logged with `warn!` and used verbatim; see [`ModelRef::try_new`].
    #[must_use]
    pub fn new(value_type: ValueType, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        match template::render(&pattern, &FormatParams::new(), Placeholders::Lenient) {
            Ok(name) => Self::from_parts(value_type, pattern, name),
            Err(err) => {
                warn!(pattern = %pattern, kind = err.kind(), "Malformed reference pattern, using it verbatim: {err}");
                let name = pattern.clone();
                Self::from_parts(value_type, pattern, name)
            },
        }
    }

    /// Creates an unbound reference, rejecting a malformed pattern.
    ///
    /// # Errors
    /// [`TemplateError::Malformed`] if `pattern` does not parse.
    pub fn try_new(value_type: ValueType, pattern: impl Into<String>) -> Result<Self, TemplateError> {
        let pattern = pattern.into();
        let name = template::render(&pattern, &FormatParams::new(), Placeholders::Lenient)?;
        Ok(Self::from_parts(value_type, pattern, name))
    }

    /// Creates an unbound reference whose name is rendered from `pattern` right away.
    ///
    /// # Errors
    /// [`TemplateError`] if the pattern is malformed or uses a key missing from `params`.
    pub fn with_params(
        value_type: ValueType,
        pattern: impl Into<String>,
        params: &FormatParams,
    ) -> Result<Self, TemplateError> {
        let pattern = pattern.into();
        let name = template::render(&pattern, params, Placeholders::Strict)?;
        Ok(Self::from_parts(value_type, pattern, name))
    }

    /// A fresh, unbound copy whose name is re-rendered from the unformatted pattern.
    pub(crate) fn derive(&self, params: &FormatParams, mode: Placeholders) -> Result<Self, TemplateError> {
        let name = template::render(&self.pattern, params, mode)?;
        Ok(Self::from_parts(self.value_type, self.pattern.clone(), name))
    }

    fn from_parts(value_type: ValueType, pattern: String, name: String) -> Self {
        Self { value_type, pattern, name, connector: RwLock::new(None), handler: RwLock::new(None) }
    }

    /// Resolved external name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unformatted name pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.connector.read().is_some()
    }

    #[must_use]
    pub fn connector(&self) -> Option<SharedConnector> {
        self.connector.read().clone()
    }

    #[must_use]
    pub fn has_event_handler(&self) -> bool {
        self.handler.read().is_some()
    }

    /// Injects the connector. The last bind wins; rebinding is reported with `warn!`.
    pub fn bind(&self, connector: SharedConnector) {
        let previous = self.connector.write().replace(connector);
        if previous.is_some() {
            warn!(reference = %self.name, "Model reference is already bound, replacing its connector");
        } else {
            debug!(reference = %self.name, "Model reference bound");
        }
    }

    /// Current external value.
    ///
    /// # Errors
    /// [`UsageError::Unbound`] without a connector, [`UsageError::Connector`] if the
    /// connector fails.
    pub fn read(&self) -> Result<Value, UsageError> {
        let connector = self.bound()?;
        let value = connector.get_value(&self.name).context(format!("reading `{}`", self.name))?;
        self.check_type(&value, "read");
        Ok(value)
    }

    /// Reads the value and deserializes it into `T`.
    ///
    /// # Errors
    /// As [`ModelRef::read`], plus [`UsageError::Decode`] if the value does not fit `T`.
    pub fn read_as<T: DeserializeOwned>(&self) -> Result<T, UsageError> {
        let value = self.read()?;
        serde_json::from_value::<T>(value).context(format!("decoding `{}`", self.name))
    }

    /// Stores `value` in the external source.
    ///
    /// # Errors
    /// [`UsageError::Unbound`] without a connector, [`UsageError::Connector`] if the
    /// connector fails.
    pub fn write(&self, value: impl Into<Value>) -> Result<(), UsageError> {
        let connector = self.bound()?;
        let value = value.into();
        self.check_type(&value, "write");
        connector.set_value(&self.name, value).context(format!("writing `{}`", self.name))
    }

    /// Publishes an event carrying this reference's name.
    ///
    /// # Errors
    /// [`UsageError::Unbound`] without a connector, [`UsageError::Connector`] if the
    /// connector fails.
    pub fn emit(&self, channel: EventChannel, payload: impl Into<Value>) -> Result<(), UsageError> {
        let connector = self.bound()?;
        let event = Event::new(self.name.clone(), channel, payload);
        connector.send_event(event).context(format!("emitting on `{}`", self.name))
    }

    /// Registers the callback for [`ModelRef::handle`], replacing any previous one.
    pub fn set_event_handler<F>(&self, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        *self.handler.write() = Some(Arc::new(handler));
    }

    /// Delivers `event` to the registered callback, or drops it with a warning.
    pub fn handle(&self, event: &Event) {
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => handler(event),
            None => warn!(
                reference = %self.name,
                channel = %event.channel(),
                "No event handler set for model reference, dropping event"
            ),
        }
    }

    fn bound(&self) -> Result<SharedConnector, UsageError> {
        self.connector()
            .ok_or_else(|| UsageError::Unbound { reference: self.name.clone(), context: None })
    }

    fn check_type(&self, value: &Value, operation: &'static str) {
        if !self.value_type.matches(value) {
            warn!(
                reference = %self.name,
                operation,
                expected = %self.value_type,
                actual = %ValueType::of(value),
                "Value type mismatch"
            );
        }
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRef")
            .field("value_type", &self.value_type)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .field("handler", &self.has_event_handler())
            .finish()
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

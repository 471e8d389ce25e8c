//! The connector capability consumed by reference proxies.

mod memory;

pub use memory::MemoryConnector;

use crate::error::ConnectorError;
use maskarade_domain::{Event, Value};
use std::fmt::Debug;
use std::sync::Arc;

/// Transport between reference proxies and an external key/value source.
///
/// Calls are synchronous; a connector that talks to a slow source blocks the caller.
/// Layering timeouts or cancellation is the implementor's concern.
pub trait ModelConnector: Debug + Send + Sync {
    /// Current value of the external data point `reference`.
    ///
    /// # Errors
    /// Implementation-defined transport or lookup failures.
    fn get_value(&self, reference: &str) -> Result<Value, ConnectorError>;

    /// Stores `value` under `reference`.
    ///
    /// # Errors
    /// Implementation-defined transport failures.
    fn set_value(&self, reference: &str, value: Value) -> Result<(), ConnectorError>;

    /// Publishes an event produced by a reference.
    ///
    /// # Errors
    /// Implementation-defined transport failures.
    fn send_event(&self, event: Event) -> Result<(), ConnectorError>;

    /// Blocks until the external side delivers an event.
    ///
    /// # Errors
    /// Returns an error once the connector can no longer deliver events.
    fn receive_event(&self) -> Result<Event, ConnectorError>;
}

/// Connector handle shared by every proxy bound to it.
pub type SharedConnector = Arc<dyn ModelConnector>;

//! Everything needed to declare, finalize and bind models.

pub use crate::{
    Attribute, BindingManager, FormatParams, MemoryConnector, ModelConnector, ModelFactory,
    ModelRef, ModelType, Registry, SharedConnector,
};
pub use maskarade_domain::{Event, EventChannel, Value, ValueType};

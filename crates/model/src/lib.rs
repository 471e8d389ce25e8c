//! # Model layer
//!
//! Binds strongly-typed model definitions to an external key/value source.
//!
//! 1. Declare a [`ModelType`] with [`ModelType::builder`]: reference fields, the
//!    [`ModelRef`] proxies implementing them and constants.
//! 2. Finalize it with [`Registry::finalize`]: the whole inheritance chain is validated
//!    and every external name is registered exactly once.
//! 3. Mint parameterized variants with [`ModelFactory::instantiate`].
//! 4. Bind finalized types to a [`ModelConnector`] through [`BindingManager::bind`], then
//!    `read`, `write`, `emit` and `handle` on the proxies.
//!
//! ```rust
//! use maskarade_model::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! let boiler = ModelType::builder()
//!     .name("Boiler")
//!     .reference("temp", ModelRef::new(ValueType::Float, "boiler.temp"))
//!     .finalize(&registry)
//!     .unwrap();
//!
//! let connector = Arc::new(MemoryConnector::new().with_value("boiler.temp", 71.5));
//! BindingManager::bind(&registry, connector, [Arc::clone(&boiler)]).unwrap();
//!
//! let temp = boiler.reference("temp").unwrap();
//! assert_eq!(temp.read_as::<f64>().unwrap(), 71.5);
//! ```

mod binding;
mod connector;
mod factory;
mod reference;
mod registry;
mod schema;

pub mod error;
pub mod prelude;
pub mod template;

pub use binding::BindingManager;
pub use connector::{MemoryConnector, ModelConnector, SharedConnector};
pub use error::{
    ConnectorError, FinalizationError, ModelError, ReferenceConflict, RepeatedField, TemplateError,
    UsageError,
};
pub use factory::ModelFactory;
pub use reference::{EventHandler, ModelRef};
pub use registry::{Registry, RegistryEntry};
pub use schema::{Attribute, FieldDecl, FieldKind, ModelBuilder, ModelId, ModelType, NoName, WithName};
pub use template::{FormatParams, NameTemplate, Placeholders};

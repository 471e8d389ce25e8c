//! Facade crate for the model layer.
//! Re-exports the model, domain and logger crates and adds what a host application
//! needs around them: layered configuration, logger setup from configuration and the
//! [`ModelsManager`] that owns bound models and routes inbound events.
//! Keep this crate thin: it should compose other crates, not implement model logic.
//!
//! ## Usage
//! ```rust
//! use maskarade::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! let valve = ModelType::builder()
//!     .name("Valve")
//!     .reference("position", ModelRef::new(ValueType::Integer, "valve.position"))
//!     .finalize(&registry)?;
//!
//! let connector = Arc::new(MemoryConnector::new());
//! let manager = ModelsManager::new(&registry, connector, [Arc::clone(&valve)])?;
//! if let Some(position) = valve.reference("position") {
//!     position.write(40)?;
//! }
//! assert_eq!(manager.models().len(), 1);
//! # Ok::<(), maskarade::Error>(())
//! ```

pub mod config;
mod error;
mod logging;
mod manager;
pub mod prelude;

pub use error::{Error, ErrorExt};
pub use logging::init_logger;
pub use manager::ModelsManager;
pub use maskarade_domain as domain;
pub use maskarade_logger as logger;
pub use maskarade_model as model;

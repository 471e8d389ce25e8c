//! # Domain Models
//!
//! Pure data types shared by the model layer with minimal dependencies
//! (`serde`, `serde_json`, `strum`).
//! Keep it lean: no I/O or registry logic, just values, events and configuration.

pub mod config;
pub mod event;
pub mod value;

pub use event::{Event, EventChannel};
pub use serde_json::Value;
pub use value::ValueType;

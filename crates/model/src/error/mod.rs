//! Error taxonomy of the model layer.
//!
//! * [`FinalizationError`]: a model type cannot become final. Always batched.
//! * [`UsageError`]: a call was made in a state that does not allow it.
//! * [`TemplateError`]: a name template could not be rendered.
//! * [`ConnectorError`]: raised by connector implementations.
//! * [`ModelError`]: umbrella for operations spanning several of the above.
//!
//! Advisory conditions (type mismatches, rebinding, unhandled events) are not errors;
//! they are reported through `tracing::warn!` and never interrupt control flow.

mod connector;
mod finalization;
mod model;
mod template;
mod usage;

pub use connector::{ConnectorError, ConnectorErrorExt};
pub use finalization::{FinalizationError, FinalizationErrorExt, ReferenceConflict, RepeatedField};
pub use model::{ModelError, ModelErrorExt};
pub use template::{TemplateError, TemplateErrorExt};
pub use usage::{UsageError, UsageErrorExt};

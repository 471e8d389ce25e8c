use maskarade_model::error::{UsageError, UsageErrorExt};
use maskarade_model::{BindingManager, ModelType, Registry, SharedConnector};
use std::sync::Arc;
use tracing::{trace, warn};

/// Bound models plus the event loop step that feeds them.
#[derive(Debug, Clone)]
pub struct ModelsManager {
    registry: Registry,
    binding: BindingManager,
}

impl ModelsManager {
    /// Binds `models` to `connector`. See [`BindingManager::bind`].
    ///
    /// # Errors
    /// [`UsageError::NotFinal`] if a model is not final in `registry`.
    pub fn new(
        registry: &Registry,
        connector: SharedConnector,
        models: impl IntoIterator<Item = Arc<ModelType>>,
    ) -> Result<Self, UsageError> {
        let binding = BindingManager::bind(registry, connector, models)?;
        Ok(Self { registry: registry.clone(), binding })
    }

    #[must_use]
    pub fn models(&self) -> &[Arc<ModelType>] {
        self.binding.models()
    }

    #[must_use]
    pub const fn connector(&self) -> &SharedConnector {
        self.binding.connector()
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Blocks for the next inbound event and hands it to the reference it names.
    ///
    /// Returns `Ok(false)` when the event names a reference that is unknown to the
    /// registry or not owned by one of the managed models (or their ancestors); the
    /// event is dropped with a warning.
    ///
    /// # Errors
    /// [`UsageError::Connector`] if the connector cannot deliver an event.
    pub fn dispatch_next(&self) -> Result<bool, UsageError> {
        let event = self.connector().receive_event().context("receiving the next event")?;

        let Some(entry) = self.registry.lookup(event.reference()) else {
            warn!(reference = event.reference(), "Received event for an unknown model reference");
            return Ok(false);
        };

        if !self.models().iter().any(|model| model.is_subtype_of(entry.model())) {
            warn!(
                reference = event.reference(),
                model = %entry.model().name(),
                "Received event for a model reference that is not managed"
            );
            return Ok(false);
        }

        trace!(reference = event.reference(), channel = %event.channel(), "Dispatching event");
        entry.reference().handle(&event);
        Ok(true)
    }
}

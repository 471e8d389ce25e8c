use crate::connector::SharedConnector;
use crate::error::UsageError;
use crate::reference::ModelRef;
use crate::registry::Registry;
use crate::schema::ModelType;
use std::sync::Arc;
use tracing::{debug, info};

/// Finalized model types bound to one connector.
#[derive(Debug, Clone)]
pub struct BindingManager {
    models: Vec<Arc<ModelType>>,
    connector: SharedConnector,
}

impl BindingManager {
    /// Binds every effective reference of `models` to `connector`.
    ///
    /// All models are checked before any proxy is touched, so a rejected call binds
    /// nothing. A proxy shared by several of the models is bound once.
    ///
    /// # Errors
    /// [`UsageError::NotFinal`] naming the first model that is not final in `registry`.
    pub fn bind(
        registry: &Registry,
        connector: SharedConnector,
        models: impl IntoIterator<Item = Arc<ModelType>>,
    ) -> Result<Self, UsageError> {
        let models: Vec<_> = models.into_iter().collect();

        if let Some(model) = models.iter().find(|model| !model.is_final() || !registry.contains_model(model)) {
            return Err(UsageError::NotFinal { model: model.name().to_owned(), context: None });
        }

        let mut bound: Vec<&Arc<ModelRef>> = Vec::new();
        for model in &models {
            let references = model.references();
            for (_, reference) in &references {
                if bound.iter().any(|seen| Arc::ptr_eq(seen, reference)) {
                    continue;
                }
                reference.bind(Arc::clone(&connector));
                bound.push(*reference);
            }
            debug!(model = %model.name(), references = references.len(), "Model bound");
        }

        info!(models = models.len(), references = bound.len(), "Models bound to connector");
        Ok(Self { models, connector })
    }

    /// Bound models, in binding order.
    #[must_use]
    pub fn models(&self) -> &[Arc<ModelType>] {
        &self.models
    }

    #[must_use]
    pub const fn connector(&self) -> &SharedConnector {
        &self.connector
    }
}

//! Parameterized model types.

use crate::error::{ModelError, ModelErrorExt};
use crate::reference::ModelRef;
use crate::registry::Registry;
use crate::schema::{self, Attribute, ModelType};
use crate::template::{self, FormatParams, Placeholders};
use std::sync::Arc;
use tracing::debug;

/// Mints variants of a template model type with their external names rendered from
/// parameters.
///
/// ```rust
/// # use maskarade_model::{FormatParams, ModelFactory, ModelRef, ModelType, Registry};
/// # use maskarade_domain::ValueType;
/// let registry = Registry::new();
/// let thermostat = ModelType::builder()
///     .name("Thermostat")
///     .reference("temp", ModelRef::new(ValueType::Float, "dev-{id}.temp"))
///     .build();
///
/// let factory = ModelFactory::new(&registry);
/// let params = FormatParams::new().with("id", 7);
/// let unit = factory.instantiate(&thermostat, "Thermostat{id}", true, &params).unwrap();
///
/// assert_eq!(unit.name(), "Thermostat7");
/// assert_eq!(unit.reference("temp").unwrap().name(), "dev-7.temp");
/// ```
#[derive(Debug, Clone)]
pub struct ModelFactory {
    registry: Registry,
    placeholders: Placeholders,
}

impl ModelFactory {
    /// A strict factory finalizing against `registry`.
    #[must_use]
    pub fn new(registry: &Registry) -> Self {
        Self { registry: registry.clone(), placeholders: Placeholders::Strict }
    }

    /// In lenient mode, placeholders without a parameter are kept literally.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.placeholders = Placeholders::from_strict(strict);
        self
    }

    #[must_use]
    pub const fn placeholders(&self) -> Placeholders {
        self.placeholders
    }

    /// Creates a draft subtype of `template` named `name_template` rendered with
    /// `params`.
    ///
    /// Every effective attribute of the template is copied onto the new type. Reference
    /// proxies are re-created unbound, their external names rendered from the unformatted
    /// pattern; constants are copied as they are. Proxies already registered by a final
    /// ancestor are shared with the variant as they are. With `is_final` the new type is
    /// finalized right away.
    ///
    /// # Errors
    /// * [`ModelError::Template`] if a name cannot be rendered.
    /// * [`ModelError::Finalization`] if `is_final` and finalization fails.
    pub fn instantiate(
        &self,
        template: &Arc<ModelType>,
        name_template: &str,
        is_final: bool,
        params: &FormatParams,
    ) -> Result<Arc<ModelType>, ModelError> {
        let name = template::render(name_template, params, self.placeholders)
            .context(format!("naming a variant of `{}`", template.name()))?;

        let mut attributes = Vec::new();
        for (field, attribute) in template.attributes() {
            let copy = match attribute {
                Attribute::Reference(reference) if self.owned_by_final_ancestor(template, reference) => {
                    Attribute::Reference(Arc::clone(reference))
                },
                Attribute::Reference(reference) => {
                    let derived = reference
                        .derive(params, self.placeholders)
                        .context(format!("rendering `{field}` of `{name}`"))?;
                    Attribute::Reference(Arc::new(derived))
                },
                Attribute::Constant(value) => Attribute::Constant(value.clone()),
            };
            attributes.push((field.to_owned(), copy));
        }

        let model = schema::assemble(name, template, attributes);
        debug!(template = %template.name(), model = %model.name(), is_final, "Model variant created");

        if is_final {
            self.registry.finalize(&model)?;
        }
        Ok(model)
    }

    fn owned_by_final_ancestor(&self, template: &ModelType, reference: &Arc<ModelRef>) -> bool {
        self.registry.lookup(reference.name()).is_some_and(|entry| {
            Arc::ptr_eq(entry.reference(), reference)
                && **entry.model() != *template
                && template.is_subtype_of(entry.model())
        })
    }
}

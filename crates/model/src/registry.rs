use crate::error::{FinalizationError, ReferenceConflict, RepeatedField};
use crate::reference::ModelRef;
use crate::schema::{FieldKind, ModelType};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error};

/// One registered external name.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    field: String,
    model: Arc<ModelType>,
    reference: Arc<ModelRef>,
}

impl RegistryEntry {
    /// External name of the reference.
    #[must_use]
    pub fn name(&self) -> &str {
        self.reference.name()
    }

    /// Attribute name under which the owning type carries the reference.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The model type that registered the name.
    #[must_use]
    pub const fn model(&self) -> &Arc<ModelType> {
        &self.model
    }

    #[must_use]
    pub const fn reference(&self) -> &Arc<ModelRef> {
        &self.reference
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    index: FxHashMap<String, usize>,
    entries: Vec<RegistryEntry>,
    models: Vec<Arc<ModelType>>,
}

/// Maps every external reference name to the model type that declared it.
///
/// Entries are only added by [`Registry::finalize`] and are never removed, so an
/// external name is unique for the lifetime of the registry. Cloning is cheap and
/// shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    state: Arc<RwLock<RegistryState>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Validates `model` against its whole inheritance chain, registers its references
    /// and marks it final.
    ///
    /// On failure nothing is registered and the type stays draft. The error is logged
    /// before it is returned.
    ///
    /// # Errors
    /// * [`FinalizationError::AlreadyFinal`] if `model` was finalized before.
    /// * [`FinalizationError::DuplicateDeclaration`] if a field is declared by several
    ///   types of the chain.
    /// * [`FinalizationError::MissingImplementation`] if a declared reference has no
    ///   concrete reference attribute.
    /// * [`FinalizationError::DuplicateReference`] if an external name is already taken.
    pub fn finalize(&self, model: &Arc<ModelType>) -> Result<(), FinalizationError> {
        let result = self.try_finalize(model);
        if let Err(err) = &result {
            error!(model = %model.name(), kind = err.kind(), "{err}");
        }
        result
    }

    fn try_finalize(&self, model: &Arc<ModelType>) -> Result<(), FinalizationError> {
        if model.is_final() {
            return Err(already_final(model));
        }

        let declarations = model.declarations();

        let mut declared: Vec<RepeatedField> = Vec::new();
        for (owner, field) in &declarations {
            match declared.iter().position(|entry| entry.field == field.name()) {
                Some(index) => declared[index].models.push(owner.name().to_owned()),
                None => declared.push(RepeatedField {
                    field: field.name().to_owned(),
                    models: vec![owner.name().to_owned()],
                }),
            }
        }
        let repeated: Vec<_> = declared.into_iter().filter(|entry| entry.models.len() > 1).collect();
        if !repeated.is_empty() {
            return Err(FinalizationError::DuplicateDeclaration {
                model: model.name().to_owned(),
                fields: repeated,
                context: None,
            });
        }

        let mut missing = Vec::new();
        for (owner, field) in &declarations {
            match field.kind() {
                FieldKind::Opaque(label) => debug!(
                    model = %model.name(),
                    declared_by = %owner.name(),
                    field = field.name(),
                    type_label = %label,
                    "Field is not a model reference, skipping"
                ),
                FieldKind::Reference(_) if model.reference(field.name()).is_none() => {
                    missing.push(field.name().to_owned());
                },
                FieldKind::Reference(_) => {},
            }
        }
        if !missing.is_empty() {
            return Err(FinalizationError::MissingImplementation {
                model: model.name().to_owned(),
                fields: missing,
                context: None,
            });
        }

        let mut state = self.state.write();
        let mut conflicts = Vec::new();
        let mut pending: Vec<RegistryEntry> = Vec::new();

        for (field, reference) in model.references() {
            let name = reference.name();
            if let Some(&index) = state.index.get(name) {
                let existing = &state.entries[index];
                let inherited = Arc::ptr_eq(&existing.reference, reference)
                    && existing.model.is_final()
                    && model.is_subtype_of(&existing.model);
                if !inherited {
                    conflicts.push(ReferenceConflict {
                        field: field.to_owned(),
                        reference: name.to_owned(),
                        owner: existing.model.name().to_owned(),
                    });
                }
                continue;
            }
            if pending.iter().any(|entry| entry.name() == name) {
                conflicts.push(ReferenceConflict {
                    field: field.to_owned(),
                    reference: name.to_owned(),
                    owner: model.name().to_owned(),
                });
                continue;
            }
            pending.push(RegistryEntry {
                field: field.to_owned(),
                model: Arc::clone(model),
                reference: Arc::clone(reference),
            });
        }

        if !conflicts.is_empty() {
            return Err(FinalizationError::DuplicateReference {
                model: model.name().to_owned(),
                conflicts,
                context: None,
            });
        }

        if !model.mark_final() {
            return Err(already_final(model));
        }

        let registered = pending.len();
        for entry in pending {
            let position = state.entries.len();
            state.index.insert(entry.name().to_owned(), position);
            state.entries.push(entry);
        }
        state.models.push(Arc::clone(model));
        drop(state);

        debug!(model = %model.name(), id = %model.id(), registered, "Model finalized");
        Ok(())
    }

    /// Entry registered under the external name `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<RegistryEntry> {
        let state = self.state.read();
        state.index.get(name).map(|&index| state.entries[index].clone())
    }

    /// Model type that registered `name`.
    #[must_use]
    pub fn model_of(&self, name: &str) -> Option<Arc<ModelType>> {
        self.lookup(name).map(|entry| entry.model)
    }

    /// Reference proxy registered under `name`.
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<Arc<ModelRef>> {
        self.lookup(name).map(|entry| entry.reference)
    }

    /// Snapshot of every entry, in registration order.
    #[must_use]
    pub fn associations(&self) -> Vec<RegistryEntry> {
        self.state.read().entries.clone()
    }

    /// Every type finalized against this registry, in finalization order.
    #[must_use]
    pub fn final_models(&self) -> Vec<Arc<ModelType>> {
        self.state.read().models.clone()
    }

    /// Finalized types that are `base` or descend from it.
    #[must_use]
    pub fn final_models_of(&self, base: &ModelType) -> Vec<Arc<ModelType>> {
        self.state.read().models.iter().filter(|model| model.is_subtype_of(base)).cloned().collect()
    }

    /// Whether `model` was finalized against this registry.
    #[must_use]
    pub fn contains_model(&self, model: &ModelType) -> bool {
        self.state.read().models.iter().any(|known| known.id() == model.id())
    }

    /// Number of registered external names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}

fn already_final(model: &ModelType) -> FinalizationError {
    FinalizationError::AlreadyFinal { model: model.name().to_owned(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskarade_domain::ValueType;

    #[test]
    fn inherited_proxies_stay_owned_by_the_ancestor() {
        let registry = Registry::new();
        let base = ModelType::builder()
            .name("Meter")
            .reference("reading", ModelRef::new(ValueType::Float, "meter.reading"))
            .finalize(&registry)
            .unwrap();
        let child = ModelType::builder()
            .name("SmartMeter")
            .extends(&base)
            .reference("tariff", ModelRef::new(ValueType::Integer, "meter.tariff"))
            .finalize(&registry)
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.model_of("meter.reading").as_deref(), Some(&*base));
        assert_eq!(registry.model_of("meter.tariff").as_deref(), Some(&*child));
        assert_eq!(registry.lookup("meter.tariff").map(|e| e.field().to_owned()), Some("tariff".to_owned()));
    }

    #[test]
    fn draft_ancestor_references_are_registered_by_the_descendant() {
        let registry = Registry::new();
        let base = ModelType::builder()
            .name("Meter")
            .reference("reading", ModelRef::new(ValueType::Float, "meter.reading"))
            .build();
        let child = ModelType::builder().name("SmartMeter").extends(&base).finalize(&registry).unwrap();

        assert!(!base.is_final());
        assert_eq!(registry.model_of("meter.reading").as_deref(), Some(&*child));
    }

    #[test]
    fn two_fields_with_one_external_name_conflict() {
        let registry = Registry::new();
        let model = ModelType::builder()
            .name("Mirror")
            .reference("left", ModelRef::new(ValueType::Any, "mirror.value"))
            .reference("right", ModelRef::new(ValueType::Any, "mirror.value"))
            .build();

        let err = registry.finalize(&model).unwrap_err();
        let FinalizationError::DuplicateReference { conflicts, .. } = err else {
            panic!("expected a duplicate reference error");
        };
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].field, "right");
        assert_eq!(conflicts[0].owner, "Mirror");
        assert!(registry.is_empty());
        assert!(!model.is_final());
    }

    #[test]
    fn global_registry_is_shared() {
        assert!(std::ptr::eq(Registry::global(), Registry::global()));
    }
}

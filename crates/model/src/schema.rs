//! Model types and their declaration builder.
//!
//! A model type is a runtime value: a name, an optional parent, a table of field
//! declarations and a table of concrete attributes. Declarations describe what a type
//! promises; attributes are what it actually carries. [`crate::Registry::finalize`]
//! checks that the two agree across the whole inheritance chain.

use crate::error::FinalizationError;
use crate::reference::ModelRef;
use crate::registry::Registry;
use maskarade_domain::{Value, ValueType};
use private::Sealed;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Process-unique identity of a [`ModelType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u64);

impl ModelId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a declared field holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// An external reference constrained to the given value type.
    Reference(ValueType),
    /// Any other field, identified by a type label. Not subject to completeness checks.
    Opaque(Cow<'static, str>),
}

/// One entry of a model type's declaration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    name: String,
    kind: FieldKind,
    location: &'static Location<'static>,
}

impl FieldDecl {
    #[must_use]
    #[track_caller]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, location: Location::caller() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Source location of the declaration.
    #[must_use]
    pub const fn location(&self) -> &'static Location<'static> {
        self.location
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self.kind, FieldKind::Reference(_))
    }
}

/// A concrete slot of a model type.
#[derive(Debug, Clone)]
pub enum Attribute {
    Reference(Arc<ModelRef>),
    Constant(Value),
}

impl Attribute {
    #[must_use]
    pub const fn as_reference(&self) -> Option<&Arc<ModelRef>> {
        match self {
            Self::Reference(reference) => Some(reference),
            Self::Constant(_) => None,
        }
    }

    #[must_use]
    pub const fn as_constant(&self) -> Option<&Value> {
        match self {
            Self::Constant(value) => Some(value),
            Self::Reference(_) => None,
        }
    }
}

impl From<ModelRef> for Attribute {
    fn from(reference: ModelRef) -> Self {
        Self::Reference(Arc::new(reference))
    }
}

impl From<Arc<ModelRef>> for Attribute {
    fn from(reference: Arc<ModelRef>) -> Self {
        Self::Reference(reference)
    }
}

/// A named, inheritable schema. Draft until finalized, final forever after.
pub struct ModelType {
    id: ModelId,
    name: String,
    parent: Option<Arc<ModelType>>,
    fields: Vec<FieldDecl>,
    attributes: Vec<(String, Attribute)>,
    finalized: AtomicBool,
}

impl ModelType {
    #[must_use]
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    #[must_use]
    pub const fn id(&self) -> ModelId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// Own field declarations, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.finalized.load(Ordering::Acquire)
    }

    /// Flips the type to final. Returns `false` if it already was.
    pub(crate) fn mark_final(&self) -> bool {
        self.finalized.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    /// The inheritance chain, most-ancestral first, ending with `self`.
    #[must_use]
    pub fn chain(&self) -> Vec<&Self> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(model) = current {
            chain.push(model);
            current = model.parent.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Every field declaration of the chain with its declaring type, most-ancestral first.
    #[must_use]
    pub fn declarations(&self) -> Vec<(&Self, &FieldDecl)> {
        self.chain()
            .into_iter()
            .flat_map(|model| model.fields.iter().map(move |field| (model, field)))
            .collect()
    }

    /// Own attributes, in declaration order.
    pub fn own_attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(name, attribute)| (name.as_str(), attribute))
    }

    /// Effective attribute `name`: the type's own slot, else the nearest inherited one.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|(own, _)| own == name)
            .map(|(_, attribute)| attribute)
            .or_else(|| self.parent.as_deref().and_then(|parent| parent.attribute(name)))
    }

    /// Effective attributes. Inherited slots come first, in ancestral order; an
    /// overriding slot takes the position of the slot it replaces.
    #[must_use]
    pub fn attributes(&self) -> Vec<(&str, &Attribute)> {
        let mut effective: Vec<(&str, &Attribute)> = Vec::new();
        for model in self.chain() {
            for (name, attribute) in &model.attributes {
                match effective.iter().position(|(existing, _)| *existing == name.as_str()) {
                    Some(index) => effective[index].1 = attribute,
                    None => effective.push((name.as_str(), attribute)),
                }
            }
        }
        effective
    }

    /// Effective reference attributes.
    #[must_use]
    pub fn references(&self) -> Vec<(&str, &Arc<ModelRef>)> {
        self.attributes()
            .into_iter()
            .filter_map(|(name, attribute)| attribute.as_reference().map(|reference| (name, reference)))
            .collect()
    }

    /// Effective reference attribute `name`.
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<&Arc<ModelRef>> {
        self.attribute(name).and_then(Attribute::as_reference)
    }

    /// Whether `self` is `target` or descends from it.
    #[must_use]
    pub fn is_subtype_of(&self, target: &Self) -> bool {
        self.as_type(target).is_some()
    }

    /// The ancestor of `self` (or `self`) that is `target`.
    #[must_use]
    pub fn as_type(&self, target: &Self) -> Option<&Self> {
        self.chain().into_iter().find(|model| model.id == target.id)
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelType {}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .field("fields", &self.fields)
            .field("attributes", &self.attributes)
            .field("final", &self.is_final())
            .finish()
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Default)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// Declares a [`ModelType`].
///
/// ```rust
/// # use maskarade_model::{ModelRef, ModelType, Registry};
/// # use maskarade_domain::ValueType;
/// let registry = Registry::new();
/// let pump = ModelType::builder()
///     .name("Pump")
///     .reference("speed", ModelRef::new(ValueType::Float, "pump-{id}.speed"))
///     .constant("vendor", "acme")
///     .build();
///
/// registry.finalize(&pump).unwrap();
/// assert!(pump.is_final());
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder<N: Sealed = NoName> {
    name: N,
    parent: Option<Arc<ModelType>>,
    fields: Vec<FieldDecl>,
    attributes: Vec<(String, Attribute)>,
}

impl ModelBuilder<NoName> {
    /// Sets the display name of the type.
    pub fn name(self, name: impl Into<String>) -> ModelBuilder<WithName> {
        ModelBuilder {
            name: WithName(name.into()),
            parent: self.parent,
            fields: self.fields,
            attributes: self.attributes,
        }
    }
}

impl<N: Sealed> ModelBuilder<N> {
    /// Inherits from `parent`.
    #[must_use = "The builder must be configured before it can be used to build the model."]
    pub fn extends(mut self, parent: &Arc<ModelType>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declares a reference field. Redeclaring a name replaces the earlier declaration.
    #[must_use = "The builder must be configured before it can be used to build the model."]
    #[track_caller]
    pub fn declare(self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.push_field(FieldDecl::new(name, FieldKind::Reference(value_type)))
    }

    /// Declares a non-reference field, labelled with its type.
    #[must_use = "The builder must be configured before it can be used to build the model."]
    #[track_caller]
    pub fn declare_opaque(self, name: impl Into<String>, type_label: impl Into<Cow<'static, str>>) -> Self {
        self.push_field(FieldDecl::new(name, FieldKind::Opaque(type_label.into())))
    }

    /// Provides the concrete reference for a field.
    #[must_use = "The builder must be configured before it can be used to build the model."]
    pub fn implement(self, name: impl Into<String>, reference: impl Into<Arc<ModelRef>>) -> Self {
        self.set_attribute(name.into(), Attribute::Reference(reference.into()))
    }

    /// Adds a constant attribute.
    #[must_use = "The builder must be configured before it can be used to build the model."]
    pub fn constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(name.into(), Attribute::Constant(value.into()))
    }

    /// Declares a reference field and implements it with `reference`.
    #[must_use = "The builder must be configured before it can be used to build the model."]
    #[track_caller]
    pub fn reference(self, name: impl Into<String>, reference: ModelRef) -> Self {
        let name = name.into();
        let value_type = reference.value_type();
        self.declare(name.clone(), value_type).implement(name, reference)
    }

    fn push_field(mut self, field: FieldDecl) -> Self {
        self.fields.retain(|existing| existing.name != field.name);
        self.fields.push(field);
        self
    }

    fn set_attribute(mut self, name: String, attribute: Attribute) -> Self {
        match self.attributes.iter().position(|(existing, _)| *existing == name) {
            Some(index) => self.attributes[index].1 = attribute,
            None => self.attributes.push((name, attribute)),
        }
        self
    }
}

impl ModelBuilder<WithName> {
    /// Builds a draft model type.
    #[must_use]
    pub fn build(self) -> Arc<ModelType> {
        Arc::new(ModelType {
            id: ModelId::next(),
            name: self.name.0,
            parent: self.parent,
            fields: self.fields,
            attributes: self.attributes,
            finalized: AtomicBool::new(false),
        })
    }

    /// Builds the type and finalizes it against `registry`.
    ///
    /// # Errors
    /// Whatever [`Registry::finalize`] reports.
    pub fn finalize(self, registry: &Registry) -> Result<Arc<ModelType>, FinalizationError> {
        let model = self.build();
        registry.finalize(&model)?;
        Ok(model)
    }
}

/// Assembles a draft type from parts prepared elsewhere in the crate.
pub(crate) fn assemble(
    name: String,
    parent: &Arc<ModelType>,
    attributes: Vec<(String, Attribute)>,
) -> Arc<ModelType> {
    Arc::new(ModelType {
        id: ModelId::next(),
        name,
        parent: Some(Arc::clone(parent)),
        fields: Vec::new(),
        attributes,
        finalized: AtomicBool::new(false),
    })
}

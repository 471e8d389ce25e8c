mod fixtures;

use maskarade_model::prelude::*;
use maskarade_model::{FinalizationError, FieldKind};
use std::sync::Arc;

#[test]
fn finalizing_registers_every_reference_of_the_chain() {
    let registry = Registry::new();
    let device = fixtures::device();
    let thermostat = fixtures::thermostat(&device);

    registry.finalize(&thermostat).unwrap();

    assert!(thermostat.is_final());
    assert!(!device.is_final());
    let names: Vec<_> = registry.associations().iter().map(|e| e.name().to_owned()).collect();
    assert_eq!(names, ["dev-{id}.online", "dev-{id}.temp", "dev-{id}.setpoint"]);
    assert!(registry.associations().iter().all(|e| Arc::ptr_eq(e.model(), &thermostat)));
}

#[test]
fn zero_reference_models_can_be_final() {
    let registry = Registry::new();
    let empty = ModelType::builder().name("Empty").constant("kind", "marker").finalize(&registry).unwrap();

    assert!(empty.is_final());
    assert!(registry.is_empty());
    assert!(registry.contains_model(&empty));
}

#[test]
fn finalizing_twice_fails_and_changes_nothing() {
    let registry = Registry::new();
    let point = fixtures::final_point(&registry, "Level", "tank.level", ValueType::Number);

    let err = registry.finalize(&point).unwrap_err();
    assert!(matches!(err, FinalizationError::AlreadyFinal { ref model, .. } if model == "Level"));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.final_models().len(), 1);
}

#[test]
fn duplicate_declarations_across_the_chain_are_reported() {
    let registry = Registry::new();
    let base = ModelType::builder()
        .name("Base")
        .reference("speed", ModelRef::new(ValueType::Float, "base.speed"))
        .declare("mode", ValueType::String)
        .implement("mode", ModelRef::new(ValueType::String, "base.mode"))
        .build();
    let child = ModelType::builder()
        .name("Child")
        .extends(&base)
        .reference("speed", ModelRef::new(ValueType::Float, "child.speed"))
        .reference("mode", ModelRef::new(ValueType::String, "child.mode"))
        .build();

    let err = registry.finalize(&child).unwrap_err();
    let FinalizationError::DuplicateDeclaration { model, fields, .. } = &err else {
        panic!("expected duplicate declaration, got {err}");
    };
    assert_eq!(model, "Child");
    let listed: Vec<_> = fields.iter().map(|f| (f.field.as_str(), f.models.clone())).collect();
    assert_eq!(
        listed,
        [
            ("speed", vec!["Base".to_owned(), "Child".to_owned()]),
            ("mode", vec!["Base".to_owned(), "Child".to_owned()]),
        ]
    );
    assert!(err.to_string().contains("\n\t-> speed @ [Base, Child]"));
    assert!(registry.is_empty());
    assert!(!child.is_final());
}

#[test]
fn missing_implementations_are_listed_together() {
    let registry = Registry::new();
    let pump = ModelType::builder()
        .name("Pump")
        .declare("speed", ValueType::Float)
        .declare("pressure", ValueType::Float)
        .declare_opaque("notes", "String")
        .constant("pressure", 3.5)
        .build();

    let err = registry.finalize(&pump).unwrap_err();
    let FinalizationError::MissingImplementation { fields, .. } = &err else {
        panic!("expected missing implementation, got {err}");
    };
    assert_eq!(fields, &["speed".to_owned(), "pressure".to_owned()]);
    assert!(!pump.is_final());
}

#[test]
fn inherited_implementations_satisfy_descendant_declarations() {
    let registry = Registry::new();
    let base = ModelType::builder()
        .name("Base")
        .implement("speed", ModelRef::new(ValueType::Float, "unit.speed"))
        .build();
    let child = ModelType::builder().name("Child").extends(&base).declare("speed", ValueType::Float).build();

    registry.finalize(&child).unwrap();
    assert_eq!(registry.model_of("unit.speed").as_deref(), Some(&*child));
}

#[test]
fn opaque_fields_are_not_checked_for_completeness() {
    let registry = Registry::new();
    let model = ModelType::builder()
        .name("Annotated")
        .declare_opaque("label", "String")
        .reference("value", ModelRef::new(ValueType::Any, "annotated.value"))
        .build();

    assert_eq!(model.fields()[0].kind(), &FieldKind::Opaque("String".into()));
    registry.finalize(&model).unwrap();
}

#[test]
fn taken_external_names_are_conflicts_and_nothing_is_registered() {
    let registry = Registry::new();
    fixtures::final_point(&registry, "Heater", "boiler.temp", ValueType::Float);

    let boiler = ModelType::builder()
        .name("Boiler")
        .reference("flow", ModelRef::new(ValueType::Float, "boiler.flow"))
        .reference("temp", ModelRef::new(ValueType::Float, "boiler.temp"))
        .build();

    let err = registry.finalize(&boiler).unwrap_err();
    let FinalizationError::DuplicateReference { conflicts, .. } = &err else {
        panic!("expected duplicate reference, got {err}");
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].field, "temp");
    assert_eq!(conflicts[0].reference, "boiler.temp");
    assert_eq!(conflicts[0].owner, "Heater");

    assert!(registry.lookup("boiler.flow").is_none(), "failed finalization must not register anything");
    assert!(!registry.contains_model(&boiler));
    assert!(!boiler.is_final());
}

#[test]
fn subtypes_of_final_models_reuse_the_ancestor_entries() {
    let registry = Registry::new();
    let device = fixtures::device();
    registry.finalize(&device).unwrap();
    let thermostat = fixtures::thermostat(&device);
    registry.finalize(&thermostat).unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.model_of("dev-{id}.online").as_deref(), Some(&*device));
    assert_eq!(registry.model_of("dev-{id}.temp").as_deref(), Some(&*thermostat));

    let of_device: Vec<_> = registry.final_models_of(&device).iter().map(|m| m.name().to_owned()).collect();
    assert_eq!(of_device, ["Device", "Thermostat"]);
    assert_eq!(registry.final_models_of(&thermostat).len(), 1);
}

#[test]
fn overriding_an_inherited_reference_with_a_new_proxy_under_the_same_name_conflicts() {
    let registry = Registry::new();
    let base = fixtures::final_point(&registry, "Base", "shared.value", ValueType::Any);
    let child = ModelType::builder()
        .name("Child")
        .extends(&base)
        .implement("value", ModelRef::new(ValueType::Any, "shared.value"))
        .build();

    let err = registry.finalize(&child).unwrap_err();
    assert_eq!(err.kind(), "DuplicateReference");
}

#[test]
fn builder_finalize_builds_and_finalizes() {
    let registry = Registry::new();
    let err = ModelType::builder()
        .name("Broken")
        .declare("value", ValueType::Any)
        .finalize(&registry)
        .unwrap_err();
    assert_eq!(err.model(), "Broken");
    assert!(registry.final_models().is_empty());
}

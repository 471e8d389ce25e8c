use maskarade::model::UsageError;
use maskarade::prelude::*;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

fn boiler(registry: &Registry) -> Arc<ModelType> {
    ModelType::builder()
        .name("Boiler")
        .reference("temp", ModelRef::new(ValueType::Float, "boiler.temp"))
        .reference("burner", ModelRef::new(ValueType::Bool, "boiler.burner"))
        .finalize(registry)
        .expect("boiler should finalize")
}

#[test]
fn dispatch_routes_events_to_the_matching_handler() {
    let registry = Registry::new();
    let boiler = boiler(&registry);
    let connector = Arc::new(MemoryConnector::new());
    let manager = ModelsManager::new(&registry, connector.clone(), [Arc::clone(&boiler)]).unwrap();

    let handled = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&handled);
    boiler.reference("burner").unwrap().set_event_handler(move |event| sink.lock().push(event.clone()));

    connector.push_incoming(Event::new("boiler.burner", EventChannel::Command, true));
    assert!(manager.dispatch_next().unwrap());

    let events = handled.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].channel(), EventChannel::Command);
    assert_eq!(events[0].payload(), &json!(true));
}

#[test]
fn unknown_references_are_skipped() {
    let registry = Registry::new();
    let boiler = boiler(&registry);
    let connector = Arc::new(MemoryConnector::new());
    let manager = ModelsManager::new(&registry, connector.clone(), [boiler]).unwrap();

    connector.push_incoming(Event::new("chiller.temp", EventChannel::Value, 4.0));
    assert!(!manager.dispatch_next().unwrap());
}

#[test]
fn references_of_unmanaged_models_are_skipped() {
    let registry = Registry::new();
    let boiler = boiler(&registry);
    let chiller = ModelType::builder()
        .name("Chiller")
        .reference("temp", ModelRef::new(ValueType::Float, "chiller.temp"))
        .finalize(&registry)
        .unwrap();
    chiller.reference("temp").unwrap().set_event_handler(|_| panic!("chiller is not managed"));

    let connector = Arc::new(MemoryConnector::new());
    let manager = ModelsManager::new(&registry, connector.clone(), [boiler]).unwrap();

    connector.push_incoming(Event::new("chiller.temp", EventChannel::Value, 4.0));
    assert!(!manager.dispatch_next().unwrap());
}

#[test]
fn a_closed_connector_ends_dispatching() {
    let registry = Registry::new();
    let boiler = boiler(&registry);
    let connector = Arc::new(MemoryConnector::new());
    let manager = ModelsManager::new(&registry, connector.clone(), [boiler]).unwrap();

    connector.close();
    let err = manager.dispatch_next().unwrap_err();
    assert!(matches!(err, UsageError::Connector { .. }));
    assert!(err.to_string().contains("receiving the next event"));
}

#[test]
fn binding_errors_surface_through_the_facade_error() {
    let registry = Registry::new();
    let draft = ModelType::builder().name("Draft").build();

    let result: Result<ModelsManager, maskarade::Error> =
        ModelsManager::new(&registry, Arc::new(MemoryConnector::new()), [draft]).map_err(Into::into);

    let err = result.unwrap_err();
    assert_eq!(err.kind(), "Usage");
    assert_eq!(err.to_string(), "Cannot bind model `Draft` if it is not marked as final");
}

#[test]
fn the_manager_writes_through_bound_references() {
    let registry = Registry::new();
    let boiler = boiler(&registry);
    let connector = Arc::new(MemoryConnector::new());
    let manager = ModelsManager::new(&registry, connector.clone(), [Arc::clone(&boiler)]).unwrap();

    boiler.reference("temp").unwrap().write(68.5).unwrap();
    assert_eq!(manager.connector().get_value("boiler.temp").unwrap(), json!(68.5));
    assert_eq!(manager.registry().len(), 2);
}

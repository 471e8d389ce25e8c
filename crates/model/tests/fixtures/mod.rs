#![allow(dead_code)]

use maskarade_model::prelude::*;
use std::sync::Arc;

/// `Device` with an `online` reference and a `vendor` constant. Draft.
pub fn device() -> Arc<ModelType> {
    ModelType::builder()
        .name("Device")
        .reference("online", ModelRef::new(ValueType::Bool, "dev-{id}.online"))
        .constant("vendor", "acme")
        .build()
}

/// `Thermostat` extending `device`, with a `temp` and a `setpoint` reference. Draft.
pub fn thermostat(device: &Arc<ModelType>) -> Arc<ModelType> {
    ModelType::builder()
        .name("Thermostat")
        .extends(device)
        .reference("temp", ModelRef::new(ValueType::Float, "dev-{id}.temp"))
        .reference("setpoint", ModelRef::new(ValueType::Float, "dev-{id}.setpoint"))
        .declare_opaque("label", "String")
        .build()
}

/// A final single-reference model named after `reference`.
pub fn final_point(registry: &Registry, model: &str, reference: &str, value_type: ValueType) -> Arc<ModelType> {
    ModelType::builder()
        .name(model)
        .reference("value", ModelRef::new(value_type, reference))
        .finalize(registry)
        .expect("fixture model should finalize")
}

pub fn connector() -> Arc<MemoryConnector> {
    Arc::new(MemoryConnector::new())
}

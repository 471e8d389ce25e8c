#![allow(clippy::print_stdout)]

use anyhow::Context;
use clap::Parser;
use maskarade::config::load_config;
use maskarade::init_logger;
use maskarade::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Declares a thermostat template, mints variants of it and drives them through an
/// in-memory connector.
#[derive(Debug, Parser)]
#[command(name = "maskarade", version, about)]
struct Cli {
    /// Configuration file; the extension may be omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of thermostat variants to mint.
    #[arg(short, long, default_value_t = 3)]
    units: u32,

    /// Overrides `logging.level`.
    #[arg(short, long)]
    level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config: MaskaradeConfig = match &cli.config {
        Some(path) => load_config(Some(path))?,
        None => MaskaradeConfig::default(),
    };
    if let Some(level) = cli.level {
        config.logging.level = level;
    }

    let _logger = init_logger(&config.logging)?;
    run(&config, cli.units)
}

fn run(config: &MaskaradeConfig, units: u32) -> anyhow::Result<()> {
    let registry = Registry::new();

    let device = ModelType::builder()
        .name("Device")
        .reference("online", ModelRef::new(ValueType::Bool, "plant.dev-{id}.online"))
        .constant("vendor", "acme")
        .build();
    let thermostat = ModelType::builder()
        .name("Thermostat")
        .extends(&device)
        .reference("temp", ModelRef::new(ValueType::Float, "plant.dev-{id}.temp"))
        .reference("setpoint", ModelRef::new(ValueType::Float, "plant.dev-{id}.setpoint"))
        .declare_opaque("label", "String")
        .build();

    let factory = ModelFactory::new(&registry).strict(config.factory.strict_placeholders);
    let models = (1..=units)
        .map(|id| {
            let params = FormatParams::new().with("id", id);
            factory.instantiate(&thermostat, "Thermostat{id}", true, &params)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let connector = Arc::new(MemoryConnector::new());
    let manager = ModelsManager::new(&registry, connector.clone(), models)?;

    for (id, model) in (1..=units).zip(manager.models()) {
        let temp = model.reference("temp").context("thermostat without `temp`")?;
        let online = model.reference("online").context("thermostat without `online`")?;

        online.write(true)?;
        temp.write(19.5 + f64::from(id))?;
        let reading: f64 = temp.read_as()?;
        temp.emit(EventChannel::Status, "sampled")?;

        info!(model = %model.name(), reference = temp.name(), reading, "Round trip complete");
    }

    if let Some(first) = manager.models().first() {
        let setpoint = first.reference("setpoint").context("thermostat without `setpoint`")?;
        let target = Arc::downgrade(setpoint);
        setpoint.set_event_handler(move |event| {
            let Some(target) = target.upgrade() else { return };
            if let Err(err) = target.write(event.payload().clone()) {
                warn!(%err, "Failed to apply setpoint command");
            }
        });

        connector.push_incoming(Event::new(setpoint.name(), EventChannel::Command, 22.5));
        manager.dispatch_next()?;
        let applied = setpoint.read()?;
        info!(reference = setpoint.name(), value = %applied, "Setpoint command applied");
    }

    println!("{:<28} {:<14} {}", "REFERENCE", "MODEL", "FIELD");
    for entry in registry.associations() {
        println!("{:<28} {:<14} {}", entry.name(), entry.model().name(), entry.field());
    }
    println!("\n{} models, {} events sent", registry.final_models().len(), connector.sent_events().len());

    Ok(())
}

//! Temperature Converter
//!
//! Two linked inputs. Typing in one field keeps the raw text and computes the
//! other; clearing a field clears both.
//!
//! Run with: cargo run --example temperature

use serde::Serialize;
use statecraft::builder::{MachineBuilder, TransitionBuilder};
use statecraft::core::Event;
use statecraft::interpreter::Interpreter;
use statecraft::state_enum;

state_enum! {
    enum Converter {
        Active,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum TemperatureEvent {
    Celsius(String),
    Fahrenheit(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TemperatureKind {
    Celsius,
    Fahrenheit,
}

impl Event for TemperatureEvent {
    type Kind = TemperatureKind;

    fn kind(&self) -> TemperatureKind {
        match self {
            Self::Celsius(_) => TemperatureKind::Celsius,
            Self::Fahrenheit(_) => TemperatureKind::Fahrenheit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
enum Reading {
    Degrees(f64),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
struct Temperature {
    celsius: Option<Reading>,
    fahrenheit: Option<Reading>,
}

fn convert(input: &str, formula: fn(f64) -> f64) -> Option<Reading> {
    if input.is_empty() {
        return Some(Reading::Text(String::new()));
    }
    input
        .trim()
        .parse::<f64>()
        .ok()
        .map(|value| Reading::Degrees(formula(value)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Temperature Converter ===\n");

    let definition = MachineBuilder::new(Converter::Active, Temperature::default())
        .id("temperature")
        .state(Converter::Active, |s| {
            s.on(
                TemperatureKind::Celsius,
                TransitionBuilder::new().assign(|ctx: &Temperature, event: Option<&TemperatureEvent>| {
                    match event {
                        Some(TemperatureEvent::Celsius(value)) => Temperature {
                            celsius: Some(Reading::Text(value.clone())),
                            fahrenheit: convert(value, |c| c * (9.0 / 5.0) + 32.0),
                        },
                        _ => ctx.clone(),
                    }
                }),
            )
            .on(
                TemperatureKind::Fahrenheit,
                TransitionBuilder::new().assign(|ctx: &Temperature, event: Option<&TemperatureEvent>| {
                    match event {
                        Some(TemperatureEvent::Fahrenheit(value)) => Temperature {
                            celsius: convert(value, |f| (f - 32.0) * 5.0 / 9.0),
                            fahrenheit: Some(Reading::Text(value.clone())),
                        },
                        _ => ctx.clone(),
                    }
                }),
            )
        })
        .build()?;

    let mut converter = Interpreter::new(definition);
    converter.subscribe(|snapshot| match serde_json::to_string(snapshot.context()) {
        Ok(json) => println!("  {json}"),
        Err(e) => eprintln!("  render failed: {e}"),
    });
    converter.start()?;

    for input in [
        TemperatureEvent::Celsius("100".to_string()),
        TemperatureEvent::Fahrenheit("-40".to_string()),
        TemperatureEvent::Fahrenheit(String::new()),
    ] {
        println!("{input:?}");
        converter.send(input)?;
    }

    converter.stop();
    Ok(())
}

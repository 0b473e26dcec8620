//! Flight Booker
//!
//! A form that can only be submitted once its dates are valid. The submit
//! button is enabled with a side-effect-free lookahead (`can`) instead of
//! duplicating the guard logic in the UI.
//!
//! Key concepts:
//! - Guards that read the event payload
//! - Final states and `done`
//! - Lookahead queries for enabling affordances
//! - Checkpointing a finished booking
//!
//! Run with: RUST_LOG=statecraft=debug cargo run --example flight_booker

use serde::{Deserialize, Serialize};
use statecraft::builder::{goto, MachineBuilder, TransitionBuilder};
use statecraft::core::{Event, Snapshot};
use statecraft::interpreter::Interpreter;
use statecraft::state_enum;

state_enum! {
    enum Booking {
        Editing,
        Submitted,
    }
    final: [Submitted]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum Trip {
    OneWay,
    RoundTrip,
}

#[derive(Clone, Debug, PartialEq)]
enum FlightEvent {
    SetTrip(Trip),
    StartDate(String),
    ReturnDate(String),
    Submit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum FlightKind {
    SetTrip,
    StartDate,
    ReturnDate,
    Submit,
}

impl Event for FlightEvent {
    type Kind = FlightKind;

    fn kind(&self) -> FlightKind {
        match self {
            Self::SetTrip(_) => FlightKind::SetTrip,
            Self::StartDate(_) => FlightKind::StartDate,
            Self::ReturnDate(_) => FlightKind::ReturnDate,
            Self::Submit => FlightKind::Submit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Flight {
    trip: Trip,
    start_date: Option<String>,
    return_date: Option<String>,
}

fn render(snapshot: &Snapshot<Booking, Flight>, can_submit: bool) {
    let flight = snapshot.context();
    println!(
        "  {:?} | start: {:<10} | return: {:<10} | [{}]",
        flight.trip,
        flight.start_date.as_deref().unwrap_or("-"),
        flight.return_date.as_deref().unwrap_or("-"),
        match (snapshot.done(), can_submit) {
            (true, _) => "Success!",
            (false, true) => "Submit",
            (false, false) => "Submit (disabled)",
        }
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Flight Booker ===\n");

    let initial = Flight {
        trip: Trip::OneWay,
        start_date: None,
        return_date: None,
    };

    let definition = MachineBuilder::new(Booking::Editing, initial)
        .id("flight")
        .guard("isValidInput", |ctx: &Flight, _| {
            let start = ctx.start_date.as_deref().filter(|d| !d.is_empty());
            match ctx.trip {
                Trip::OneWay => start.is_some(),
                Trip::RoundTrip => matches!(
                    (start, ctx.return_date.as_deref()),
                    (Some(start), Some(back)) if back > start
                ),
            }
        })
        .state(Booking::Editing, |s| {
            s.on(
                FlightKind::SetTrip,
                TransitionBuilder::new().assign(|ctx: &Flight, event: Option<&FlightEvent>| {
                    match event {
                        Some(FlightEvent::SetTrip(trip)) => Flight {
                            trip: *trip,
                            ..ctx.clone()
                        },
                        _ => ctx.clone(),
                    }
                }),
            )
            .on(
                FlightKind::StartDate,
                TransitionBuilder::new().assign(|ctx: &Flight, event: Option<&FlightEvent>| {
                    match event {
                        Some(FlightEvent::StartDate(date)) => Flight {
                            start_date: Some(date.clone()),
                            ..ctx.clone()
                        },
                        _ => ctx.clone(),
                    }
                }),
            )
            .on(
                FlightKind::ReturnDate,
                TransitionBuilder::new()
                    .when(|ctx: &Flight, _| ctx.trip == Trip::RoundTrip)
                    .assign(|ctx: &Flight, event: Option<&FlightEvent>| match event {
                        Some(FlightEvent::ReturnDate(date)) => Flight {
                            return_date: Some(date.clone()),
                            ..ctx.clone()
                        },
                        _ => ctx.clone(),
                    }),
            )
            .on(
                FlightKind::Submit,
                goto(Booking::Submitted).guard_named("isValidInput"),
            )
        })
        .final_state(Booking::Submitted)
        .build()?;

    let mut booker = Interpreter::new(definition);
    booker.start()?;

    let inputs = [
        FlightEvent::Submit,
        FlightEvent::SetTrip(Trip::RoundTrip),
        FlightEvent::StartDate("2024-01-10".to_string()),
        FlightEvent::ReturnDate("2024-01-05".to_string()),
        FlightEvent::ReturnDate("2024-01-12".to_string()),
        FlightEvent::Submit,
    ];

    for input in inputs {
        println!("{input:?}");
        booker.send(input)?;
        render(booker.snapshot(), booker.can(&FlightEvent::Submit));
    }

    let checkpoint = booker.checkpoint();
    println!("\nCheckpoint:\n{}", checkpoint.to_json()?);
    booker.stop();
    Ok(())
}

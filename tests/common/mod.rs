//! Machines shared by the integration tests.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use statecraft::builder::{goto, MachineBuilder, TransitionBuilder};
use statecraft::core::{Action, Event};
use statecraft::definition::MachineDefinition;
use statecraft::effects::interval;
use statecraft::state_enum;
use std::time::Duration;

// Counter, bounded to 0..=10.

state_enum! {
    pub enum CounterState {
        Active,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterEvent {
    Increment,
    Decrement,
}

impl Event for CounterEvent {
    type Kind = Self;

    fn kind(&self) -> Self {
        *self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub count: u32,
}

pub const COUNTER_MAX: u32 = 10;

pub fn counter() -> MachineDefinition<CounterState, Counter, CounterEvent> {
    MachineBuilder::new(CounterState::Active, Counter { count: 0 })
        .id("counter")
        .guard("aboveZero", |ctx: &Counter, _| ctx.count > 0)
        .guard("belowMax", |ctx: &Counter, _| ctx.count < COUNTER_MAX)
        .action(
            "increment",
            Action::assign(|ctx: &Counter, _| Counter { count: ctx.count + 1 }),
        )
        .action(
            "decrement",
            Action::assign(|ctx: &Counter, _| Counter { count: ctx.count - 1 }),
        )
        .state(CounterState::Active, |s| {
            s.on(
                CounterEvent::Increment,
                TransitionBuilder::new()
                    .guard_named("belowMax")
                    .action_named("increment"),
            )
            .on(
                CounterEvent::Decrement,
                TransitionBuilder::new()
                    .guard_named("aboveZero")
                    .action_named("decrement"),
            )
        })
        .build()
        .expect("counter definition is valid")
}

// Flight booker.

state_enum! {
    pub enum Booking {
        Editing,
        Submitted,
    }
    final: [Submitted]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trip {
    OneWay,
    RoundTrip,
}

impl Trip {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "oneWay" => Some(Self::OneWay),
            "roundTrip" => Some(Self::RoundTrip),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlightEvent {
    SetTrip(String),
    StartDate(String),
    ReturnDate(String),
    Submit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlightKind {
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
pub struct Flight {
    pub trip: Trip,
    pub start_date: Option<String>,
    pub return_date: Option<String>,
}

fn is_valid_input(flight: &Flight) -> bool {
    let start = flight.start_date.as_deref().filter(|d| !d.is_empty());
    match flight.trip {
        Trip::OneWay => start.is_some(),
        Trip::RoundTrip => match (start, flight.return_date.as_deref()) {
            (Some(start), Some(back)) => back > start,
            _ => false,
        },
    }
}

pub fn flight() -> MachineDefinition<Booking, Flight, FlightEvent> {
    let initial = Flight {
        trip: Trip::OneWay,
        start_date: None,
        return_date: None,
    };

    MachineBuilder::new(Booking::Editing, initial)
        .id("flight")
        .guard("isRoundTrip", |ctx: &Flight, _| ctx.trip == Trip::RoundTrip)
        .guard("isValidType", |_, event: Option<&FlightEvent>| {
            matches!(event, Some(FlightEvent::SetTrip(value)) if Trip::parse(value).is_some())
        })
        .guard("isValidInput", |ctx: &Flight, _| is_valid_input(ctx))
        .action(
            "setStartDate",
            Action::assign(|ctx: &Flight, event: Option<&FlightEvent>| match event {
                Some(FlightEvent::StartDate(value)) => Flight {
                    start_date: Some(value.clone()),
                    ..ctx.clone()
                },
                _ => ctx.clone(),
            }),
        )
        .action(
            "setReturnDate",
            Action::assign(|ctx: &Flight, event: Option<&FlightEvent>| match event {
                Some(FlightEvent::ReturnDate(value)) => Flight {
                    return_date: Some(value.clone()),
                    ..ctx.clone()
                },
                _ => ctx.clone(),
            }),
        )
        .action(
            "setTrip",
            Action::assign(|ctx: &Flight, event: Option<&FlightEvent>| {
                let trip = match event {
                    Some(FlightEvent::SetTrip(value)) => Trip::parse(value),
                    _ => None,
                };
                Flight {
                    trip: trip.unwrap_or(ctx.trip),
                    ..ctx.clone()
                }
            }),
        )
        .state(Booking::Editing, |s| {
            s.on(
                FlightKind::StartDate,
                TransitionBuilder::new().action_named("setStartDate"),
            )
            .on(
                FlightKind::ReturnDate,
                TransitionBuilder::new()
                    .guard_named("isRoundTrip")
                    .action_named("setReturnDate"),
            )
            .on(
                FlightKind::SetTrip,
                TransitionBuilder::new()
                    .guard_named("isValidType")
                    .action_named("setTrip"),
            )
            .on(
                FlightKind::Submit,
                goto(Booking::Submitted).guard_named("isValidInput"),
            )
        })
        .final_state(Booking::Submitted)
        .build()
        .expect("flight definition is valid")
}

// Temperature converter.

state_enum! {
    pub enum Converter {
        Active,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TemperatureEvent {
    Celsius(String),
    Fahrenheit(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemperatureKind {
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

/// What the user typed, or a value computed from the other field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Degrees(f64),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub celsius: Option<Reading>,
    pub fahrenheit: Option<Reading>,
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

pub fn temperature() -> MachineDefinition<Converter, Temperature, TemperatureEvent> {
    MachineBuilder::new(Converter::Active, Temperature::default())
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
        .build()
        .expect("temperature definition is valid")
}

// Timer.

state_enum! {
    pub enum TimerState {
        Running,
        Paused,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TimerEvent {
    Tick,
    DurationUpdate(f64),
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Tick,
    DurationUpdate,
    Reset,
}

impl Event for TimerEvent {
    type Kind = TimerKind;

    fn kind(&self) -> TimerKind {
        match self {
            Self::Tick => TimerKind::Tick,
            Self::DurationUpdate(_) => TimerKind::DurationUpdate,
            Self::Reset => TimerKind::Reset,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    /// Seconds elapsed, rounded to hundredths.
    pub elapsed: f64,
    pub duration: f64,
    /// Tick period in seconds.
    pub interval: f64,
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn timer(duration: f64) -> MachineDefinition<TimerState, Timer, TimerEvent> {
    let initial = Timer {
        elapsed: 0.0,
        duration,
        interval: 0.1,
    };

    MachineBuilder::new(TimerState::Running, initial)
        .id("timer")
        .state(TimerState::Running, |s| {
            s.invoke(interval(
                "ticker",
                |ctx: &Timer| Duration::from_secs_f64(ctx.interval),
                || TimerEvent::Tick,
            ))
            .on(
                TimerKind::Tick,
                TransitionBuilder::new().assign(|ctx: &Timer, _| Timer {
                    elapsed: round_hundredths(ctx.elapsed + ctx.interval),
                    ..ctx.clone()
                }),
            )
            .always(
                TransitionBuilder::new()
                    .when(|ctx: &Timer, _| ctx.elapsed >= ctx.duration)
                    .to(TimerState::Paused),
            )
        })
        .state(TimerState::Paused, |s| {
            s.always(
                TransitionBuilder::new()
                    .when(|ctx: &Timer, _| ctx.elapsed < ctx.duration)
                    .to(TimerState::Running),
            )
        })
        .on(
            TimerKind::DurationUpdate,
            TransitionBuilder::new().assign(|ctx: &Timer, event: Option<&TimerEvent>| {
                match event {
                    Some(TimerEvent::DurationUpdate(duration)) => Timer {
                        duration: *duration,
                        ..ctx.clone()
                    },
                    _ => ctx.clone(),
                }
            }),
        )
        .on(
            TimerKind::Reset,
            TransitionBuilder::new().assign(|ctx: &Timer, _| Timer {
                elapsed: 0.0,
                ..ctx.clone()
            }),
        )
        .build()
        .expect("timer definition is valid")
}

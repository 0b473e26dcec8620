//! Bounded Counter
//!
//! A single-state machine whose context is a number kept between 0 and 10.
//! Guards and actions are registered by name and referenced from the
//! transitions.
//!
//! Key concepts:
//! - Named guards and actions
//! - Internal transitions that only update context
//! - Subscribers rendering each settled snapshot
//!
//! Run with: RUST_LOG=statecraft=debug cargo run --example counter

use statecraft::builder::{MachineBuilder, TransitionBuilder};
use statecraft::core::{Action, Event};
use statecraft::interpreter::Interpreter;
use statecraft::state_enum;

state_enum! {
    enum CounterState {
        Active,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum CounterEvent {
    Increment,
    Decrement,
}

impl Event for CounterEvent {
    type Kind = Self;

    fn kind(&self) -> Self {
        *self
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    count: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Bounded Counter ===\n");

    let definition = MachineBuilder::new(CounterState::Active, Counter { count: 0 })
        .id("counter")
        .guard("aboveZero", |ctx: &Counter, _| ctx.count > 0)
        .guard("belowMax", |ctx: &Counter, _| ctx.count < 10)
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
        .build()?;

    let mut counter = Interpreter::new(definition);
    counter.subscribe(|snapshot| println!("  [ - ] {:>2} [ + ]", snapshot.context().count));
    counter.start()?;

    println!("\nDecrement at zero is blocked by the guard:");
    counter.send(CounterEvent::Decrement)?;

    println!("\nTwelve increments, the last two are blocked:");
    for _ in 0..12 {
        counter.send(CounterEvent::Increment)?;
    }

    println!("\nFinal count: {}", counter.context().count);
    counter.stop();
    Ok(())
}

//! Elapsed Timer
//!
//! A timer driven by an invoked interval effect. When the elapsed time
//! reaches the duration an eventless transition pauses it, which stops the
//! interval; resetting or extending the duration resumes it.
//!
//! Key concepts:
//! - Invoked effects bound to a state's lifetime
//! - Eventless transitions
//! - Driving effect events with `process_next`
//!
//! Run with: RUST_LOG=statecraft=debug cargo run --example timer

use statecraft::builder::{MachineBuilder, TransitionBuilder};
use statecraft::core::Event;
use statecraft::effects::interval;
use statecraft::interpreter::Interpreter;
use statecraft::state_enum;
use std::time::Duration;

state_enum! {
    enum TimerState {
        Running,
        Paused,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum TimerEvent {
    Tick,
    DurationUpdate(f64),
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TimerKind {
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

#[derive(Clone, Debug, PartialEq)]
struct Timer {
    elapsed: f64,
    duration: f64,
    interval: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Elapsed Timer ===\n");

    let initial = Timer {
        elapsed: 0.0,
        duration: 1.0,
        interval: 0.1,
    };

    let definition = MachineBuilder::new(TimerState::Running, initial)
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
                    elapsed: ((ctx.elapsed + ctx.interval) * 100.0).round() / 100.0,
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
            TransitionBuilder::new().assign(|ctx: &Timer, event: Option<&TimerEvent>| match event {
                Some(TimerEvent::DurationUpdate(duration)) => Timer {
                    duration: *duration,
                    ..ctx.clone()
                },
                _ => ctx.clone(),
            }),
        )
        .on(
            TimerKind::Reset,
            TransitionBuilder::new().assign(|ctx: &Timer, _| Timer {
                elapsed: 0.0,
                ..ctx.clone()
            }),
        )
        .build()?;

    let mut timer = Interpreter::new(definition);
    timer.subscribe(|snapshot| {
        let ctx = snapshot.context();
        println!(
            "  {:?}: {:.1}s / {:.1}s",
            snapshot.state(),
            ctx.elapsed,
            ctx.duration
        );
    });
    timer.start()?;

    while timer.state() == &TimerState::Running {
        timer.process_next().await?;
    }

    println!("\nExtending duration to 1.5s");
    timer.send(TimerEvent::DurationUpdate(1.5))?;
    while timer.state() == &TimerState::Running {
        timer.process_next().await?;
    }

    println!("\nReset");
    timer.send(TimerEvent::Reset)?;
    for _ in 0..3 {
        timer.process_next().await?;
    }

    for warning in timer.stop() {
        eprintln!("cleanup failed: {warning}");
    }
    Ok(())
}

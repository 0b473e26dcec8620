//! The running interpreter.

use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::core::{apply_actions, Event, Snapshot, State, StateHistory, StateTransition};
use crate::definition::{MachineDefinition, TransitionDef};
use crate::effects::{EffectError, EffectHandle, Envelope, EventSender, Origin};
use crate::interpreter::error::InterpreterError;
use crate::interpreter::options::InterpreterOptions;
use crate::interpreter::subscription::{SubscriptionId, Subscribers};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

/// Lifecycle of an interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpreterStatus {
    NotStarted,
    Running,
    Stopped,
}

struct ActiveEffect {
    generation: u64,
    handle: EffectHandle,
}

/// A live instance of a [`MachineDefinition`].
///
/// The interpreter owns the current snapshot, the invoked effect of the
/// current state, the subscriber list and an event inbox. Every event, no
/// matter who sends it, goes through the inbox and is resolved to completion
/// (including eventless transitions) before the next one is looked at.
/// Subscribers see exactly one snapshot per resolved event.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{goto, MachineBuilder};
/// use statecraft::core::Event;
/// use statecraft::interpreter::Interpreter;
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum Toggle {
///         Off,
///         On,
///     }
/// }
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// struct Flip;
///
/// impl Event for Flip {
///     type Kind = Self;
///
///     fn kind(&self) -> Self {
///         *self
///     }
/// }
///
/// let definition = MachineBuilder::new(Toggle::Off, ())
///     .state(Toggle::Off, |s| s.on(Flip, goto(Toggle::On)))
///     .state(Toggle::On, |s| s.on(Flip, goto(Toggle::Off)))
///     .build()
///     .unwrap();
///
/// let mut toggle = Interpreter::new(definition);
/// toggle.start().unwrap();
/// toggle.send(Flip).unwrap();
///
/// assert_eq!(toggle.state(), &Toggle::On);
/// ```
pub struct Interpreter<S: State, C, E: Event> {
    id: Uuid,
    definition: Arc<MachineDefinition<S, C, E>>,
    options: InterpreterOptions,
    status: InterpreterStatus,
    snapshot: Snapshot<S, C>,
    history: StateHistory<S>,
    subscribers: Subscribers<S, C>,
    watch: watch::Sender<Snapshot<S, C>>,
    sender: EventSender<E>,
    inbox: mpsc::UnboundedReceiver<Envelope<E>>,
    effect: Option<ActiveEffect>,
    generation: u64,
    warnings: Vec<EffectError>,
}

impl<S: State, C, E: Event> Interpreter<S, C, E> {
    pub fn new(definition: impl Into<Arc<MachineDefinition<S, C, E>>>) -> Self {
        Self::with_options(definition, InterpreterOptions::default())
    }

    pub fn with_options(
        definition: impl Into<Arc<MachineDefinition<S, C, E>>>,
        options: InterpreterOptions,
    ) -> Self {
        let definition = definition.into();
        let snapshot = definition.initial_snapshot();
        Self::assemble(definition, options, snapshot, StateHistory::new())
    }

    /// Recreate an interpreter positioned at a checkpoint.
    ///
    /// The interpreter is not started; `start()` enters the checkpointed
    /// state, starting its effect and resolving eventless transitions.
    pub fn from_checkpoint(
        definition: impl Into<Arc<MachineDefinition<S, C, E>>>,
        checkpoint: Checkpoint<S, C>,
        options: InterpreterOptions,
    ) -> Result<Self, CheckpointError> {
        let definition = definition.into();
        checkpoint.validate(&*definition)?;
        let done = definition.is_final(&checkpoint.state);
        let snapshot = Snapshot::from_shared(checkpoint.state, checkpoint.context, done);
        Ok(Self::assemble(
            definition,
            options,
            snapshot,
            checkpoint.history,
        ))
    }

    fn assemble(
        definition: Arc<MachineDefinition<S, C, E>>,
        options: InterpreterOptions,
        snapshot: Snapshot<S, C>,
        history: StateHistory<S>,
    ) -> Self {
        let (sender, inbox) = EventSender::channel();
        let (watch_tx, _) = watch::channel(snapshot.clone());
        Self {
            id: Uuid::new_v4(),
            definition,
            options,
            status: InterpreterStatus::NotStarted,
            snapshot,
            history,
            subscribers: Subscribers::new(),
            watch: watch_tx,
            sender,
            inbox,
            effect: None,
            generation: 0,
            warnings: Vec::new(),
        }
    }

    /// Session id, unique per interpreter instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn definition(&self) -> &Arc<MachineDefinition<S, C, E>> {
        &self.definition
    }

    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    pub fn status(&self) -> InterpreterStatus {
        self.status
    }

    pub fn snapshot(&self) -> &Snapshot<S, C> {
        &self.snapshot
    }

    pub fn state(&self) -> &S {
        self.snapshot.state()
    }

    pub fn context(&self) -> &C {
        self.snapshot.context()
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// A sender feeding this interpreter's inbox.
    ///
    /// Events sent through it are processed by the next `send`, `start` or
    /// `process_next` call.
    pub fn sender(&self) -> EventSender<E> {
        self.sender.clone()
    }

    /// Effect failures collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<EffectError> {
        std::mem::take(&mut self.warnings)
    }

    /// Whether `event` would be accepted in the current snapshot.
    pub fn can(&self, event: &E) -> bool {
        self.status != InterpreterStatus::Stopped
            && self.definition.can_accept(&self.snapshot, event)
    }

    /// Start the interpreter.
    ///
    /// Enters the current state: its effect starts, eventless transitions are
    /// resolved and subscribers receive the settled snapshot. Events queued
    /// before start are then processed. Calling `start` again is a no-op.
    pub fn start(&mut self) -> Result<Snapshot<S, C>, InterpreterError> {
        match self.status {
            InterpreterStatus::Running => return Ok(self.snapshot.clone()),
            InterpreterStatus::Stopped => {
                tracing::debug!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    "start ignored, interpreter stopped"
                );
                return Ok(self.snapshot.clone());
            }
            InterpreterStatus::NotStarted => {}
        }

        self.status = InterpreterStatus::Running;
        tracing::debug!(
            machine = %self.definition.id(),
            session = %self.id,
            state = %self.snapshot.state().name(),
            "interpreter started"
        );

        let definition = Arc::clone(&self.definition);
        self.start_effect();
        let settled = self.resolve_eventless(&definition);
        self.emit();
        settled?;
        self.drain()?;
        Ok(self.snapshot.clone())
    }

    /// Send an event.
    ///
    /// The event is queued and the inbox is drained in arrival order, so
    /// events raised while this one is resolved are handled after it.
    /// Before `start` the event is deferred (or dropped when
    /// [`InterpreterOptions::defer_events`] is off); after `stop` it is
    /// ignored.
    pub fn send(&mut self, event: E) -> Result<(), InterpreterError> {
        match self.status {
            InterpreterStatus::Running => {
                self.sender.send(event);
                self.drain()
            }
            InterpreterStatus::NotStarted if self.options.defer_events => {
                tracing::trace!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    event = ?event.kind(),
                    "event deferred until start"
                );
                self.sender.send(event);
                Ok(())
            }
            InterpreterStatus::NotStarted => {
                tracing::warn!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    event = ?event.kind(),
                    "event sent before start dropped"
                );
                Ok(())
            }
            InterpreterStatus::Stopped => {
                tracing::trace!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    event = ?event.kind(),
                    "event sent after stop ignored"
                );
                Ok(())
            }
        }
    }

    /// Wait for the next queued event, then process it and everything queued
    /// behind it.
    ///
    /// This is how effect events (timers and the like) are driven. Returns
    /// the settled snapshot, or `None` when the interpreter is not running.
    pub async fn process_next(&mut self) -> Result<Option<Snapshot<S, C>>, InterpreterError> {
        if self.status != InterpreterStatus::Running {
            return Ok(None);
        }
        let Some(envelope) = self.inbox.recv().await else {
            return Ok(None);
        };
        self.process(envelope)?;
        self.drain()?;
        Ok(Some(self.snapshot.clone()))
    }

    /// Register an observer.
    ///
    /// A running interpreter replays the current snapshot to the new observer
    /// immediately. Subscribing to a stopped interpreter registers nothing.
    pub fn subscribe<F>(&mut self, mut observer: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot<S, C>) + Send + 'static,
    {
        let id = self.subscribers.allocate();
        match self.status {
            InterpreterStatus::Stopped => {}
            InterpreterStatus::Running => {
                observer(&self.snapshot);
                self.subscribers.insert(id, Box::new(observer));
            }
            InterpreterStatus::NotStarted => self.subscribers.insert(id, Box::new(observer)),
        }
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// A receiver that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<Snapshot<S, C>> {
        self.watch.subscribe()
    }

    /// Stop the interpreter.
    ///
    /// Stops the active effect, drops every subscriber and makes the
    /// interpreter inert. The inbox is closed: pending events are discarded
    /// and every [`EventSender`] returns `false` from then on. Returns the
    /// cleanup failures of this call; calling `stop` again returns nothing.
    pub fn stop(&mut self) -> Vec<EffectError> {
        if self.status == InterpreterStatus::Stopped {
            return Vec::new();
        }
        self.status = InterpreterStatus::Stopped;
        self.subscribers.clear();
        self.inbox.close();
        while self.inbox.try_recv().is_ok() {}

        let mut failures = Vec::new();
        if let Some(mut active) = self.effect.take() {
            if let Err(e) = active.handle.stop() {
                tracing::warn!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    "{e}"
                );
                failures.push(e);
            }
        }
        tracing::debug!(
            machine = %self.definition.id(),
            session = %self.id,
            state = %self.snapshot.state().name(),
            "interpreter stopped"
        );
        failures
    }

    /// Capture the current position for later resumption.
    pub fn checkpoint(&self) -> Checkpoint<S, C> {
        Checkpoint::capture(self.definition.id(), &self.snapshot, &self.history)
    }

    fn drain(&mut self) -> Result<(), InterpreterError> {
        while self.status == InterpreterStatus::Running {
            match self.inbox.try_recv() {
                Ok(envelope) => self.process(envelope)?,
                Err(_) => break,
            }
        }
        Ok(())
    }

    /// Resolve one event as a macrostep. Emits only if a transition was taken.
    fn process(&mut self, envelope: Envelope<E>) -> Result<(), InterpreterError> {
        let Envelope { event, origin } = envelope;

        if let Origin::Effect(generation) = origin {
            if self.effect.as_ref().map(|active| active.generation) != Some(generation) {
                tracing::trace!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    event = ?event.kind(),
                    generation,
                    "discarding event from stopped effect"
                );
                return Ok(());
            }
        }

        let definition = Arc::clone(&self.definition);
        let Some(transition) =
            definition.select(self.snapshot.state(), self.snapshot.context(), &event)
        else {
            tracing::trace!(
                machine = %definition.id(),
                session = %self.id,
                state = %self.snapshot.state().name(),
                event = ?event.kind(),
                "event not handled"
            );
            return Ok(());
        };

        self.take(&definition, transition, Some(&event));
        let settled = self.resolve_eventless(&definition);
        self.emit();
        settled
    }

    fn resolve_eventless(
        &mut self,
        definition: &MachineDefinition<S, C, E>,
    ) -> Result<(), InterpreterError> {
        let mut steps = 0;
        while let Some(transition) =
            definition.select_eventless(self.snapshot.state(), self.snapshot.context())
        {
            if steps == self.options.max_eventless_steps {
                tracing::warn!(
                    machine = %definition.id(),
                    session = %self.id,
                    state = %self.snapshot.state().name(),
                    steps,
                    "eventless transitions did not settle"
                );
                return Err(InterpreterError::NonTerminatingChain {
                    state: self.snapshot.state().name().to_string(),
                    steps,
                });
            }
            steps += 1;
            self.take(definition, transition, None);
        }
        Ok(())
    }

    /// Take a single selected transition.
    fn take(
        &mut self,
        definition: &MachineDefinition<S, C, E>,
        transition: &TransitionDef<S, C, E>,
        event: Option<&E>,
    ) {
        let context = apply_actions(
            transition.actions(),
            self.snapshot.shared_context(),
            event,
            Some(&self.sender),
        );

        let Some(target) = transition.target() else {
            self.snapshot = Snapshot::from_shared(
                self.snapshot.state().clone(),
                context,
                self.snapshot.done(),
            );
            return;
        };

        self.stop_effect();
        let from = self.snapshot.state().clone();
        let kind = event.map(|e| format!("{:?}", e.kind()));
        tracing::debug!(
            machine = %definition.id(),
            session = %self.id,
            from = %from.name(),
            to = %target.name(),
            event = kind.as_deref().unwrap_or("<eventless>"),
            "transition"
        );
        if self.options.record_history {
            self.history.push(
                StateTransition {
                    from,
                    to: target.clone(),
                    event: kind,
                    timestamp: Utc::now(),
                },
                self.options.history_limit,
            );
        }
        self.snapshot = Snapshot::from_shared(target.clone(), context, definition.is_final(target));
        self.start_effect();
    }

    fn start_effect(&mut self) {
        let Some(invoke) = self.definition.invoke(self.snapshot.state()) else {
            return;
        };
        self.generation += 1;
        let sender = self.sender.with_origin(Origin::Effect(self.generation));
        match invoke.start(self.snapshot.context(), sender) {
            Ok(handle) => {
                tracing::debug!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    effect = %handle.id(),
                    generation = self.generation,
                    "effect started"
                );
                self.effect = Some(ActiveEffect {
                    generation: self.generation,
                    handle,
                });
            }
            Err(e) => {
                tracing::warn!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    "{e}"
                );
                self.warnings.push(e);
            }
        }
    }

    fn stop_effect(&mut self) {
        if let Some(mut active) = self.effect.take() {
            if let Err(e) = active.handle.stop() {
                tracing::warn!(
                    machine = %self.definition.id(),
                    session = %self.id,
                    "{e}"
                );
                self.warnings.push(e);
            }
        }
    }

    fn emit(&mut self) {
        self.watch.send_replace(self.snapshot.clone());
        self.subscribers.notify(&self.snapshot);
    }
}

impl<S: State, C: fmt::Debug, E: Event> fmt::Debug for Interpreter<S, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("id", &self.id)
            .field("machine", &self.definition.id())
            .field("status", &self.status)
            .field("snapshot", &self.snapshot)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{goto, MachineBuilder, TransitionBuilder};
    use crate::core::Action;
    use crate::effects::Invoke;
    use crate::state_enum;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    state_enum! {
        enum Pump {
            Idle,
            Priming,
            Running,
            Broken,
            Jammed,
            Off,
        }
        final: [Off]
    }

    #[derive(Clone, Debug, PartialEq)]
    enum PumpEvent {
        Prime,
        Primed,
        Tick(u32),
        Restart,
        Jam,
        PowerOff,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum PumpKind {
        Prime,
        Primed,
        Tick,
        Restart,
        Jam,
        PowerOff,
    }

    impl Event for PumpEvent {
        type Kind = PumpKind;

        fn kind(&self) -> PumpKind {
            match self {
                Self::Prime => PumpKind::Prime,
                Self::Primed => PumpKind::Primed,
                Self::Tick(_) => PumpKind::Tick,
                Self::Restart => PumpKind::Restart,
                Self::Jam => PumpKind::Jam,
                Self::PowerOff => PumpKind::PowerOff,
            }
        }
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Gauge {
        pressure: u32,
        ticks: u32,
    }

    #[derive(Clone, Default)]
    struct Probe {
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
        senders: Arc<Mutex<Vec<EventSender<PumpEvent>>>>,
    }

    impl Probe {
        fn sensor(&self) -> Invoke<Gauge, PumpEvent> {
            let probe = self.clone();
            Invoke::new("sensor", move |_, sender| {
                probe.starts.fetch_add(1, Ordering::SeqCst);
                probe.senders.lock().unwrap().push(sender);
                let stops = Arc::clone(&probe.stops);
                Ok(EffectHandle::from_fn(move || {
                    stops.fetch_add(1, Ordering::SeqCst);
                }))
            })
        }

        fn starts(&self) -> usize {
            self.starts.load(Ordering::SeqCst)
        }

        fn stops(&self) -> usize {
            self.stops.load(Ordering::SeqCst)
        }

        fn sender(&self, index: usize) -> EventSender<PumpEvent> {
            self.senders.lock().unwrap()[index].clone()
        }
    }

    fn pump(probe: &Probe) -> MachineDefinition<Pump, Gauge, PumpEvent> {
        MachineBuilder::new(Pump::Idle, Gauge::default())
            .id("pump")
            .state(Pump::Idle, |s| {
                s.on(
                    PumpKind::Prime,
                    goto(Pump::Priming).action(Action::raise(|_, _| PumpEvent::Primed)),
                )
            })
            .state(Pump::Priming, |s| s.on(PumpKind::Primed, goto(Pump::Running)))
            .state(Pump::Running, |s| {
                s.invoke(probe.sensor())
                    .on(
                        PumpKind::Tick,
                        TransitionBuilder::new().assign(|g: &Gauge, event: Option<&PumpEvent>| {
                            let amount = match event {
                                Some(PumpEvent::Tick(n)) => *n,
                                _ => 0,
                            };
                            Gauge {
                                pressure: g.pressure + amount,
                                ticks: g.ticks + 1,
                            }
                        }),
                    )
                    .on(PumpKind::Restart, goto(Pump::Running))
                    .always(
                        TransitionBuilder::new()
                            .when(|g: &Gauge, _| g.pressure >= 10)
                            .to(Pump::Broken),
                    )
            })
            .state(Pump::Broken, |s| {
                s.on(
                    PumpKind::Restart,
                    goto(Pump::Running).assign(|g: &Gauge, _| Gauge {
                        pressure: 0,
                        ..g.clone()
                    }),
                )
            })
            .state(Pump::Jammed, |s| {
                s.invoke(Invoke::new("motor", |_, _| {
                    Err(EffectError::StartFailed {
                        id: "motor".to_string(),
                        reason: "stalled".to_string(),
                    })
                }))
            })
            .final_state(Pump::Off)
            .on(PumpKind::Jam, goto(Pump::Jammed))
            .on(PumpKind::PowerOff, goto(Pump::Off))
            .build()
            .unwrap()
    }

    fn recorder(interpreter: &mut Interpreter<Pump, Gauge, PumpEvent>) -> Arc<Mutex<Vec<Pump>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        interpreter.subscribe(move |snapshot| sink.lock().unwrap().push(*snapshot.state()));
        seen
    }

    fn running(probe: &Probe) -> Interpreter<Pump, Gauge, PumpEvent> {
        let mut interpreter = Interpreter::new(pump(probe));
        interpreter.start().unwrap();
        interpreter.send(PumpEvent::Prime).unwrap();
        interpreter
    }

    #[test]
    fn start_emits_settled_snapshot_once() {
        let probe = Probe::default();
        let mut interpreter = Interpreter::new(pump(&probe));
        let seen = recorder(&mut interpreter);

        let snapshot = interpreter.start().unwrap();
        interpreter.start().unwrap();

        assert_eq!(snapshot.state(), &Pump::Idle);
        assert_eq!(interpreter.status(), InterpreterStatus::Running);
        assert_eq!(*seen.lock().unwrap(), vec![Pump::Idle]);
    }

    #[test]
    fn raised_events_run_after_the_current_step() {
        let probe = Probe::default();
        let mut interpreter = Interpreter::new(pump(&probe));
        let seen = recorder(&mut interpreter);
        interpreter.start().unwrap();

        interpreter.send(PumpEvent::Prime).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Pump::Idle, Pump::Priming, Pump::Running]
        );
        assert_eq!(probe.starts(), 1);
    }

    #[test]
    fn unhandled_event_changes_nothing_and_emits_nothing() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);
        let seen = recorder(&mut interpreter);
        let before = interpreter.snapshot().clone();

        interpreter.send(PumpEvent::Primed).unwrap();

        assert_eq!(interpreter.snapshot(), &before);
        assert!(Arc::ptr_eq(
            interpreter.snapshot().shared_context(),
            before.shared_context()
        ));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn internal_transition_keeps_effect_running() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);

        interpreter.send(PumpEvent::Tick(3)).unwrap();
        interpreter.send(PumpEvent::Tick(4)).unwrap();

        assert_eq!(interpreter.context(), &Gauge { pressure: 7, ticks: 2 });
        assert_eq!(probe.starts(), 1);
        assert_eq!(probe.stops(), 0);
    }

    #[test]
    fn self_target_restarts_effect() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);

        interpreter.send(PumpEvent::Restart).unwrap();

        assert_eq!(interpreter.state(), &Pump::Running);
        assert_eq!(probe.starts(), 2);
        assert_eq!(probe.stops(), 1);
    }

    #[test]
    fn eventless_transition_settles_before_emitting() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);
        let seen = recorder(&mut interpreter);

        interpreter.send(PumpEvent::Tick(12)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![Pump::Running, Pump::Broken]);
        assert_eq!(interpreter.context().pressure, 12);
        assert_eq!(probe.stops(), 1);
    }

    #[test]
    fn events_from_stopped_effects_are_discarded() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);
        let stale = probe.sender(0);

        interpreter.send(PumpEvent::Restart).unwrap();
        assert!(stale.send(PumpEvent::Tick(5)));
        probe.sender(1).send(PumpEvent::Tick(1));
        interpreter.send(PumpEvent::Tick(2)).unwrap();

        assert_eq!(interpreter.context(), &Gauge { pressure: 3, ticks: 2 });
    }

    #[test]
    fn events_before_start_are_deferred() {
        let probe = Probe::default();
        let mut interpreter = Interpreter::new(pump(&probe));

        interpreter.send(PumpEvent::Prime).unwrap();
        assert_eq!(interpreter.state(), &Pump::Idle);

        interpreter.start().unwrap();
        assert_eq!(interpreter.state(), &Pump::Running);
    }

    #[test]
    fn events_before_start_can_be_dropped() {
        let probe = Probe::default();
        let options = InterpreterOptions::default().defer_events(false);
        let mut interpreter = Interpreter::with_options(pump(&probe), options);

        interpreter.send(PumpEvent::Prime).unwrap();
        interpreter.start().unwrap();

        assert_eq!(interpreter.state(), &Pump::Idle);
    }

    #[test]
    fn runaway_eventless_chain_is_reported() {
        let definition = MachineBuilder::<Pump, Gauge, PumpEvent>::new(Pump::Idle, Gauge::default())
            .state(Pump::Idle, |s| {
                s.always(TransitionBuilder::new().assign(|g: &Gauge, _| Gauge {
                    ticks: g.ticks + 1,
                    ..g.clone()
                }))
            })
            .build()
            .unwrap();
        let options = InterpreterOptions::default().max_eventless_steps(5);
        let mut interpreter = Interpreter::with_options(definition, options);

        let error = interpreter.start().unwrap_err();

        assert_eq!(
            error,
            InterpreterError::NonTerminatingChain {
                state: "Idle".to_string(),
                steps: 5,
            }
        );
        assert_eq!(interpreter.context().ticks, 5);
    }

    #[test]
    fn history_records_entered_states() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);
        interpreter.send(PumpEvent::Tick(10)).unwrap();

        let history = interpreter.history();
        assert_eq!(
            history.get_path(),
            vec![&Pump::Idle, &Pump::Priming, &Pump::Running, &Pump::Broken]
        );
        let events: Vec<_> = history
            .transitions()
            .iter()
            .map(|t| t.event.as_deref())
            .collect();
        assert_eq!(events, vec![Some("Prime"), Some("Primed"), None]);
    }

    #[test]
    fn history_can_be_disabled() {
        let probe = Probe::default();
        let options = InterpreterOptions::default().record_history(false);
        let mut interpreter = Interpreter::with_options(pump(&probe), options);
        interpreter.start().unwrap();
        interpreter.send(PumpEvent::Prime).unwrap();

        assert!(interpreter.history().is_empty());
    }

    #[test]
    fn history_limit_keeps_latest_transitions() {
        let probe = Probe::default();
        let options = InterpreterOptions::default().history_limit(2);
        let mut interpreter = Interpreter::with_options(pump(&probe), options);
        interpreter.start().unwrap();
        interpreter.send(PumpEvent::Prime).unwrap();
        interpreter.send(PumpEvent::Tick(10)).unwrap();

        assert_eq!(
            interpreter.history().get_path(),
            vec![&Pump::Priming, &Pump::Running, &Pump::Broken]
        );
    }

    #[test]
    fn final_state_stops_effect_and_accepts_nothing() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);

        interpreter.send(PumpEvent::PowerOff).unwrap();

        assert!(interpreter.snapshot().done());
        assert_eq!(probe.stops(), 1);
        assert!(!interpreter.can(&PumpEvent::Restart));
        assert!(!interpreter.can(&PumpEvent::PowerOff));
        interpreter.send(PumpEvent::Jam).unwrap();
        assert_eq!(interpreter.state(), &Pump::Off);
    }

    #[test]
    fn effect_start_failure_is_a_warning() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);

        interpreter.send(PumpEvent::Jam).unwrap();

        assert_eq!(interpreter.state(), &Pump::Jammed);
        let warnings = interpreter.take_warnings();
        assert_eq!(
            warnings,
            vec![EffectError::StartFailed {
                id: "motor".to_string(),
                reason: "stalled".to_string(),
            }]
        );
        assert!(interpreter.take_warnings().is_empty());
    }

    #[test]
    fn stop_makes_interpreter_inert() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);
        let seen = recorder(&mut interpreter);

        assert!(interpreter.stop().is_empty());
        assert!(interpreter.stop().is_empty());
        assert_eq!(probe.stops(), 1);
        assert_eq!(interpreter.status(), InterpreterStatus::Stopped);

        interpreter.send(PumpEvent::Tick(4)).unwrap();
        assert_eq!(interpreter.context().pressure, 0);

        let late = recorder(&mut interpreter);
        assert!(late.lock().unwrap().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![Pump::Running]);
        assert!(!interpreter.can(&PumpEvent::Tick(1)));
    }

    #[test]
    fn stop_closes_the_inbox() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);
        let sender = interpreter.sender();
        let effect = probe.sender(0);
        assert!(sender.send(PumpEvent::Tick(3)));

        interpreter.stop();

        assert!(sender.is_closed());
        assert!(!sender.send(PumpEvent::Tick(1)));
        assert!(!effect.send(PumpEvent::Tick(1)));
        assert_eq!(interpreter.context().pressure, 0);
    }

    fn valve() -> Invoke<Gauge, PumpEvent> {
        Invoke::new("valve", |_, _| {
            Ok(EffectHandle::new(|| Err("stuck".to_string())))
        })
    }

    fn leaky() -> MachineDefinition<Pump, Gauge, PumpEvent> {
        MachineBuilder::new(Pump::Idle, Gauge::default())
            .id("leaky")
            .state(Pump::Idle, |s| {
                s.invoke(valve()).on(PumpKind::Prime, goto(Pump::Running))
            })
            .state(Pump::Running, |s| s)
            .build()
            .unwrap()
    }

    fn stuck_valve() -> EffectError {
        EffectError::CleanupFailed {
            id: "valve".to_string(),
            reason: "stuck".to_string(),
        }
    }

    #[test]
    fn cleanup_failure_does_not_block_transition() {
        let mut interpreter = Interpreter::new(leaky());
        let seen = recorder(&mut interpreter);
        interpreter.start().unwrap();

        interpreter.send(PumpEvent::Prime).unwrap();

        assert_eq!(interpreter.state(), &Pump::Running);
        assert_eq!(*seen.lock().unwrap(), vec![Pump::Idle, Pump::Running]);
        assert_eq!(interpreter.take_warnings(), vec![stuck_valve()]);
        assert!(interpreter.stop().is_empty());
    }

    #[test]
    fn stop_returns_cleanup_failure() {
        let mut interpreter = Interpreter::new(leaky());
        interpreter.start().unwrap();

        assert_eq!(interpreter.stop(), vec![stuck_valve()]);
        assert!(interpreter.stop().is_empty());
        assert!(interpreter.take_warnings().is_empty());
        assert_eq!(interpreter.status(), InterpreterStatus::Stopped);
    }

    #[test]
    fn unsubscribed_observer_is_not_notified() {
        let probe = Probe::default();
        let mut interpreter = Interpreter::new(pump(&probe));
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let id = interpreter.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        interpreter.start().unwrap();

        assert!(interpreter.unsubscribe(id));
        assert!(!interpreter.unsubscribe(id));
        interpreter.send(PumpEvent::Prime).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn watch_holds_latest_snapshot() {
        let probe = Probe::default();
        let mut interpreter = Interpreter::new(pump(&probe));
        let receiver = interpreter.watch();
        interpreter.start().unwrap();

        interpreter.send(PumpEvent::Prime).unwrap();

        assert_eq!(receiver.borrow().state(), &Pump::Running);
    }

    #[test]
    fn resumes_from_checkpoint() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);
        interpreter.send(PumpEvent::Tick(4)).unwrap();
        let checkpoint = interpreter.checkpoint();
        interpreter.stop();

        let restored: Checkpoint<Pump, Gauge> =
            Checkpoint::from_json(&checkpoint.to_json().unwrap()).unwrap();
        let mut resumed =
            Interpreter::from_checkpoint(pump(&probe), restored, InterpreterOptions::default())
                .unwrap();
        resumed.start().unwrap();
        resumed.send(PumpEvent::Tick(6)).unwrap();

        assert_eq!(resumed.state(), &Pump::Broken);
        assert_eq!(resumed.context(), &Gauge { pressure: 10, ticks: 2 });
        assert_eq!(probe.starts(), 2);
        assert_eq!(resumed.history().len(), 3);
        assert_ne!(resumed.id(), interpreter.id());
    }

    #[tokio::test]
    async fn process_next_handles_effect_events() {
        let probe = Probe::default();
        let mut interpreter = running(&probe);

        probe.sender(0).send(PumpEvent::Tick(2));
        let snapshot = interpreter.process_next().await.unwrap().unwrap();
        assert_eq!(snapshot.context().pressure, 2);

        interpreter.stop();
        assert!(interpreter.process_next().await.unwrap().is_none());
    }
}

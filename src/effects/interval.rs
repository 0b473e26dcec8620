//! Periodic timer effect.

use crate::effects::invoke::{EffectError, EffectHandle, Invoke};
use crate::effects::sender::EventSender;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// An effect that sends `make_event()` every `period(context)`.
///
/// The period is read from the context captured on entry. The first event is
/// sent one full period after the state is entered. The timer task is
/// aborted when the state is exited.
///
/// Starting fails with [`EffectError::NoRuntime`] outside a Tokio runtime and
/// with [`EffectError::StartFailed`] for a zero period.
pub fn interval<C, E, P, M>(id: impl Into<String>, period: P, make_event: M) -> Invoke<C, E>
where
    C: 'static,
    E: Send + 'static,
    P: Fn(&C) -> Duration + Send + Sync + 'static,
    M: Fn() -> E + Send + Sync + 'static,
{
    let id = id.into();
    let effect_id = id.clone();
    let make_event = Arc::new(make_event);

    Invoke::new(id, move |ctx: &C, sender: EventSender<E>| {
        let runtime = Handle::try_current().map_err(|_| EffectError::NoRuntime {
            id: effect_id.clone(),
        })?;
        let period = period(ctx);
        if period.is_zero() {
            return Err(EffectError::StartFailed {
                id: effect_id.clone(),
                reason: "interval period must be non-zero".to_string(),
            });
        }

        let make_event = Arc::clone(&make_event);
        let task = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !sender.send(make_event()) {
                    break;
                }
            }
        });

        Ok(EffectHandle::from_task(task))
    })
}

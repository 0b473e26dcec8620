//! Invoked effects bound to a state's lifetime.

use crate::effects::sender::EventSender;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Errors raised while starting or stopping an invoked effect.
///
/// These never block the machine: the interpreter logs them and keeps them
/// as warnings.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EffectError {
    #[error("Effect '{id}' failed to start: {reason}")]
    StartFailed { id: String, reason: String },

    #[error("Effect '{id}' cleanup failed: {reason}")]
    CleanupFailed { id: String, reason: String },

    #[error("Effect '{id}' requires a Tokio runtime")]
    NoRuntime { id: String },
}

type Cleanup = Box<dyn FnOnce() -> Result<(), String> + Send>;

/// A running effect. Stopping runs its cleanup exactly once.
///
/// A handle that is dropped while still active runs its cleanup on drop, so
/// scheduled work cannot outlive the handle.
pub struct EffectHandle {
    id: String,
    cleanup: Option<Cleanup>,
}

impl EffectHandle {
    /// Create a handle from a fallible cleanup.
    pub fn new<F>(cleanup: F) -> Self
    where
        F: FnOnce() -> Result<(), String> + Send + 'static,
    {
        Self {
            id: String::new(),
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// Create a handle from a cleanup that cannot fail.
    pub fn from_fn<F>(cleanup: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(move || {
            cleanup();
            Ok(())
        })
    }

    /// Create a handle that aborts a spawned task on stop.
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self::from_fn(move || task.abort())
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self::from_fn(|| {})
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Stop the effect. Later calls are no-ops.
    pub fn stop(&mut self) -> Result<(), EffectError> {
        match self.cleanup.take() {
            Some(cleanup) => cleanup().map_err(|reason| EffectError::CleanupFailed {
                id: self.id.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl Drop for EffectHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(effect = %self.id, "{e}");
        }
    }
}

impl fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

type Factory<C, E> =
    dyn Fn(&C, EventSender<E>) -> Result<EffectHandle, EffectError> + Send + Sync;

/// Descriptor of the effect a state invokes while it is active.
///
/// The factory receives the context captured on entry and a sender for
/// pushing events back into the interpreter. It returns the handle whose
/// cleanup runs when the state is exited.
///
/// # Example
///
/// ```rust
/// use statecraft::effects::{EffectHandle, EventSender, Invoke};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let stopped = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&stopped);
/// let listener: Invoke<(), ()> = Invoke::new("listener", move |_ctx: &(), _tx: EventSender<()>| {
///     let flag = Arc::clone(&flag);
///     Ok(EffectHandle::from_fn(move || flag.store(true, Ordering::SeqCst)))
/// });
///
/// assert_eq!(listener.id(), "listener");
/// ```
pub struct Invoke<C, E> {
    id: String,
    factory: Arc<Factory<C, E>>,
}

impl<C, E> Invoke<C, E> {
    pub fn new<F>(id: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&C, EventSender<E>) -> Result<EffectHandle, EffectError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Start a fresh instance of the effect.
    pub fn start(&self, context: &C, sender: EventSender<E>) -> Result<EffectHandle, EffectError> {
        let mut handle = (self.factory)(context, sender)?;
        handle.id.clone_from(&self.id);
        Ok(handle)
    }
}

impl<C, E> Clone for Invoke<C, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<C, E> fmt::Debug for Invoke<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoke").field("id", &self.id).finish()
    }
}

//! Event channel between effects and the interpreter.

use tokio::sync::mpsc;

/// Where a queued event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Sent by a caller or an exec action.
    External,
    /// Sent by the invoked effect with this generation number.
    Effect(u64),
}

/// An event waiting in the interpreter inbox.
#[derive(Debug)]
pub struct Envelope<E> {
    pub event: E,
    pub origin: Origin,
}

/// Handle used to push events into an interpreter.
///
/// Effects receive one when they start; exec actions receive the
/// interpreter's own sender. Sending never blocks and never processes the
/// event inline: it is queued and handled under run-to-completion.
pub struct EventSender<E> {
    tx: mpsc::UnboundedSender<Envelope<E>>,
    origin: Origin,
}

impl<E> EventSender<E> {
    /// Create a sender and the inbox it feeds.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Envelope<E>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                origin: Origin::External,
            },
            rx,
        )
    }

    pub(crate) fn with_origin(&self, origin: Origin) -> Self {
        Self {
            tx: self.tx.clone(),
            origin,
        }
    }

    /// Queue an event. Returns `false` once the interpreter is gone.
    pub fn send(&self, event: E) -> bool {
        self.tx
            .send(Envelope {
                event,
                origin: self.origin,
            })
            .is_ok()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        self.with_origin(self.origin)
    }
}

//! UI-thread event queue
//!
//! Lifecycle notifications are produced by the session controller and by
//! the emulation core, which may live on another thread. They are never
//! delivered by direct call: producers push into the queue and the UI thread
//! drains it once per frame.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

/// Producer side of the queue. Cheap to clone and `Send`.
#[derive(Debug)]
pub struct EventSender<T> {
    inner: Sender<T>,
}

impl<T> Clone for EventSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> EventSender<T> {
    /// Post an event. Returns false once the receiving side is gone.
    pub fn post(&self, event: T) -> bool {
        self.inner.send(event).is_ok()
    }
}

/// Consumer side of the queue, owned by the UI thread
#[derive(Debug)]
pub struct EventReceiver<T> {
    inner: Receiver<T>,
}

impl<T> EventReceiver<T> {
    /// Take every event queued so far, in posting order
    pub fn drain(&self) -> Vec<T> {
        let mut events = Vec::new();
        loop {
            match self.inner.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Create an unbounded event queue
pub fn event_queue<T>() -> (EventSender<T>, EventReceiver<T>) {
    let (tx, rx) = channel::unbounded();
    (EventSender { inner: tx }, EventReceiver { inner: rx })
}

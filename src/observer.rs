//! Observer pattern for change streams
//!
//! A source pushes each new value to its observers. Observers never poll.
//!
//! ## Subscription handles
//!
//! Every registration is represented by a [`Subscription`]. Releasing it
//! (explicitly via [`Subscription::unsubscribe`] or by dropping it) clears a
//! shared `active` flag first and then detaches the observer from the source.
//! Sources check the flag right before each delivery, so an observer released
//! in the middle of an emission round receives nothing further.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Observer that receives emitted values
pub trait ChangeObserver: Send + Sync {
    /// Called for each emitted value, synchronously on the emitting thread
    fn on_change(&self, value: &str);
}

/// Function-based observer for simple cases
pub struct FnObserver<F: Fn(&str) + Send + Sync>(pub F);

impl<F: Fn(&str) + Send + Sync> ChangeObserver for FnObserver<F> {
    fn on_change(&self, value: &str) {
        (self.0)(value);
    }
}

/// Channel-based observer - forwards owned values to a channel
pub struct ChannelObserver {
    sender: Sender<String>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl ChangeObserver for ChannelObserver {
    fn on_change(&self, value: &str) {
        let _ = self.sender.send(value.to_owned());
    }
}

type Detach = Box<dyn FnOnce() + Send + Sync>;

/// Handle for one live registration on a change stream.
///
/// Release happens at most once: the detach callback runs on the first
/// `unsubscribe` or on drop, whichever comes first.
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    detach: Option<Detach>,
}

impl Subscription {
    /// Create a handle.
    ///
    /// `active` is shared with the source's registration and must start out
    /// `true`. `detach` removes the registration from the source.
    pub fn new(id: u64, active: Arc<AtomicBool>, detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            id,
            active,
            detach: Some(Box::new(detach)),
        }
    }

    /// Registration id assigned by the source.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the registration still receives values.
    pub fn is_active(&self) -> bool {
        self.detach.is_some() && self.active.load(Ordering::Acquire)
    }

    /// Stop receiving values.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            self.active.store(false, Ordering::Release);
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

//! Minimal component host
//!
//! Drives one instance through `initialize` and `dispose` using a shared,
//! already-decorated [`Prototype`].

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::error::BindingResult;
use crate::injector::Injector;
use crate::prototype::Prototype;

/// Where an instance is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `initialize` not yet attempted.
    Created,
    /// `initialize` succeeded.
    Initialized,
    /// `initialize` returned an error. Whatever it set up before failing is
    /// still released by `dispose`.
    Failed,
    /// `dispose` has run.
    Disposed,
}

/// An instance of `T` bound to its prototype's hooks.
///
/// Dropping an initialized (or failed) component disposes it.
pub struct Component<T: 'static> {
    prototype: Arc<Prototype<T>>,
    instance: T,
    phase: Phase,
}

impl<T: 'static> Component<T> {
    pub fn new(prototype: Arc<Prototype<T>>, instance: T) -> Self {
        Self {
            prototype,
            instance,
            phase: Phase::Created,
        }
    }

    /// Run the `initialize` hook.
    pub fn initialize(&mut self, injector: &Injector) -> BindingResult<()> {
        let result = self.prototype.initialize(&mut self.instance, injector);
        self.phase = match result {
            Ok(()) => Phase::Initialized,
            Err(_) => Phase::Failed,
        };
        result
    }

    /// Run the `dispose` hook once per initialization attempt.
    pub fn dispose(&mut self) {
        if matches!(self.phase, Phase::Initialized | Phase::Failed) {
            self.prototype.dispose(&mut self.instance);
            self.phase = Phase::Disposed;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn prototype(&self) -> &Arc<Prototype<T>> {
        &self.prototype
    }
}

impl<T: 'static> Deref for Component<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.instance
    }
}

impl<T: 'static> DerefMut for Component<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.instance
    }
}

impl<T: 'static> Drop for Component<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

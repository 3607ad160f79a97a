//! Change sources - a current value plus a stream of changes
//!
//! [`ChangeSource`] is the interface the binding consumes. [`LanguageService`]
//! is an in-memory implementation holding the active language.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use log::{debug, trace};
use parking_lot::{Mutex, RwLock};

use crate::config::ServiceConfig;
use crate::error::{BindingError, BindingResult};
use crate::observer::{ChangeObserver, Subscription};

/// A value that can be read synchronously and observed for changes.
pub trait ChangeSource: Send + Sync {
    /// Current value, read synchronously.
    fn current_value(&self) -> String;

    /// Register an observer for subsequent changes.
    ///
    /// Implementations may deliver a value to `observer` before returning.
    fn subscribe(&self, observer: Arc<dyn ChangeObserver>) -> Subscription;
}

#[derive(Clone)]
struct Registration {
    id: u64,
    observer: Arc<dyn ChangeObserver>,
    active: Arc<AtomicBool>,
}

impl Registration {
    fn deliver(&self, value: &str) {
        if self.active.load(Ordering::Acquire) {
            self.observer.on_change(value);
        }
    }
}

struct Inner {
    config: ServiceConfig,
    language: RwLock<String>,
    observers: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
}

/// In-memory language holder that broadcasts every change.
///
/// Cloning yields another handle to the same service.
#[derive(Clone)]
pub struct LanguageService {
    inner: Arc<Inner>,
}

impl LanguageService {
    /// Create a service from a validated configuration.
    pub fn new(config: ServiceConfig) -> BindingResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: ServiceConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                language: RwLock::new(config.default_language.clone()),
                config,
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Active language.
    pub fn language(&self) -> String {
        self.inner.language.read().clone()
    }

    /// Switch the active language.
    ///
    /// Returns `Ok(false)` without emitting when `language` is already active.
    /// Observers run on this thread, in subscription order, with no internal
    /// lock held. A panicking observer unwinds through this call.
    pub fn set_language(&self, language: &str) -> BindingResult<bool> {
        if !self.inner.config.supports(language) {
            return Err(BindingError::UnsupportedLanguage(language.to_owned()));
        }

        {
            let mut current = self.inner.language.write();
            if *current == language {
                return Ok(false);
            }
            *current = language.to_owned();
        }

        let observers = self.inner.observers.lock().clone();
        debug!("language changed to '{}', notifying {} observer(s)", language, observers.len());
        for registration in &observers {
            registration.deliver(language);
        }
        Ok(true)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    /// Get configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }
}

impl Default for LanguageService {
    fn default() -> Self {
        Self::from_config(ServiceConfig::default())
    }
}

impl ChangeSource for LanguageService {
    fn current_value(&self) -> String {
        self.language()
    }

    fn subscribe(&self, observer: Arc<dyn ChangeObserver>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let registration = Registration {
            id,
            observer,
            active: Arc::new(AtomicBool::new(true)),
        };
        let active = Arc::clone(&registration.active);
        self.inner.observers.lock().push(registration.clone());
        trace!("observer #{} subscribed", id);

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let subscription = Subscription::new(id, active, move || {
            if let Some(inner) = weak.upgrade() {
                inner.observers.lock().retain(|r| r.id != id);
                trace!("observer #{} unsubscribed", id);
            }
        });

        if self.inner.config.replay_on_subscribe {
            let current = self.language();
            registration.deliver(&current);
        }

        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::FnObserver;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, Arc<dyn ChangeObserver>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: Arc<dyn ChangeObserver> =
            Arc::new(FnObserver(move |v: &str| sink.lock().push(v.to_owned())));
        (seen, observer)
    }

    #[test]
    fn test_set_language_notifies_in_order() {
        let service = LanguageService::default();
        let (seen, observer) = recorder();
        let _sub = service.subscribe(observer);

        assert!(service.set_language("fr").unwrap());
        assert!(service.set_language("de").unwrap());

        assert_eq!(*seen.lock(), vec!["fr", "de"]);
        assert_eq!(service.language(), "de");
    }

    #[test]
    fn test_same_language_does_not_emit() {
        let service = LanguageService::default();
        let (seen, observer) = recorder();
        let _sub = service.subscribe(observer);

        assert!(!service.set_language("en").unwrap());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_unsupported_language_rejected() {
        let config = ServiceConfig::new("en").with_supported(["en", "fr"]);
        let service = LanguageService::new(config).unwrap();

        assert!(matches!(
            service.set_language("de"),
            Err(BindingError::UnsupportedLanguage(l)) if l == "de"
        ));
        assert_eq!(service.language(), "en");
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let service = LanguageService::default();
        let (seen, observer) = recorder();
        let sub = service.subscribe(observer);
        assert_eq!(service.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(service.subscriber_count(), 0);

        service.set_language("fr").unwrap();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_replay_on_subscribe() {
        let config = ServiceConfig::new("en").with_replay(true);
        let service = LanguageService::new(config).unwrap();
        let (seen, observer) = recorder();

        let _sub = service.subscribe(observer);
        assert_eq!(*seen.lock(), vec!["en"]);
    }

    #[test]
    fn test_unsubscribe_during_emission() {
        let service = LanguageService::default();
        let (seen, late) = recorder();

        // The first observer releases the second one mid-round.
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let victim = Arc::clone(&slot);
        let _first = service.subscribe(Arc::new(FnObserver(move |_: &str| {
            if let Some(sub) = victim.lock().take() {
                sub.unsubscribe();
            }
        })));
        *slot.lock() = Some(service.subscribe(late));

        service.set_language("fr").unwrap();
        assert!(seen.lock().is_empty());
        assert_eq!(service.subscriber_count(), 1);
    }
}

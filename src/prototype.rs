//! Per-type lifecycle hook table
//!
//! A [`Prototype`] holds the `initialize` and `dispose` hooks shared by every
//! instance of `T`. Decorators rewrite it once, while it is still owned
//! mutably; afterwards it is wrapped in an `Arc` and treated as read-only.

use std::fmt;
use std::sync::Arc;

use crate::decorator::LanguageDecorator;
use crate::error::BindingResult;
use crate::field::FieldKey;
use crate::injector::Injector;

/// Hook run after construction. Errors abort the initialization.
pub type InitHook<T> = Arc<dyn Fn(&mut T, &Injector) -> BindingResult<()> + Send + Sync>;

/// Hook run before destruction.
pub type DisposeHook<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

pub struct Prototype<T> {
    /// Type name, used in log lines and errors.
    name: &'static str,

    initialize: Option<InitHook<T>>,

    dispose: Option<DisposeHook<T>>,

    /// Bound fields declared by decorators, in decoration order.
    fields: Vec<&'static str>,
}

impl<T: 'static> Prototype<T> {
    /// Create a prototype with no hooks.
    pub fn new() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            initialize: None,
            dispose: None,
            fields: Vec::new(),
        }
    }

    /// Set the `initialize` hook.
    pub fn with_initialize(self, hook: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.with_try_initialize(move |this: &mut T, _: &Injector| {
            hook(this);
            Ok(())
        })
    }

    /// Set a fallible `initialize` hook that also sees the injector.
    pub fn with_try_initialize(
        mut self,
        hook: impl Fn(&mut T, &Injector) -> BindingResult<()> + Send + Sync + 'static,
    ) -> Self {
        let hook: InitHook<T> = Arc::new(hook);
        self.initialize = Some(hook);
        self
    }

    /// Set the `dispose` hook.
    pub fn with_dispose(mut self, hook: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        let hook: DisposeHook<T> = Arc::new(hook);
        self.dispose = Some(hook);
        self
    }

    /// Apply `decorator` and return the rewritten prototype.
    pub fn decorate(mut self, decorator: &LanguageDecorator, key: Option<FieldKey<T>>) -> Self {
        decorator.apply(&mut self, key);
        self
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Run the `initialize` hook on `instance`. No-op without one.
    pub fn initialize(&self, instance: &mut T, injector: &Injector) -> BindingResult<()> {
        match &self.initialize {
            Some(hook) => hook(instance, injector),
            None => Ok(()),
        }
    }

    /// Run the `dispose` hook on `instance`. No-op without one.
    pub fn dispose(&self, instance: &mut T) {
        if let Some(hook) = &self.dispose {
            hook(instance);
        }
    }

    // =========================================================================
    // DECORATION
    // =========================================================================

    /// Detach the current hooks so a decorator can wrap them.
    pub(crate) fn take_hooks(&mut self) -> (Option<InitHook<T>>, Option<DisposeHook<T>>) {
        (self.initialize.take(), self.dispose.take())
    }

    pub(crate) fn install(&mut self, initialize: InitHook<T>, dispose: DisposeHook<T>) {
        self.initialize = Some(initialize);
        self.dispose = Some(dispose);
    }

    /// Record a bound field. Returns `false` if it was already declared.
    pub(crate) fn declare_field(&mut self, name: &'static str) -> bool {
        if self.fields.contains(&name) {
            return false;
        }
        self.fields.push(name);
        true
    }
}

impl<T> Prototype<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn has_initialize(&self) -> bool {
        self.initialize.is_some()
    }

    pub fn has_dispose(&self) -> bool {
        self.dispose.is_some()
    }

    pub fn declared_fields(&self) -> &[&'static str] {
        &self.fields
    }
}

impl<T: 'static> Default for Prototype<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Prototype<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype")
            .field("name", &self.name)
            .field("initialize", &self.initialize.is_some())
            .field("dispose", &self.dispose.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindingError;

    #[derive(Default)]
    struct Counter {
        inits: u32,
        disposes: u32,
    }

    #[test]
    fn test_empty_prototype_is_noop() {
        let proto = Prototype::<Counter>::new();
        let mut counter = Counter::default();

        assert!(!proto.has_initialize());
        assert!(proto.initialize(&mut counter, &Injector::new()).is_ok());
        proto.dispose(&mut counter);
        assert_eq!(counter.inits, 0);
        assert_eq!(counter.disposes, 0);
    }

    #[test]
    fn test_hooks_run() {
        let proto = Prototype::<Counter>::new()
            .with_initialize(|c| c.inits += 1)
            .with_dispose(|c| c.disposes += 1);
        let mut counter = Counter::default();

        proto.initialize(&mut counter, &Injector::new()).unwrap();
        proto.dispose(&mut counter);
        assert_eq!(counter.inits, 1);
        assert_eq!(counter.disposes, 1);
    }

    #[test]
    fn test_try_initialize_propagates() {
        let proto = Prototype::<Counter>::new().with_try_initialize(|_, injector| {
            injector.resolve_source().map(|_| ())
        });
        let mut counter = Counter::default();

        assert!(matches!(
            proto.initialize(&mut counter, &Injector::new()),
            Err(BindingError::DependencyResolution(_))
        ));
    }

    #[test]
    fn test_declare_field_once() {
        let mut proto = Prototype::<Counter>::new();
        assert!(proto.declare_field("lang"));
        assert!(!proto.declare_field("lang"));
        assert_eq!(proto.declared_fields(), &["lang"]);
        assert!(proto.name().ends_with("Counter"));
    }
}

//! Bound fields - per-instance slots mirrored from a change stream

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::observer::Subscription;

pub(crate) type Slot = RwLock<Option<String>>;

/// A writable instance field kept in sync with a change source.
///
/// Each instance owns its own slot and its own subscription handle, so two
/// instances built from the same decorated [`Prototype`](crate::Prototype)
/// never share a value or a handle. The slot starts out empty and is only
/// written by the binding: once on `initialize`, then once per emission.
/// `dispose` releases the subscription but leaves the last value in place.
///
/// Dropping the field releases any live subscription.
#[derive(Default)]
pub struct BoundField {
    /// Latest mirrored value.
    slot: Arc<Slot>,

    /// Live registration, if bound.
    subscription: Option<Subscription>,
}

impl BoundField {
    /// Create an empty, unbound field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest mirrored value, `None` before the first `initialize`.
    pub fn get(&self) -> Option<String> {
        self.slot.read().clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(Option<&str>) -> R) -> R {
        f(self.slot.read().as_deref())
    }

    /// Whether a value has been mirrored.
    pub fn is_set(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Whether the field holds a live subscription.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    pub(crate) fn set(&self, value: String) {
        *self.slot.write() = Some(value);
    }

    /// Handle for the subscription callback. Weak so that a forgotten
    /// registration never keeps the slot alive.
    pub(crate) fn weak_slot(&self) -> Weak<Slot> {
        Arc::downgrade(&self.slot)
    }

    pub(crate) fn attach(&mut self, subscription: Subscription) {
        debug_assert!(self.subscription.is_none(), "attach over a live subscription");
        self.subscription = Some(subscription);
    }

    /// Release the subscription. Returns `false` when there was none.
    pub(crate) fn release(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => {
                subscription.unsubscribe();
                true
            }
            None => false,
        }
    }

    pub(crate) fn subscription_id(&self) -> Option<u64> {
        self.subscription.as_ref().map(Subscription::id)
    }
}

impl fmt::Debug for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundField")
            .field("value", &*self.slot.read())
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}

impl PartialEq<str> for BoundField {
    fn eq(&self, other: &str) -> bool {
        self.with(|v| v == Some(other))
    }
}

impl PartialEq<&str> for BoundField {
    fn eq(&self, other: &&str) -> bool {
        self.with(|v| v == Some(*other))
    }
}

/// Names a [`BoundField`] on `T` and how to reach it.
///
/// Build one with [`field_key!`](crate::field_key).
pub struct FieldKey<T> {
    name: &'static str,
    access: fn(&mut T) -> &mut BoundField,
}

impl<T> FieldKey<T> {
    pub fn new(name: &'static str, access: fn(&mut T) -> &mut BoundField) -> Self {
        Self { name, access }
    }

    /// Field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Borrow the field on `instance`.
    pub fn field<'a>(&self, instance: &'a mut T) -> &'a mut BoundField {
        (self.access)(instance)
    }
}

impl<T> Clone for FieldKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldKey<T> {}

impl<T> fmt::Debug for FieldKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldKey").field(&self.name).finish()
    }
}

/// Build a [`FieldKey`] for a named [`BoundField`] member.
///
/// ```
/// use lifecycle_binding::{field_key, BoundField};
///
/// #[derive(Default)]
/// struct Greeter {
///     lang: BoundField,
/// }
///
/// let key = field_key!(Greeter, lang);
/// assert_eq!(key.name(), "lang");
/// ```
#[macro_export]
macro_rules! field_key {
    ($ty:ty, $field:ident) => {
        $crate::FieldKey::<$ty>::new(stringify!($field), |this| &mut this.$field)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Host {
        lang: BoundField,
    }

    #[test]
    fn test_new_field_is_empty() {
        let field = BoundField::new();
        assert!(!field.is_set());
        assert!(!field.is_subscribed());
        assert_eq!(field.get(), None);
    }

    #[test]
    fn test_weak_slot_writes_through() {
        let field = BoundField::new();
        let slot = field.weak_slot().upgrade().unwrap();

        *slot.write() = Some("fr".to_owned());
        assert_eq!(field, "fr");
    }

    #[test]
    fn test_release_is_idempotent() {
        let detached = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&detached);
        let mut field = BoundField::new();
        field.attach(Subscription::new(1, Arc::new(AtomicBool::new(true)), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(field.is_subscribed());

        assert!(field.release());
        assert!(!field.release());
        assert_eq!(detached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_keeps_value() {
        let mut field = BoundField::new();
        field.set("en".to_owned());
        field.release();
        assert_eq!(field.get().as_deref(), Some("en"));
    }

    #[test]
    fn test_instances_have_distinct_slots() {
        let key = field_key!(Host, lang);
        let mut a = Host::default();
        let mut b = Host::default();

        key.field(&mut a).set("en".to_owned());
        assert_eq!(a.lang, "en");
        assert!(!b.lang.is_set());
        assert!(!key.field(&mut b).is_set());
    }
}

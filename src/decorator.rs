//! Language binding decorator
//!
//! [`language()`] produces a decorator that rewrites a [`Prototype`]'s
//! `initialize` and `dispose` hooks:
//!
//! - **initialize**: resolve collaborators, read the current value into the
//!   bound field, subscribe to changes, then run the previous hook.
//! - **dispose**: release the subscription, then run the previous hook.
//!
//! The binding's own setup always precedes the delegated setup, and its own
//! teardown always precedes the delegated teardown. A previous `initialize`
//! hook therefore sees the field already populated, and a previous `dispose`
//! hook sees no further mutations.
//!
//! ## Subscription ownership
//!
//! The handle is stored in the instance's [`BoundField`], not in state shared
//! by the decorated hooks. Instances built from the same prototype can be
//! alive at the same time without overwriting or leaking each other's
//! subscriptions.

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::config::{BindingConfig, ReinitPolicy};
use crate::error::{BindingError, BindingResult};
use crate::field::{BoundField, FieldKey};
use crate::injector::Injector;
use crate::observer::FnObserver;
use crate::prototype::{DisposeHook, InitHook, Prototype};
use crate::redraw::RedrawTrigger;
use crate::source::ChangeSource;

/// Create a language binding decorator with the default configuration.
pub fn language() -> LanguageDecorator {
    LanguageDecorator::default()
}

/// Binds a [`BoundField`] to the injected change source for the lifetime of
/// each instance.
#[derive(Clone, Debug, Default)]
pub struct LanguageDecorator {
    config: BindingConfig,
}

impl LanguageDecorator {
    pub fn with_config(config: BindingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Wrap `prototype`'s hooks and declare `key` as a bound field.
    ///
    /// With `key = None` the hooks are still wrapped (collaborators are still
    /// resolved) but no field is read or subscribed.
    ///
    /// Applying twice to the same prototype stacks another wrapping layer.
    /// Annotate each field once.
    pub fn apply<T: 'static>(&self, prototype: &mut Prototype<T>, key: Option<FieldKey<T>>) {
        let owner = prototype.name();
        let reinit = self.config.reinit;
        let (prior_init, prior_dispose) = prototype.take_hooks();

        let initialize: InitHook<T> = Arc::new(move |this: &mut T, injector: &Injector| {
            let source = injector.resolve_source()?;
            let redraw = injector.resolve_redraw();

            if let Some(key) = key {
                bind(owner, key.name(), key.field(this), source.as_ref(), redraw, reinit)?;
            }

            if let Some(prior) = &prior_init {
                prior(this, injector)?;
            }
            Ok(())
        });

        let dispose: DisposeHook<T> = Arc::new(move |this: &mut T| {
            if let Some(key) = key {
                let field = key.field(this);
                if let Some(id) = field.subscription_id() {
                    field.release();
                    debug!("{}.{}: released subscription #{}", owner, key.name(), id);
                }
            }

            if let Some(prior) = &prior_dispose {
                prior(this);
            }
        });

        prototype.install(initialize, dispose);

        match key {
            Some(key) => {
                if !prototype.declare_field(key.name()) {
                    warn!(
                        "{}.{} decorated more than once, wrapping layers will stack",
                        owner,
                        key.name()
                    );
                }
                debug!("decorated {} with bound field '{}'", owner, key.name());
            }
            None => debug!("decorated {} without a bound field", owner),
        }
    }
}

/// Populate `field` from `source` and keep it in sync.
fn bind(
    owner: &'static str,
    name: &'static str,
    field: &mut BoundField,
    source: &dyn ChangeSource,
    redraw: Option<Arc<dyn RedrawTrigger>>,
    reinit: ReinitPolicy,
) -> BindingResult<()> {
    if field.is_subscribed() {
        match reinit {
            ReinitPolicy::Reject => {
                return Err(BindingError::AlreadyBound { owner, field: name });
            }
            ReinitPolicy::Resubscribe => {
                warn!("{}.{}: initialized again without dispose, resubscribing", owner, name);
            }
        }
    }
    // Also drops a handle whose source has gone away.
    field.release();

    field.set(source.current_value());

    let slot = field.weak_slot();
    let observer = FnObserver(move |value: &str| {
        let Some(slot) = slot.upgrade() else {
            return;
        };
        *slot.write() = Some(value.to_owned());
        trace!("{}.{} <- '{}'", owner, name, value);

        if let Some(redraw) = &redraw {
            redraw.mark_for_check();
        }
    });

    let subscription = source.subscribe(Arc::new(observer));
    debug!("{}.{}: subscribed #{}", owner, name, subscription.id());
    field.attach(subscription);
    Ok(())
}

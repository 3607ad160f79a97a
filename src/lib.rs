//! Lifecycle Binding - reactive fields that follow an object's lifecycle
//!
//! A bound field mirrors an external value (the active language, say) for as
//! long as its owner is alive. Nothing polls: the source pushes each change.
//!
//! # Core Types
//!
//! - **Prototype**: per-type table of `initialize` / `dispose` hooks
//! - **LanguageDecorator**: rewrites a prototype's hooks to bind a field
//! - **BoundField**: per-instance slot holding the mirrored value and its subscription
//! - **Injector**: collaborators handed to `initialize` by the caller
//!
//! # Architecture: Source / Binding / Redraw
//!
//! 1. **Source** - a [`ChangeSource`] exposes a current value and a change stream
//! 2. **Binding** - on `initialize` the field reads the current value and subscribes;
//!    on `dispose` the subscription is released
//! 3. **Redraw** - after every mirrored update an optional [`RedrawTrigger`] is signaled
//!
//! The decorator's own setup runs before any hook the type already had, and
//! its own teardown runs before the previous `dispose`. Each instance owns its
//! subscription, so any number of instances can share one prototype.
//!
//! # Example
//!
//! ```rust
//! use lifecycle_binding::{field_key, language, BoundField, Injector, LanguageService, Prototype, RedrawFlag};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Greeter {
//!     lang: BoundField,
//! }
//!
//! // 1. Decorate the prototype once
//! let proto = Prototype::<Greeter>::new().decorate(&language(), Some(field_key!(Greeter, lang)));
//!
//! // 2. Provide collaborators
//! let service = LanguageService::default();
//! let redraw = Arc::new(RedrawFlag::new());
//! let cx = Injector::new()
//!     .with_source(Arc::new(service.clone()))
//!     .with_redraw(redraw.clone());
//!
//! // 3. Initialize an instance - the current value is read synchronously
//! let mut greeter = Greeter::default();
//! proto.initialize(&mut greeter, &cx).unwrap();
//! assert_eq!(greeter.lang, "en");
//!
//! // 4. Changes are mirrored and a redraw is requested
//! service.set_language("fr").unwrap();
//! assert_eq!(greeter.lang, "fr");
//! assert_eq!(redraw.count(), 1);
//!
//! // 5. After dispose the field keeps its last value
//! proto.dispose(&mut greeter);
//! service.set_language("de").unwrap();
//! assert_eq!(greeter.lang, "fr");
//! ```

mod component;
mod config;
mod decorator;
mod error;
mod field;
mod injector;
mod observer;
mod prototype;
mod redraw;
mod source;

pub use component::{Component, Phase};
pub use config::{BindingConfig, ReinitPolicy, ServiceConfig};
pub use decorator::{language, LanguageDecorator};
pub use error::{BindingError, BindingResult};
pub use field::{BoundField, FieldKey};
pub use injector::{Capability, Injector};
pub use observer::{ChangeObserver, ChannelObserver, FnObserver, Subscription};
pub use prototype::{DisposeHook, InitHook, Prototype};
pub use redraw::{FnRedraw, RedrawFlag, RedrawTrigger};
pub use source::{ChangeSource, LanguageService};

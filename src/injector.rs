//! Explicit collaborator injection
//!
//! Hooks receive an [`Injector`] instead of looking collaborators up globally.
//! The caller decides what is provided; the binding decides what is required.

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::error::{BindingError, BindingResult};
use crate::redraw::RedrawTrigger;
use crate::source::ChangeSource;

/// Capabilities a binding can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Notification/translation service. Required.
    ChangeSource,
    /// Redraw trigger. Optional (absent outside a renderable context).
    RedrawTrigger,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ChangeSource => f.write_str("change source"),
            Capability::RedrawTrigger => f.write_str("redraw trigger"),
        }
    }
}

/// Context object carrying the collaborators resolved by the caller.
#[derive(Clone, Default)]
pub struct Injector {
    source: Option<Arc<dyn ChangeSource>>,
    redraw: Option<Arc<dyn RedrawTrigger>>,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn ChangeSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_redraw(mut self, redraw: Arc<dyn RedrawTrigger>) -> Self {
        self.redraw = Some(redraw);
        self
    }

    /// Whether `capability` has a provider.
    pub fn provides(&self, capability: Capability) -> bool {
        match capability {
            Capability::ChangeSource => self.source.is_some(),
            Capability::RedrawTrigger => self.redraw.is_some(),
        }
    }

    /// Resolve the change source. Absence is a configuration error.
    pub fn resolve_source(&self) -> BindingResult<Arc<dyn ChangeSource>> {
        match &self.source {
            Some(source) => Ok(Arc::clone(source)),
            None => {
                warn!("{} requested but not provided", Capability::ChangeSource);
                Err(BindingError::DependencyResolution(Capability::ChangeSource))
            }
        }
    }

    /// Resolve the redraw trigger, if any.
    pub fn resolve_redraw(&self) -> Option<Arc<dyn RedrawTrigger>> {
        self.redraw.clone()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("source", &self.source.is_some())
            .field("redraw", &self.redraw.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redraw::RedrawFlag;
    use crate::source::LanguageService;

    #[test]
    fn test_empty_injector() {
        let injector = Injector::new();

        assert!(!injector.provides(Capability::ChangeSource));
        assert!(injector.resolve_redraw().is_none());
        assert!(matches!(
            injector.resolve_source(),
            Err(BindingError::DependencyResolution(Capability::ChangeSource))
        ));
    }

    #[test]
    fn test_resolve_provided() {
        let injector = Injector::new()
            .with_source(Arc::new(LanguageService::default()))
            .with_redraw(Arc::new(RedrawFlag::new()));

        assert!(injector.provides(Capability::ChangeSource));
        assert!(injector.provides(Capability::RedrawTrigger));
        assert_eq!(injector.resolve_source().unwrap().current_value(), "en");
        assert!(injector.resolve_redraw().is_some());
    }
}

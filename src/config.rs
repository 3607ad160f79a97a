//! Binding and service configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{BindingError, BindingResult};

/// What a bound field does when `initialize` runs while it still holds a live
/// subscription (no `dispose` in between).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReinitPolicy {
    /// Release the previous subscription, then subscribe again.
    #[default]
    Resubscribe,
    /// Fail with [`BindingError::AlreadyBound`] and keep the existing subscription.
    Reject,
}

/// Configuration for a binding decorator.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BindingConfig {
    /// Re-initialization policy.
    pub reinit: ReinitPolicy,
}

impl BindingConfig {
    pub fn new(reinit: ReinitPolicy) -> Self {
        Self { reinit }
    }
}

/// Configuration for an in-memory [`LanguageService`](crate::LanguageService).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServiceConfig {
    /// Language reported before any change.
    pub default_language: String,

    /// Accepted languages (empty = accept anything non-empty).
    pub supported_languages: Vec<String>,

    /// Deliver the current value to each new observer from inside `subscribe`.
    pub replay_on_subscribe: bool,
}

impl ServiceConfig {
    /// Create a configuration accepting any language.
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            supported_languages: Vec::new(),
            replay_on_subscribe: false,
        }
    }

    pub fn with_supported<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_replay(mut self, replay: bool) -> Self {
        self.replay_on_subscribe = replay;
        self
    }

    /// Check whether `language` is accepted by this configuration.
    pub fn supports(&self, language: &str) -> bool {
        if language.is_empty() {
            return false;
        }
        self.supported_languages.is_empty()
            || self.supported_languages.iter().any(|l| l == language)
    }

    /// Validate configuration.
    pub fn validate(&self) -> BindingResult<()> {
        if self.default_language.is_empty() {
            return Err(BindingError::InvalidConfig("default_language must not be empty"));
        }
        if !self.supports(&self.default_language) {
            return Err(BindingError::InvalidConfig(
                "default_language must be one of supported_languages",
            ));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new("en")
    }
}

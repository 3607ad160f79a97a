//! Error types

use thiserror::Error;

use crate::injector::Capability;

#[derive(Debug, Error)]
pub enum BindingError {
    /// A required collaborator was not provided by the injector.
    #[error("no provider registered for {0}")]
    DependencyResolution(Capability),

    #[error("field '{field}' of {owner} is already bound")]
    AlreadyBound {
        owner: &'static str,
        field: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("language '{0}' is not supported")]
    UnsupportedLanguage(String),
}

pub type BindingResult<T> = Result<T, BindingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = BindingError::DependencyResolution(Capability::ChangeSource);
        assert_eq!(err.to_string(), "no provider registered for change source");

        let err = BindingError::AlreadyBound {
            owner: "Greeter",
            field: "lang",
        };
        assert_eq!(err.to_string(), "field 'lang' of Greeter is already bound");
    }
}

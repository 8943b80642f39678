//=========================================================================
// Service Errors
//=========================================================================
//
// Recoverable failures raised while wiring collaborators together.
//
// Neither kind is fatal: callers log the error once at the point of
// failure and continue with the affected capability switched off.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== ServiceError ========================================================

/// Failure to reach a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The registry holds no instance for the requested capability.
    #[error("service not found: {capability}")]
    ServiceNotFound { capability: &'static str },

    /// An expected collaborator (actor, panel, ...) was never wired.
    #[error("missing reference: {what}")]
    MissingReference { what: &'static str },
}

impl ServiceError {
    /// Builds a `ServiceNotFound` error naming the capability type `C`.
    pub fn not_found<C: ?Sized + 'static>() -> Self {
        Self::ServiceNotFound {
            capability: std::any::type_name::<C>(),
        }
    }

    /// Builds a `MissingReference` error.
    pub fn missing(what: &'static str) -> Self {
        Self::MissingReference { what }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    trait Probe {}

    #[test]
    fn not_found_names_the_capability() {
        let err = ServiceError::not_found::<dyn Probe>();
        let ServiceError::ServiceNotFound { capability } = err.clone() else {
            panic!("wrong variant: {:?}", err);
        };
        assert!(capability.contains("Probe"));
        assert!(err.to_string().starts_with("service not found"));
    }

    #[test]
    fn missing_reference_display() {
        let err = ServiceError::missing("pause panel");
        assert_eq!(err.to_string(), "missing reference: pause panel");
    }
}

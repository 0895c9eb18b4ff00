//! # Framework Errors
//!
//! This module defines the common error types used throughout the actor framework.
//! Every collection actor reports failures through [`FrameworkError`]; entity-level
//! failures travel inside [`FrameworkError::EntityError`] and can be recovered with
//! [`FrameworkError::into_entity_error`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Conflicts with existing item: {0}")]
    Conflict(String),
    #[error("Collection requires caller-supplied ids")]
    IdRequired,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type from an [`FrameworkError::EntityError`].
    ///
    /// Returns `Err(self)` unchanged when the error is a framework error or when the
    /// boxed error is of a different type.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(err) => Ok(*err),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("out of stock")]
    struct OutOfStock;

    #[test]
    fn test_into_entity_error_recovers_typed_error() {
        let err = FrameworkError::EntityError(Box::new(OutOfStock));
        assert_eq!(err.into_entity_error::<OutOfStock>().unwrap(), OutOfStock);
    }

    #[test]
    fn test_into_entity_error_keeps_framework_errors() {
        let err = FrameworkError::NotFound("order_7".into());
        match err.into_entity_error::<OutOfStock>() {
            Err(FrameworkError::NotFound(id)) => assert_eq!(id, "order_7"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_into_entity_error_keeps_foreign_entity_errors() {
        let err = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        let back = err.into_entity_error::<OutOfStock>().unwrap_err();
        assert!(back.to_string().contains("disk"));
    }
}

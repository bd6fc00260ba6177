//! # Runtime Errors
//!
//! Errors raised by the desk runtime itself, independent of any resource type.
//! Resource-specific failures travel inside [`FrameworkError::EntityError`].

/// Errors that can occur between a [`ResourceClient`](crate::ResourceClient) and its actor.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Returns the entity error if this failure came from a resource hook.
    pub fn entity_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            FrameworkError::EntityError(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

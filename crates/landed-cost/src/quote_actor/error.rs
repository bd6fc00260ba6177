//! Error types for the Quote actor.

use crate::calc::CalcError;
use crate::input::InputError;
use crate::model::{LineItemId, QuoteStatus};
use crate::services::ServiceError;
use desk_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during quote operations.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The requested quote was not found.
    #[error("Quote not found: {0}")]
    NotFound(String),

    /// Only draft and pending quotes accept edits.
    #[error("Quote is {0} and can no longer be edited")]
    NotEditable(QuoteStatus),

    #[error("Cannot move quote from {from} to {to}")]
    InvalidTransition { from: QuoteStatus, to: QuoteStatus },

    #[error("Quote cannot be sent: {0}")]
    NotReadyToSend(&'static str),

    #[error("Quote has no totals yet")]
    NoTotals,

    #[error("Line item not found: {0}")]
    UnknownItem(LineItemId),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Calculation error: {0}")]
    Calculation(#[from] CalcError),

    /// An external collaborator failed; nothing was retried.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),

    /// The actor answered an action with the result of a different action.
    #[error("Unexpected action result, expected {0}")]
    UnexpectedResult(&'static str),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for QuoteError {
    fn from(msg: String) -> Self {
        QuoteError::ActorCommunicationError(msg)
    }
}

impl QuoteError {
    /// Recovers the typed quote error carried through the actor runtime, if any.
    pub fn from_framework(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => QuoteError::NotFound(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<QuoteError>() {
                Ok(quote_error) => *quote_error,
                Err(other) => QuoteError::ActorCommunicationError(other.to_string()),
            },
            other => QuoteError::ActorCommunicationError(other.to_string()),
        }
    }
}

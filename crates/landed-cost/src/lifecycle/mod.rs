//! # System Lifecycle
//!
//! Starting, wiring and stopping the quote desk.
//!
//! The actor is created without its collaborators; they are injected as the
//! [`QuoteServices`](crate::services::QuoteServices) context when the actor task is
//! spawned. Tests use [`QuoteSystem::with_services`] to run the real actor against
//! failing or scripted services.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the client** - closes the sender side of the channel
//! 2. **Actor detects closure** - `receiver.recv()` returns `None` and the loop ends
//! 3. **Await completion** - [`QuoteSystem::shutdown`] joins the actor task
//!
//! Tracing is installed separately with
//! [`desk_framework::tracing::setup_tracing`], once per process.

pub mod quote_system;

pub use quote_system::*;

//! # Quote Actor
//!
//! The quote desk's resource actor. Each [`Quote`] lives inside a
//! [`ResourceActor`], which serializes every request against it, so pricing
//! never races an edit.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](desk_framework::ActorEntity) implementation for [`Quote`]
//! - [`error`] - [`QuoteError`]
//! - [`actions`] - [`QuoteAction`] and [`QuoteActionResult`]
//! - [`new()`] - creates the actor and its client
//!
//! ## Pricing and failures
//!
//! Creation and every editing action end with a recalculation through the
//! [`CalculationEngine`](crate::services::CalculationEngine) in the actor's
//! [`QuoteServices`](crate::services::QuoteServices) context. When a collaborator
//! fails, the edit is kept, the previous totals stay in place with `totals_stale`
//! set, and an error notification is queued for the operator. Nothing is retried.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, generic_client) = quote_actor::new();
//! tokio::spawn(actor.run(QuoteServices::local(config)));
//! let client = QuoteClient::new(generic_client);
//!
//! let id = client.create_quote(params).await?;
//! client.select_shipping(id, ShippingPreference::Cheapest).await?;
//! let totals = client.recalculate(id).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Quote;
use desk_framework::{ResourceActor, ResourceClient};

/// Creates a new Quote actor and its client.
pub fn new() -> (ResourceActor<Quote>, ResourceClient<Quote>) {
    ResourceActor::new(32)
}

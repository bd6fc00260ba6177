//! # ActorEntity Trait
//!
//! The contract a desk resource (a quote, a price list, a shipment) implements so that
//! the generic [`ResourceActor`](crate::ResourceActor) can own it. The trait names the
//! payload types for every request and supplies the hooks the actor calls while
//! processing them.
//!
//! Besides the CRUD + Action hooks, desk resources must be able to:
//! - describe themselves in a short [`ActorEntity::Summary`] for listing screens;
//! - produce a copy of themselves under a fresh id ([`ActorEntity::on_duplicate`]).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource managed by a [`ResourceActor`](crate::ResourceActor) implements.
///
/// # Async & Context
/// Hooks are `async` so they can call external collaborators. The `Context` type is
/// handed to [`ResourceActor::run`](crate::ResourceActor::run), not to the constructor,
/// so collaborators can be wired after the actor and its client exist.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier; generated by the actor from a `u32` counter.
    /// `Ord` keeps listings in creation order.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations.
    type Action: Send + Sync + Debug;

    /// Result of a resource-specific operation.
    type ActionResult: Send + Sync + Debug;

    /// Condensed view returned by `list`.
    type Summary: Send + Sync + Debug;

    /// Runtime dependencies injected into every hook. Use `()` if none.
    type Context: Send + Sync;

    /// One error enum per resource; every hook reports through it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the entity from its id and creation payload. Called before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Condensed view used by listing requests.
    fn summary(&self) -> Self::Summary;

    /// Copy this entity under `id`. The copy goes through `on_create` before it is stored.
    fn on_duplicate(&self, id: Self::Id) -> Result<Self, Self::Error>;

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update payload in place.
    async fn on_update(
        &mut self,
        update: Self::Update,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before removal. An error keeps the entity in the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a resource-specific action.
    ///
    /// State changes made before an error is returned are kept.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

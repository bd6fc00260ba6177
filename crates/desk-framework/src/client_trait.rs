//! # ActorClient Trait
//!
//! Shared surface for resource-specific clients: `get`, `list`, `delete` and
//! `duplicate` come for free once a client exposes its inner [`ResourceClient`] and
//! says how framework errors map onto its own error type.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard desk operations.
///
/// ```rust,ignore
/// #[async_trait]
/// impl ActorClient<Quote> for QuoteClient {
///     type Error = QuoteError;
///
///     fn inner(&self) -> &ResourceClient<Quote> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         QuoteError::from_framework(e)
///     }
/// }
///
/// // get(), list(), delete() and duplicate() are now available on QuoteClient.
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic client.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Summaries of every stored entity, in id order.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<(T::Id, T::Summary)>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete an entity by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Copy an entity under a new id and return that id.
    #[tracing::instrument(skip(self))]
    async fn duplicate(&self, id: T::Id) -> Result<T::Id, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().duplicate(id).await.map_err(Self::map_error)
    }
}

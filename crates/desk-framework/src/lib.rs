//! # Desk Framework
//!
//! Building blocks for a quoting desk: every kind of record the desk keeps (quotes,
//! price lists, shipments) is owned by its own actor, and the rest of the program reaches
//! it only through a typed client. The actor processes one request at a time, so a
//! record is never observed half-edited and no locks are needed.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) - the record and its business rules.
//! 2. **Runtime** ([`ResourceActor`]) - the request loop and the id-keyed store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]) - typed request/response calls.
//!
//! ## Requests
//!
//! | Request | Entity hook | Reply |
//! |---|---|---|
//! | Create | `from_create_params`, `on_create` | new id |
//! | Get | none | `Option<T>` |
//! | List | `summary` | `(id, summary)` pairs in id order |
//! | Update | `on_update` | updated entity |
//! | Delete | `on_delete` | `()` |
//! | Duplicate | `on_duplicate`, `on_create` | new id |
//! | Action | `handle_action` | `ActionResult` |
//!
//! ## Context Injection
//!
//! Collaborators an entity needs (pricing engines, rate sources, caches) are passed to
//! [`ResourceActor::run`] rather than stored in the entity:
//!
//! ```rust,ignore
//! let (actor, client) = ResourceActor::<Quote>::new(32);
//! tokio::spawn(actor.run(services));
//! let id = client.create(QuoteCreate::default()).await?;
//! ```
//!
//! Swapping the context is how tests replace real collaborators with failing or
//! scripted ones.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real [`ResourceClient`] from scripted replies, for
//! testing client wrappers without running an actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};

//! # Resource Actor
//!
//! `ResourceActor<T>` owns every `T` on the desk and processes requests one at a time,
//! so the store needs no locking. Clients talk to it over an mpsc channel; each request
//! carries a oneshot channel for the reply.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Server half of a desk resource.
///
/// # Usage Pattern
///
/// 1. `ResourceActor::new()` returns the actor and its client.
/// 2. Spawn `actor.run(context)` with the collaborators the entity hooks need.
/// 3. Clone the client wherever requests are issued. Dropping every clone stops the loop.
///
/// ```rust,ignore
/// let (actor, client) = ResourceActor::<Quote>::new(32);
/// tokio::spawn(actor.run(services));
/// let id = client.create(params).await?;
/// ```
///
/// # Operations
///
/// * **Create** – next id from the counter, `from_create_params`, `on_create`, insert.
/// * **Get** – clone of the stored entity, or `None`.
/// * **List** – `(id, summary)` pairs in id order.
/// * **Update** – `on_update` in place, returns the new state.
/// * **Delete** – `on_delete`, then remove.
/// * **Duplicate** – `on_duplicate` under a fresh id, `on_create`, insert.
/// * **Action** – `handle_action` in place, returns its result.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` bounds the request queue; senders wait while it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    fn fresh_id(&mut self) -> T::Id {
        let id = T::Id::from(self.next_id);
        self.next_id += 1;
        id
    }

    /// Runs the request loop until every client is dropped.
    ///
    /// `context` is passed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = self.fresh_id();
                    let result = match T::from_create_params(id.clone(), params) {
                        Ok(item) => self.admit(entity_type, id, item, &context).await,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let summaries: Vec<_> = self
                        .store
                        .iter()
                        .map(|(id, item)| (id.clone(), item.summary()))
                        .collect();
                    debug!(entity_type, count = summaries.len(), "List");
                    let _ = respond_to.send(Ok(summaries));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = match item.on_update(update, &context).await {
                        Ok(()) => {
                            info!(entity_type, %id, "Updated");
                            Ok(item.clone())
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Duplicate { id, respond_to } => {
                    debug!(entity_type, %id, "Duplicate");
                    let copy = match self.store.get(&id) {
                        Some(original) => {
                            let new_id = T::Id::from(self.next_id);
                            original.on_duplicate(new_id.clone()).map(|copy| (new_id, copy))
                        }
                        None => {
                            warn!(entity_type, %id, "Not found");
                            let _ =
                                respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                            continue;
                        }
                    };
                    let result = match copy {
                        Ok((new_id, copy)) => {
                            self.next_id += 1;
                            self.admit(entity_type, new_id, copy, &context).await
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Duplicate failed");
                            Err(FrameworkError::EntityError(Box::new(e)))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    /// Runs `on_create` and stores the entity when it succeeds.
    async fn admit(
        &mut self,
        entity_type: &str,
        id: T::Id,
        mut item: T,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        if let Err(e) = item.on_create(context).await {
            warn!(entity_type, %id, error = %e, "on_create failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }
        self.store.insert(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }
}

//! # Mock Clients
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered
//! from a queue of expectations instead of an actor. Use it to test client wrappers
//! (argument mapping, result unpacking, error translation) without spawning actors.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | State | none, scripted replies | real store |
//! | Error injection | `return_err` | needs a failing hook |
//! | Use | logic around a client | the entity itself, full system |
//!
//! For lower-level assertions on the exact payload sent, [`create_mock_client`] returns
//! the raw receiver together with `expect_*` helpers that pull the next request off it.
//!
//! ```rust,ignore
//! let mut mock = MockClient::<Quote>::new();
//! mock.expect_action(QuoteId(1)).return_ok(QuoteActionResult::ClearCache(()));
//! let client = QuoteClient::new(mock.client());
//! client.clear_cache(QuoteId(1)).await?;
//! mock.verify();
//! ```

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

type Reply<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Scripted reply for one expected request, in call order.
enum Expectation<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    List(Result<Vec<(T::Id, T::Summary)>, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Delete(Result<(), FrameworkError>),
    Duplicate(Result<T::Id, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

impl<T: ActorEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Get(_) => "Get",
            Expectation::Create(_) => "Create",
            Expectation::List(_) => "List",
            Expectation::Update(_) => "Update",
            Expectation::Delete(_) => "Delete",
            Expectation::Duplicate(_) => "Duplicate",
            Expectation::Action(_) => "Action",
        }
    }
}

fn request_name<T: ActorEntity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Create { .. } => "Create",
        ResourceRequest::Get { .. } => "Get",
        ResourceRequest::List { .. } => "List",
        ResourceRequest::Update { .. } => "Update",
        ResourceRequest::Delete { .. } => "Delete",
        ResourceRequest::Duplicate { .. } => "Duplicate",
        ResourceRequest::Action { .. } => "Action",
    }
}

type Queue<T> = Arc<Mutex<VecDeque<(Option<<T as ActorEntity>::Id>, Expectation<T>)>>>;

/// A client whose replies are scripted in advance.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation (kind or id) panics the background task, which surfaces in the test as
/// [`FrameworkError::ActorDropped`] on the caller and an unmet expectation in [`verify`](Self::verify).
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                let Some((expected_id, expectation)) = next else {
                    panic!("Unexpected {} request: no expectations left", request_name(&request));
                };

                let actual_id = match &request {
                    ResourceRequest::Get { id, .. }
                    | ResourceRequest::Update { id, .. }
                    | ResourceRequest::Delete { id, .. }
                    | ResourceRequest::Duplicate { id, .. }
                    | ResourceRequest::Action { id, .. } => Some(id.clone()),
                    ResourceRequest::Create { .. } | ResourceRequest::List { .. } => None,
                };
                if expected_id.is_some() && expected_id != actual_id {
                    panic!("Expected id {:?}, got {:?}", expected_id, actual_id);
                }

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Expectation::Get(r)) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Expectation::Create(r)) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::List { respond_to }, Expectation::List(r)) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Update { respond_to, .. }, Expectation::Update(r)) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Delete { respond_to, .. }, Expectation::Delete(r)) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Duplicate { respond_to, .. }, Expectation::Duplicate(r)) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Action { respond_to, .. }, Expectation::Action(r)) => {
                        let _ = respond_to.send(r);
                    }
                    (request, expectation) => {
                        panic!(
                            "Expected {} request, got {}",
                            expectation.name(),
                            request_name(&request)
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn push(&self, id: Option<T::Id>, expectation: Expectation<T>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((id, expectation));
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, Option<T>> {
        ExpectationBuilder::new(self, Some(id), Expectation::Get)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<'_, T, T::Id> {
        ExpectationBuilder::new(self, None, Expectation::Create)
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<'_, T, Vec<(T::Id, T::Summary)>> {
        ExpectationBuilder::new(self, None, Expectation::List)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T> {
        ExpectationBuilder::new(self, Some(id), Expectation::Update)
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, ()> {
        ExpectationBuilder::new(self, Some(id), Expectation::Delete)
    }

    pub fn expect_duplicate(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T::Id> {
        ExpectationBuilder::new(self, Some(id), Expectation::Duplicate)
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T::ActionResult> {
        ExpectationBuilder::new(self, Some(id), Expectation::Action)
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Completes an expectation with its scripted reply.
pub struct ExpectationBuilder<'a, T: ActorEntity, R> {
    mock: &'a MockClient<T>,
    id: Option<T::Id>,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
}

impl<'a, T: ActorEntity, R> ExpectationBuilder<'a, T, R> {
    fn new(
        mock: &'a MockClient<T>,
        id: Option<T::Id>,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> Self {
        Self { mock, id, wrap }
    }

    pub fn return_ok(self, value: R) {
        self.mock.push(self.id, (self.wrap)(Ok(value)));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.mock.push(self.id, (self.wrap)(Err(error)));
    }
}

/// Returns a client plus the receiver its requests arrive on.
///
/// Pair with [`expect_create`], [`expect_get`] and [`expect_action`] to inspect payloads
/// and answer by hand.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request, if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Reply<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a Get.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an Update.
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, Reply<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Reply<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct PriceList {
        id: u32,
        name: String,
    }

    #[derive(Debug)]
    struct PriceListCreate {
        name: String,
    }

    #[derive(Debug)]
    enum PriceListAction {
        Publish,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("price list error")]
    struct PriceListError;

    #[async_trait]
    impl ActorEntity for PriceList {
        type Id = u32;
        type Create = PriceListCreate;
        type Update = String;
        type Action = PriceListAction;
        type ActionResult = bool;
        type Summary = String;
        type Context = ();
        type Error = PriceListError;

        fn from_create_params(id: u32, params: PriceListCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                name: params.name,
            })
        }

        fn summary(&self) -> String {
            self.name.clone()
        }

        fn on_duplicate(&self, id: u32) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                name: self.name.clone(),
            })
        }

        async fn on_update(&mut self, name: String, _: &()) -> Result<(), Self::Error> {
            self.name = name;
            Ok(())
        }

        async fn handle_action(
            &mut self,
            _action: PriceListAction,
            _: &(),
        ) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn raw_receiver_sees_create_payload() {
        let (client, mut receiver) = create_mock_client::<PriceList>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(PriceListCreate {
                    name: "EU retail".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "EU retail");
        responder.send(Ok(7)).unwrap();

        let result = create_task.await.unwrap();
        assert!(matches!(result, Ok(7)));
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let mut mock = MockClient::<PriceList>::new();
        mock.expect_create().return_ok(1);
        mock.expect_list()
            .return_ok(vec![(1, "EU retail".to_string())]);
        mock.expect_action(1).return_ok(true);
        mock.expect_duplicate(1).return_ok(2);

        let client = mock.client();
        let id = client
            .create(PriceListCreate {
                name: "EU retail".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, 1);

        let listed = client.list().await.unwrap();
        assert_eq!(listed, vec![(1, "EU retail".to_string())]);

        assert!(client.perform_action(1, PriceListAction::Publish).await.unwrap());
        assert_eq!(client.duplicate(1).await.unwrap(), 2);

        mock.verify();
    }

    #[tokio::test]
    async fn scripted_errors_reach_the_caller() {
        let mut mock = MockClient::<PriceList>::new();
        mock.expect_delete(3)
            .return_err(FrameworkError::NotFound("3".to_string()));

        let result = mock.client().delete(3).await;
        assert!(matches!(result, Err(FrameworkError::NotFound(id)) if id == "3"));
        mock.verify();
    }
}

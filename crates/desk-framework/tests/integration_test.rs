use async_trait::async_trait;
use desk_framework::{ActorEntity, FrameworkError, ResourceActor};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct RateCard {
    id: u32,
    carrier: String,
    per_kg: f64,
    locked: bool,
}

#[derive(Debug)]
struct RateCardCreate {
    carrier: String,
    per_kg: f64,
}

#[derive(Debug)]
struct RateCardUpdate {
    per_kg: Option<f64>,
}

#[derive(Debug)]
enum RateCardAction {
    Lock,
    Quote(f64),
}

#[derive(Debug, thiserror::Error)]
enum RateCardError {
    #[error("rate must be positive")]
    InvalidRate,
    #[error("card is locked")]
    Locked,
}

#[async_trait]
impl ActorEntity for RateCard {
    type Id = u32;
    type Create = RateCardCreate;
    type Update = RateCardUpdate;
    type Action = RateCardAction;
    type ActionResult = f64;
    type Summary = String;
    type Context = ();
    type Error = RateCardError;

    fn from_create_params(id: u32, params: RateCardCreate) -> Result<Self, Self::Error> {
        if params.per_kg <= 0.0 {
            return Err(RateCardError::InvalidRate);
        }
        Ok(Self {
            id,
            carrier: params.carrier,
            per_kg: params.per_kg,
            locked: false,
        })
    }

    fn summary(&self) -> String {
        format!("{} @ {:.2}/kg", self.carrier, self.per_kg)
    }

    fn on_duplicate(&self, id: u32) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            locked: false,
            ..self.clone()
        })
    }

    async fn on_update(&mut self, update: RateCardUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if self.locked {
            return Err(RateCardError::Locked);
        }
        if let Some(per_kg) = update.per_kg {
            self.per_kg = per_kg;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RateCardAction,
        _ctx: &(),
    ) -> Result<f64, Self::Error> {
        match action {
            RateCardAction::Lock => {
                self.locked = true;
                Ok(0.0)
            }
            RateCardAction::Quote(kg) => Ok(kg * self.per_kg),
        }
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<RateCard>::new(10);
    tokio::spawn(actor.run(()));

    // Create
    let id = client
        .create(RateCardCreate {
            carrier: "DHL".into(),
            per_kg: 12.5,
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    // Action
    let price = client
        .perform_action(id, RateCardAction::Quote(2.0))
        .await
        .unwrap();
    assert_eq!(price, 25.0);

    // Update
    let updated = client
        .update(id, RateCardUpdate { per_kg: Some(10.0) })
        .await
        .unwrap();
    assert_eq!(updated.per_kg, 10.0);

    // Duplicate
    let copy_id = client.duplicate(id).await.unwrap();
    assert_eq!(copy_id, 2);
    let copy = client.get(copy_id).await.unwrap().unwrap();
    assert_eq!(copy.carrier, "DHL");
    assert_eq!(copy.per_kg, 10.0);

    // List in id order
    let listed = client.list().await.unwrap();
    assert_eq!(
        listed,
        vec![
            (1, "DHL @ 10.00/kg".to_string()),
            (2, "DHL @ 10.00/kg".to_string())
        ]
    );

    // Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
    assert_eq!(client.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_create_does_not_store_anything() {
    let (actor, client) = ResourceActor::<RateCard>::new(10);
    tokio::spawn(actor.run(()));

    let err = client
        .create(RateCardCreate {
            carrier: "UPS".into(),
            per_kg: 0.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::EntityError(_)));
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn entity_errors_are_recoverable_by_downcast() {
    let (actor, client) = ResourceActor::<RateCard>::new(10);
    tokio::spawn(actor.run(()));

    let id = client
        .create(RateCardCreate {
            carrier: "FedEx".into(),
            per_kg: 8.0,
        })
        .await
        .unwrap();
    client
        .perform_action(id, RateCardAction::Lock)
        .await
        .unwrap();

    let err = client
        .update(id, RateCardUpdate { per_kg: Some(1.0) })
        .await
        .unwrap_err();
    let inner = err
        .entity_error()
        .and_then(|e| e.downcast_ref::<RateCardError>());
    assert!(matches!(inner, Some(RateCardError::Locked)));

    // Rejected update leaves the stored entity untouched.
    let card = client.get(id).await.unwrap().unwrap();
    assert_eq!(card.per_kg, 8.0);
}

#[tokio::test]
async fn missing_ids_report_not_found() {
    let (actor, client) = ResourceActor::<RateCard>::new(10);
    tokio::spawn(actor.run(()));

    assert!(matches!(
        client.delete(42).await,
        Err(FrameworkError::NotFound(_))
    ));
    assert!(matches!(
        client.duplicate(42).await,
        Err(FrameworkError::NotFound(_))
    ));
    assert!(matches!(
        client.perform_action(42, RateCardAction::Lock).await,
        Err(FrameworkError::NotFound(_))
    ));
}

#[tokio::test]
async fn dropped_actor_closes_the_client() {
    let (actor, client) = ResourceActor::<RateCard>::new(10);
    drop(actor);

    let result = client.get(1).await;
    assert!(matches!(result, Err(FrameworkError::ActorClosed)));
}

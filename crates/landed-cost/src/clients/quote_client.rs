//! # Quote Client
//!
//! High-level API for the quote actor. Wraps a `ResourceClient<Quote>` and exposes one
//! typed method per desk operation; `get`, `list`, `delete` and `duplicate` come from
//! [`ActorClient`].
use crate::model::{
    Discount, HandlingMode, HandlingModeChoice, LineItem, LineItemEdit, LineItemId,
    NewLineItem, Notification, Quote, QuoteCreate, QuoteId, QuoteStatus, QuoteTotals,
    QuoteUpdate, ShippingPreference,
};
use crate::quote_actor::{QuoteAction, QuoteActionResult, QuoteError};
use crate::services::WeightEstimate;
use async_trait::async_trait;
use desk_framework::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Quote actor.
#[derive(Clone)]
pub struct QuoteClient {
    inner: ResourceClient<Quote>,
}

impl QuoteClient {
    pub fn new(inner: ResourceClient<Quote>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Quote> for QuoteClient {
    type Error = QuoteError;

    fn inner(&self) -> &ResourceClient<Quote> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        QuoteError::from_framework(e)
    }
}

impl QuoteClient {
    async fn act(&self, id: QuoteId, action: QuoteAction) -> Result<QuoteActionResult, QuoteError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }

    /// Creates and prices a quote. Returns its id.
    #[instrument(skip(self, params))]
    pub async fn create_quote(&self, params: QuoteCreate) -> Result<QuoteId, QuoteError> {
        debug!(customer = %params.customer_name, items = params.items.len(), "Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Applies quote-level changes and returns the repriced quote.
    #[instrument(skip(self))]
    pub async fn update_quote(&self, id: QuoteId, update: QuoteUpdate) -> Result<Quote, QuoteError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, item))]
    pub async fn add_item(&self, id: QuoteId, item: NewLineItem) -> Result<LineItemId, QuoteError> {
        debug!(product = %item.product_name, "Adding item");
        match self.act(id, QuoteAction::AddItem(item)).await? {
            QuoteActionResult::AddItem(item_id) => Ok(item_id),
            _ => Err(QuoteError::UnexpectedResult("AddItem")),
        }
    }

    #[instrument(skip(self))]
    pub async fn edit_item(
        &self,
        id: QuoteId,
        item_id: LineItemId,
        edit: LineItemEdit,
    ) -> Result<LineItem, QuoteError> {
        debug!("Editing item");
        match self.act(id, QuoteAction::EditItem(item_id, edit)).await? {
            QuoteActionResult::EditItem(item) => Ok(item),
            _ => Err(QuoteError::UnexpectedResult("EditItem")),
        }
    }

    /// Removes a row and returns it.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: QuoteId, item_id: LineItemId) -> Result<LineItem, QuoteError> {
        debug!("Removing item");
        match self.act(id, QuoteAction::RemoveItem(item_id)).await? {
            QuoteActionResult::RemoveItem(item) => Ok(item),
            _ => Err(QuoteError::UnexpectedResult("RemoveItem")),
        }
    }

    /// Returns the id of the option that was selected.
    #[instrument(skip(self))]
    pub async fn select_shipping(
        &self,
        id: QuoteId,
        preference: ShippingPreference,
    ) -> Result<String, QuoteError> {
        debug!("Selecting shipping");
        match self.act(id, QuoteAction::SelectShipping(preference)).await? {
            QuoteActionResult::SelectShipping(option_id) => Ok(option_id),
            _ => Err(QuoteError::UnexpectedResult("SelectShipping")),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_handling_mode(
        &self,
        id: QuoteId,
        choice: HandlingModeChoice,
    ) -> Result<HandlingMode, QuoteError> {
        debug!("Setting handling mode");
        match self.act(id, QuoteAction::SetHandlingMode(choice)).await? {
            QuoteActionResult::SetHandlingMode(mode) => Ok(mode),
            _ => Err(QuoteError::UnexpectedResult("SetHandlingMode")),
        }
    }

    #[instrument(skip(self))]
    pub async fn override_handling(&self, id: QuoteId, amount: f64) -> Result<(), QuoteError> {
        debug!("Overriding handling fee");
        match self.act(id, QuoteAction::OverrideHandling(amount)).await? {
            QuoteActionResult::OverrideHandling(()) => Ok(()),
            _ => Err(QuoteError::UnexpectedResult("OverrideHandling")),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_discount(&self, id: QuoteId, discount: Discount) -> Result<(), QuoteError> {
        debug!("Setting discount");
        match self.act(id, QuoteAction::SetDiscount(discount)).await? {
            QuoteActionResult::SetDiscount(()) => Ok(()),
            _ => Err(QuoteError::UnexpectedResult("SetDiscount")),
        }
    }

    /// Reprices the quote. Unlike editing actions, a failure here is returned.
    #[instrument(skip(self))]
    pub async fn recalculate(&self, id: QuoteId) -> Result<QuoteTotals, QuoteError> {
        debug!("Recalculating");
        match self.act(id, QuoteAction::Recalculate).await? {
            QuoteActionResult::Recalculate(totals) => Ok(totals),
            _ => Err(QuoteError::UnexpectedResult("Recalculate")),
        }
    }

    #[instrument(skip(self))]
    pub async fn estimate_weight(
        &self,
        id: QuoteId,
        item_id: LineItemId,
    ) -> Result<WeightEstimate, QuoteError> {
        debug!("Estimating weight");
        match self.act(id, QuoteAction::EstimateWeight(item_id)).await? {
            QuoteActionResult::EstimateWeight(estimate) => Ok(estimate),
            _ => Err(QuoteError::UnexpectedResult("EstimateWeight")),
        }
    }

    /// Current totals in `currency`; the quote itself keeps its own currency.
    #[instrument(skip(self))]
    pub async fn convert_totals(&self, id: QuoteId, currency: &str) -> Result<QuoteTotals, QuoteError> {
        debug!("Converting totals");
        match self
            .act(id, QuoteAction::ConvertTotals(currency.to_string()))
            .await?
        {
            QuoteActionResult::ConvertTotals(totals) => Ok(totals),
            _ => Err(QuoteError::UnexpectedResult("ConvertTotals")),
        }
    }

    #[instrument(skip(self))]
    pub async fn clear_cache(&self, id: QuoteId) -> Result<(), QuoteError> {
        debug!("Clearing cache");
        match self.act(id, QuoteAction::ClearCache).await? {
            QuoteActionResult::ClearCache(()) => Ok(()),
            _ => Err(QuoteError::UnexpectedResult("ClearCache")),
        }
    }

    #[instrument(skip(self))]
    pub async fn transition(&self, id: QuoteId, next: QuoteStatus) -> Result<QuoteStatus, QuoteError> {
        debug!("Changing status");
        match self.act(id, QuoteAction::Transition(next)).await? {
            QuoteActionResult::Transition(status) => Ok(status),
            _ => Err(QuoteError::UnexpectedResult("Transition")),
        }
    }

    /// Pretty-printed JSON of the whole quote.
    #[instrument(skip(self))]
    pub async fn export_json(&self, id: QuoteId) -> Result<String, QuoteError> {
        debug!("Exporting");
        match self.act(id, QuoteAction::ExportJson).await? {
            QuoteActionResult::ExportJson(json) => Ok(json),
            _ => Err(QuoteError::UnexpectedResult("ExportJson")),
        }
    }

    #[instrument(skip(self))]
    pub async fn take_notifications(&self, id: QuoteId) -> Result<Vec<Notification>, QuoteError> {
        debug!("Draining notifications");
        match self.act(id, QuoteAction::TakeNotifications).await? {
            QuoteActionResult::TakeNotifications(notifications) => Ok(notifications),
            _ => Err(QuoteError::UnexpectedResult("TakeNotifications")),
        }
    }
}

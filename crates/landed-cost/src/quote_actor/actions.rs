//! Custom actions for the Quote actor.
//!
//! Everything the desk does to a quote beyond CRUD. Handled by
//! [`ActorEntity::handle_action`](desk_framework::ActorEntity::handle_action) on
//! [`Quote`](crate::model::Quote).

use crate::model::{
    Discount, HandlingMode, HandlingModeChoice, LineItem, LineItemEdit, LineItemId,
    NewLineItem, Notification, QuoteStatus, QuoteTotals, ShippingPreference,
};
use crate::services::WeightEstimate;

/// Operations on a single quote.
///
/// Editing actions are refused once the quote has left `draft`/`pending`, and each one
/// ends with a recalculation.
#[derive(Debug, Clone)]
pub enum QuoteAction {
    AddItem(NewLineItem),
    EditItem(LineItemId, LineItemEdit),
    RemoveItem(LineItemId),
    SelectShipping(ShippingPreference),
    SetHandlingMode(HandlingModeChoice),
    /// Sets manual mode with this fee.
    OverrideHandling(f64),
    SetDiscount(Discount),
    Recalculate,
    /// Replaces the row's weight with the estimator's figure.
    EstimateWeight(LineItemId),
    /// Current totals expressed in another currency. The quote is not modified.
    ConvertTotals(String),
    ClearCache,
    Transition(QuoteStatus),
    ExportJson,
    /// Drains the notification queue.
    TakeNotifications,
}

/// Results from QuoteActions - variants match 1:1 with QuoteAction
#[derive(Debug, Clone)]
pub enum QuoteActionResult {
    AddItem(LineItemId),
    EditItem(LineItem),
    RemoveItem(LineItem),
    /// Id of the option now selected.
    SelectShipping(String),
    SetHandlingMode(HandlingMode),
    OverrideHandling(()),
    SetDiscount(()),
    Recalculate(QuoteTotals),
    EstimateWeight(WeightEstimate),
    ConvertTotals(QuoteTotals),
    ClearCache(()),
    Transition(QuoteStatus),
    ExportJson(String),
    TakeNotifications(Vec<Notification>),
}

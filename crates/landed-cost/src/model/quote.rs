//! A landed-cost quote prepared for one customer.
//!
//! # Desk Framework
//! [`Quote`] implements the [`ActorEntity`](desk_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](desk_framework::ResourceActor).
//!
//! See the `ActorEntity` impl on [`Quote`] for:
//! - Creation parameters ([`QuoteCreate`])
//! - Update parameters ([`QuoteUpdate`])
//! - Custom actions ([`QuoteAction`](crate::quote_actor::QuoteAction))
use super::line_item::{LineItem, LineItemId, NewLineItem};
use super::shipping::{ShippingOption, ShippingPreference};
use super::totals::QuoteTotals;
use crate::calc::CalculationRequest;
use crate::input::{ensure_amount, ensure_percentage, InputError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub u32);

impl From<u32> for QuoteId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "quote_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Pending,
    Sent,
    Approved,
    Rejected,
    Expired,
    Paid,
    Ordered,
    Shipped,
    Delivered,
}

impl QuoteStatus {
    /// Whether `self → next` is an edge of the quote/order state machine.
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Pending, Draft)
                | (Pending, Sent)
                | (Sent, Approved)
                | (Sent, Rejected)
                | (Sent, Expired)
                | (Rejected, Draft)
                | (Expired, Draft)
                | (Approved, Paid)
                | (Paid, Ordered)
                | (Ordered, Shipped)
                | (Shipped, Delivered)
        )
    }

    /// Only quotes still being prepared accept edits.
    pub fn is_editable(self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Pending)
    }

    pub fn is_order_mode(self) -> bool {
        matches!(
            self,
            QuoteStatus::Paid | QuoteStatus::Ordered | QuoteStatus::Shipped | QuoteStatus::Delivered
        )
    }
}

impl Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Pending => "pending",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
            QuoteStatus::Paid => "paid",
            QuoteStatus::Ordered => "ordered",
            QuoteStatus::Shipped => "shipped",
            QuoteStatus::Delivered => "delivered",
        };
        f.write_str(name)
    }
}

/// Where the handling fee comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum HandlingMode {
    /// Follows the selected option's schedule.
    #[default]
    Auto,
    /// Frozen by the operator.
    Manual { amount: f64 },
}

/// Requested handling mode; switching to manual freezes the current fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingModeChoice {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Discount {
    Amount(f64),
    /// Percent of the items value.
    Percentage(f64),
}

impl Default for Discount {
    fn default() -> Self {
        Discount::Amount(0.0)
    }
}

impl Discount {
    pub fn validate(&self) -> Result<(), InputError> {
        match *self {
            Discount::Amount(amount) => ensure_amount("discount", amount).map(|_| ()),
            Discount::Percentage(pct) => ensure_percentage("discount", pct).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Transient message for the operator, drained by `TakeNotifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub customer_name: String,
    pub origin_country: String,
    pub destination_country: String,
    pub currency: String,
    pub items: Vec<LineItem>,
    pub shipping_options: Vec<ShippingOption>,
    /// `Cheapest` and `Fastest` are re-resolved on every recalculation, since the
    /// billing weight that prices per-kg options changes with the items.
    pub shipping_preference: Option<ShippingPreference>,
    pub selected_shipping: Option<String>,
    pub domestic_shipping: f64,
    pub handling_mode: HandlingMode,
    pub insurance_opted_in: bool,
    pub discount: Discount,
    pub status: QuoteStatus,
    pub totals: Option<QuoteTotals>,
    /// Set when the last recalculation failed and `totals` predates the current inputs.
    pub totals_stale: bool,
    #[serde(skip)]
    pub notifications: Vec<Notification>,
    pub(crate) next_item_id: u32,
}

impl Quote {
    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn selected_option(&self) -> Option<&ShippingOption> {
        let selected = self.selected_shipping.as_deref()?;
        self.shipping_options.iter().find(|o| o.id == selected)
    }

    /// `origin→destination`, e.g. `US→IN`.
    pub fn route(&self) -> String {
        format!("{}→{}", self.origin_country, self.destination_country)
    }

    /// Snapshot of everything the calculation engine needs.
    pub fn calculation_request(&self) -> CalculationRequest {
        CalculationRequest {
            currency: self.currency.clone(),
            origin_country: self.origin_country.clone(),
            destination_country: self.destination_country.clone(),
            items: self.items.clone(),
            shipping: self.selected_option().cloned(),
            domestic_shipping: self.domestic_shipping,
            handling_mode: self.handling_mode,
            insurance_opted_in: self.insurance_opted_in,
            discount: self.discount,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }

    pub(crate) fn fresh_item_id(&mut self) -> LineItemId {
        let id = LineItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }
}

/// Payload for creating a quote. Items are validated and totals computed on creation.
#[derive(Debug, Clone, Default)]
pub struct QuoteCreate {
    pub customer_name: String,
    pub origin_country: String,
    pub destination_country: String,
    pub currency: String,
    pub items: Vec<NewLineItem>,
    pub shipping_options: Vec<ShippingOption>,
    pub shipping_preference: Option<ShippingPreference>,
    pub domestic_shipping: f64,
    pub insurance_opted_in: bool,
    pub discount: Discount,
}

impl QuoteCreate {
    pub fn new(
        customer_name: impl Into<String>,
        origin_country: impl Into<String>,
        destination_country: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            origin_country: origin_country.into(),
            destination_country: destination_country.into(),
            currency: currency.into(),
            ..Default::default()
        }
    }
}

/// Quote-level fields that can change while the quote is editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteUpdate {
    pub customer_name: Option<String>,
    pub origin_country: Option<String>,
    pub destination_country: Option<String>,
    pub currency: Option<String>,
    pub domestic_shipping: Option<f64>,
    pub insurance_opted_in: Option<bool>,
}

/// One row of the quotes table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub customer_name: String,
    pub route: String,
    pub status: QuoteStatus,
    pub item_count: usize,
    pub final_total: Option<f64>,
    pub currency: String,
    pub totals_stale: bool,
}

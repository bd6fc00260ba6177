//! [`ActorEntity`] implementation for [`Quote`].
//!
//! Every hook receives the [`QuoteServices`] bundle. Edits are applied first and then
//! priced through the calculation engine; a failed recalculation never rolls an edit
//! back; it leaves the previous totals in place, marked stale.

use super::actions::{QuoteAction, QuoteActionResult};
use super::error::QuoteError;
use crate::calc::{self, CalcError};
use crate::input::{ensure_amount, parse_code, InputError};
use crate::model::{
    HandlingMode, HandlingModeChoice, LineItem, NotificationLevel, Quote, QuoteCreate, QuoteId,
    QuoteStatus, QuoteSummary, QuoteTotals, QuoteUpdate, ShippingOption, ShippingPreference,
};
use crate::services::QuoteServices;
use async_trait::async_trait;
use desk_framework::ActorEntity;
use tracing::{debug, info, warn};

fn validate_options(options: &[ShippingOption]) -> Result<(), CalcError> {
    options.iter().try_for_each(ShippingOption::validate)
}

/// Resolves a fixed preference up front. Dynamic ones are resolved when pricing.
fn initial_selection(
    options: &[ShippingOption],
    preference: Option<&ShippingPreference>,
) -> Result<Option<String>, CalcError> {
    match preference {
        None => Ok(None),
        Some(_) if options.is_empty() => Err(CalcError::NoShippingOptions),
        Some(preference @ ShippingPreference::Id(_)) => {
            Ok(Some(calc::shipping::select_option(options, preference, 0.0)?.id.clone()))
        }
        Some(_) => Ok(None),
    }
}

impl Quote {
    fn ensure_editable(&self) -> Result<(), QuoteError> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(QuoteError::NotEditable(self.status))
        }
    }

    /// Prices the quote through the engine and stores the result.
    ///
    /// A `Cheapest`/`Fastest` preference is re-resolved first against the current
    /// billing weight. A cache failure does not fail the refresh.
    async fn refresh(&mut self, ctx: &QuoteServices) -> Result<QuoteTotals, QuoteError> {
        if let Some(preference) = self
            .shipping_preference
            .clone()
            .filter(|p| !matches!(p, ShippingPreference::Id(_)))
        {
            let weight = ctx.engine.billing_weight(&self.items).await?;
            let chosen = calc::shipping::select_option(&self.shipping_options, &preference, weight)?;
            debug!(quote = %self.id, option = %chosen.id, weight, "Resolved shipping preference");
            self.selected_shipping = Some(chosen.id.clone());
        }

        let totals = ctx.engine.calculate(&self.calculation_request()).await?;

        if let Err(e) = ctx.cache.store(self.id, &totals).await {
            warn!(quote = %self.id, error = %e, "Could not cache totals");
            self.notify(
                NotificationLevel::Warning,
                format!("Totals were not cached: {e}"),
            );
        }

        info!(quote = %self.id, final_total = totals.final_total, "Totals updated");
        self.totals = Some(totals.clone());
        self.totals_stale = false;
        Ok(totals)
    }

    /// Handling the selected option's schedule charges for the current items.
    fn scheduled_handling(&self) -> f64 {
        let items_value = calc::round_cents(self.items.iter().map(LineItem::items_value).sum());
        calc::round_cents(calc::fees::handling_for(
            HandlingMode::Auto,
            items_value,
            self.selected_option(),
        ))
    }

    fn record_failure(&mut self, error: &QuoteError) {
        warn!(quote = %self.id, %error, "Recalculation abandoned");
        self.notify(NotificationLevel::Error, error.to_string());
        self.totals_stale = true;
    }

    /// Recalculation after an edit: failures are flagged on the quote, not returned.
    async fn recalculate_or_flag(&mut self, ctx: &QuoteServices) {
        if let Err(e) = self.refresh(ctx).await {
            self.record_failure(&e);
        }
    }
}

#[async_trait]
impl ActorEntity for Quote {
    type Id = QuoteId;
    type Create = QuoteCreate;
    type Update = QuoteUpdate;
    type Action = QuoteAction;
    type ActionResult = QuoteActionResult;
    type Summary = QuoteSummary;
    type Context = QuoteServices;
    type Error = QuoteError;

    /// Validates the whole payload; nothing is priced yet.
    fn from_create_params(id: QuoteId, params: QuoteCreate) -> Result<Self, QuoteError> {
        let customer_name = params.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(InputError::Empty {
                field: "customer_name",
            }
            .into());
        }
        let origin_country = parse_code("origin_country", &params.origin_country)?;
        let destination_country = parse_code("destination_country", &params.destination_country)?;
        let currency = parse_code("currency", &params.currency)?;
        ensure_amount("domestic_shipping", params.domestic_shipping)?;
        params.discount.validate()?;
        validate_options(&params.shipping_options)?;
        let selected_shipping = initial_selection(
            &params.shipping_options,
            params.shipping_preference.as_ref(),
        )?;

        let mut quote = Quote {
            id,
            customer_name,
            origin_country,
            destination_country,
            currency,
            items: Vec::with_capacity(params.items.len()),
            shipping_options: params.shipping_options,
            shipping_preference: params.shipping_preference,
            selected_shipping,
            domestic_shipping: params.domestic_shipping,
            handling_mode: HandlingMode::Auto,
            insurance_opted_in: params.insurance_opted_in,
            discount: params.discount,
            status: QuoteStatus::Draft,
            totals: None,
            totals_stale: false,
            notifications: Vec::new(),
            next_item_id: 1,
        };
        for new_item in params.items {
            new_item.validate()?;
            let item_id = quote.fresh_item_id();
            quote.items.push(new_item.into_item(item_id)?);
        }
        Ok(quote)
    }

    fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            customer_name: self.customer_name.clone(),
            route: self.route(),
            status: self.status,
            item_count: self.items.len(),
            final_total: self.totals.as_ref().map(|t| t.final_total),
            currency: self.currency.clone(),
            totals_stale: self.totals_stale,
        }
    }

    /// The copy starts over as an unpriced draft; `on_create` prices it.
    fn on_duplicate(&self, id: QuoteId) -> Result<Self, QuoteError> {
        let mut copy = self.clone();
        copy.id = id;
        copy.status = QuoteStatus::Draft;
        copy.notifications.clear();
        copy.totals = None;
        copy.totals_stale = false;
        Ok(copy)
    }

    async fn on_create(&mut self, ctx: &QuoteServices) -> Result<(), QuoteError> {
        self.recalculate_or_flag(ctx).await;
        Ok(())
    }

    /// All fields are validated before any is applied.
    async fn on_update(&mut self, update: QuoteUpdate, ctx: &QuoteServices) -> Result<(), QuoteError> {
        self.ensure_editable()?;

        let customer_name = match update.customer_name {
            Some(name) if name.trim().is_empty() => {
                return Err(InputError::Empty {
                    field: "customer_name",
                }
                .into())
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        let origin_country = update
            .origin_country
            .map(|code| parse_code("origin_country", &code))
            .transpose()?;
        let destination_country = update
            .destination_country
            .map(|code| parse_code("destination_country", &code))
            .transpose()?;
        let currency = update
            .currency
            .map(|code| parse_code("currency", &code))
            .transpose()?;
        let domestic_shipping = update
            .domestic_shipping
            .map(|amount| ensure_amount("domestic_shipping", amount))
            .transpose()?;

        if let Some(name) = customer_name {
            self.customer_name = name;
        }
        if let Some(code) = origin_country {
            self.origin_country = code;
        }
        if let Some(code) = destination_country {
            self.destination_country = code;
        }
        if let Some(code) = currency {
            self.currency = code;
        }
        if let Some(amount) = domestic_shipping {
            self.domestic_shipping = amount;
        }
        if let Some(opted_in) = update.insurance_opted_in {
            self.insurance_opted_in = opted_in;
        }

        self.recalculate_or_flag(ctx).await;
        Ok(())
    }

    async fn on_delete(&self, ctx: &QuoteServices) -> Result<(), QuoteError> {
        ctx.cache.invalidate(self.id).await?;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: QuoteAction,
        ctx: &QuoteServices,
    ) -> Result<QuoteActionResult, QuoteError> {
        match action {
            QuoteAction::AddItem(new_item) => {
                self.ensure_editable()?;
                new_item.validate()?;
                let item_id = self.fresh_item_id();
                self.items.push(new_item.into_item(item_id)?);
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::AddItem(item_id))
            }
            QuoteAction::EditItem(item_id, edit) => {
                self.ensure_editable()?;
                let slot = self
                    .items
                    .iter_mut()
                    .find(|item| item.id == item_id)
                    .ok_or(QuoteError::UnknownItem(item_id))?;
                *slot = slot.edited(edit)?;
                let edited = slot.clone();
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::EditItem(edited))
            }
            QuoteAction::RemoveItem(item_id) => {
                self.ensure_editable()?;
                let index = self
                    .items
                    .iter()
                    .position(|item| item.id == item_id)
                    .ok_or(QuoteError::UnknownItem(item_id))?;
                let removed = self.items.remove(index);
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::RemoveItem(removed))
            }
            QuoteAction::SelectShipping(preference) => {
                self.ensure_editable()?;
                let weight = match preference {
                    ShippingPreference::Id(_) => 0.0,
                    _ => match ctx.engine.billing_weight(&self.items).await {
                        Ok(weight) => weight,
                        Err(e) => {
                            let e = QuoteError::from(e);
                            self.record_failure(&e);
                            return Err(e);
                        }
                    },
                };
                let chosen =
                    calc::shipping::select_option(&self.shipping_options, &preference, weight)?
                        .id
                        .clone();
                self.shipping_preference = Some(preference);
                self.selected_shipping = Some(chosen.clone());
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::SelectShipping(chosen))
            }
            QuoteAction::SetHandlingMode(choice) => {
                self.ensure_editable()?;
                self.handling_mode = match choice {
                    HandlingModeChoice::Auto => HandlingMode::Auto,
                    HandlingModeChoice::Manual => match self.handling_mode {
                        manual @ HandlingMode::Manual { .. } => manual,
                        HandlingMode::Auto => HandlingMode::Manual {
                            amount: self.scheduled_handling(),
                        },
                    },
                };
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::SetHandlingMode(self.handling_mode))
            }
            QuoteAction::OverrideHandling(amount) => {
                self.ensure_editable()?;
                let amount = ensure_amount("handling", amount)?;
                self.handling_mode = HandlingMode::Manual { amount };
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::OverrideHandling(()))
            }
            QuoteAction::SetDiscount(discount) => {
                self.ensure_editable()?;
                discount.validate()?;
                self.discount = discount;
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::SetDiscount(()))
            }
            QuoteAction::Recalculate => match self.refresh(ctx).await {
                Ok(totals) => Ok(QuoteActionResult::Recalculate(totals)),
                Err(e) => {
                    self.record_failure(&e);
                    Err(e)
                }
            },
            QuoteAction::EstimateWeight(item_id) => {
                self.ensure_editable()?;
                let item = self
                    .item(item_id)
                    .cloned()
                    .ok_or(QuoteError::UnknownItem(item_id))?;
                let estimate = match ctx.weights.estimate_weight(&item).await {
                    Ok(estimate) => estimate,
                    Err(e) => {
                        let e = QuoteError::from(e);
                        warn!(quote = %self.id, item = %item_id, error = %e, "Weight estimate failed");
                        self.notify(NotificationLevel::Error, e.to_string());
                        return Err(e);
                    }
                };
                let weight_kg = ensure_amount("weight_kg", estimate.weight_kg)?;
                if let Some(slot) = self.items.iter_mut().find(|i| i.id == item_id) {
                    slot.weight_kg = weight_kg;
                }
                self.notify(
                    NotificationLevel::Info,
                    format!(
                        "Estimated {weight_kg} kg for {} ({:.0}% confidence)",
                        item.product_name,
                        estimate.confidence * 100.0
                    ),
                );
                self.recalculate_or_flag(ctx).await;
                Ok(QuoteActionResult::EstimateWeight(estimate))
            }
            QuoteAction::ConvertTotals(target) => {
                let totals = self.totals.as_ref().ok_or(QuoteError::NoTotals)?;
                let target = parse_code("currency", &target)?;
                let rate = ctx.currency.exchange_rate(&totals.currency, &target).await?;
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(CalcError::InvalidExchangeRate(rate).into());
                }
                Ok(QuoteActionResult::ConvertTotals(totals.converted(target, rate)))
            }
            QuoteAction::ClearCache => {
                ctx.cache.invalidate(self.id).await?;
                info!(quote = %self.id, "Cache cleared");
                Ok(QuoteActionResult::ClearCache(()))
            }
            QuoteAction::Transition(next) => {
                if !self.status.can_transition_to(next) {
                    return Err(QuoteError::InvalidTransition {
                        from: self.status,
                        to: next,
                    });
                }
                if next == QuoteStatus::Sent {
                    if self.selected_option().is_none() {
                        return Err(QuoteError::NotReadyToSend("no shipping option selected"));
                    }
                    if self.totals.is_none() || self.totals_stale {
                        return Err(QuoteError::NotReadyToSend("totals are not up to date"));
                    }
                }
                info!(quote = %self.id, from = %self.status, to = %next, "Status changed");
                self.status = next;
                Ok(QuoteActionResult::Transition(next))
            }
            QuoteAction::ExportJson => {
                Ok(QuoteActionResult::ExportJson(serde_json::to_string_pretty(&*self)?))
            }
            QuoteAction::TakeNotifications => Ok(QuoteActionResult::TakeNotifications(
                std::mem::take(&mut self.notifications),
            )),
        }
    }
}

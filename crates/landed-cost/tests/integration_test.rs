use desk_framework::ActorClient;
use landed_cost::config::CostConfig;
use landed_cost::lifecycle::QuoteSystem;
use landed_cost::model::{
    Discount, Dimensions, HandlingCharge, HandlingMode,
    HandlingModeChoice, InsuranceTerms, LineItemEdit, NewLineItem, NotificationLevel,
    QuoteCreate, QuoteStatus, QuoteUpdate, ShippingOption, ShippingPreference, TransitDays,
};
use landed_cost::quote_actor::QuoteError;
use landed_cost::services::{InMemoryQuoteCache, QuoteServices, ServiceError};
use std::sync::Arc;

fn config() -> Arc<CostConfig> {
    Arc::new(CostConfig::embedded().unwrap())
}

fn sample_quote() -> QuoteCreate {
    let dhl = ShippingOption::new("dhl", "DHL", "Express", 89.5, TransitDays::new(3, 5))
        .with_handling(HandlingCharge {
            base_fee: 0.0,
            percentage_of_value: 1.0,
            min_fee: 25.0,
            max_fee: 75.0,
        })
        .with_insurance(InsuranceTerms {
            coverage_percentage: 1.0,
            min_fee: 5.0,
            max_coverage: 500.0,
        });
    let fedex = ShippingOption::new("fedex", "FedEx", "Economy", 65.0, TransitDays::new(7, 10));

    QuoteCreate {
        items: vec![
            NewLineItem::new("MacBook Air M2", 1199.0, 1, 1.24)
                .with_hsn("8471")
                .with_dimensions(Dimensions::cm(30.4, 21.5, 1.13)),
            NewLineItem::new("Sony WH-1000XM5", 349.99, 1, 0.25).with_hsn("8518"),
            NewLineItem::new("Nike Air Max 270", 149.99, 1, 0.9).with_hsn("6403"),
        ],
        shipping_options: vec![dhl, fedex],
        shipping_preference: Some(ShippingPreference::Id("dhl".into())),
        domestic_shipping: 25.0,
        insurance_opted_in: true,
        ..QuoteCreate::new("Arjun Mehta", "US", "IN", "USD")
    }
}

#[tokio::test]
async fn test_sample_quote_is_priced_on_create() {
    let system = QuoteSystem::new(config());
    let client = &system.quote_client;

    let id = client.create_quote(sample_quote()).await.unwrap();
    let quote = client.get(id).await.unwrap().expect("quote exists");

    assert_eq!(quote.status, QuoteStatus::Draft);
    assert_eq!(quote.selected_shipping.as_deref(), Some("dhl"));
    assert!(!quote.totals_stale);
    let totals = quote.totals.expect("priced on create");
    assert_eq!(totals.items_value, 1698.98);
    assert_eq!(totals.international_shipping, 89.5);
    assert_eq!(totals.domestic_shipping, 25.0);
    assert_eq!(totals.handling, 25.0);
    assert_eq!(totals.insurance, 16.99);
    assert_eq!(totals.sales_tax, 150.87);
    assert_eq!(totals.final_total, totals.component_sum());
    assert!(totals.customs_breakdown.is_blended());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_editing_flow_reprices_every_step() {
    let system = QuoteSystem::new(config());
    let client = &system.quote_client;
    let id = client.create_quote(sample_quote()).await.unwrap();

    let item_id = client
        .add_item(id, NewLineItem::new("Kindle Paperwhite", 139.99, 2, 0.21))
        .await
        .unwrap();
    let quote = client.get(id).await.unwrap().unwrap();
    assert_eq!(quote.items.len(), 4);
    assert_eq!(quote.totals.as_ref().unwrap().items_value, 1978.96);
    // A country-taxed row next to HSN rows: rates are itemized.
    assert!(!quote.totals.unwrap().customs_breakdown.is_blended());

    let edited = client
        .edit_item(
            id,
            item_id,
            LineItemEdit {
                quantity: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.quantity, 1);

    let removed = client.remove_item(id, item_id).await.unwrap();
    assert_eq!(removed.product_name, "Kindle Paperwhite");
    let totals = client.recalculate(id).await.unwrap();
    assert_eq!(totals.items_value, 1698.98);

    // Ids are never handed out twice.
    let next = client
        .add_item(id, NewLineItem::new("USB-C cable", 19.0, 1, 0.05))
        .await
        .unwrap();
    assert!(next.0 > item_id.0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shipping_handling_and_discount() {
    let system = QuoteSystem::new(config());
    let client = &system.quote_client;
    let id = client.create_quote(sample_quote()).await.unwrap();

    let chosen = client
        .select_shipping(id, ShippingPreference::Cheapest)
        .await
        .unwrap();
    assert_eq!(chosen, "fedex");
    let totals = client.recalculate(id).await.unwrap();
    assert_eq!(totals.international_shipping, 65.0);
    // FedEx offers neither a handling schedule nor insurance.
    assert_eq!(totals.handling, 0.0);
    assert_eq!(totals.insurance, 0.0);

    client
        .select_shipping(id, ShippingPreference::Fastest)
        .await
        .unwrap();
    let frozen = client
        .set_handling_mode(id, HandlingModeChoice::Manual)
        .await
        .unwrap();
    assert_eq!(frozen, HandlingMode::Manual { amount: 25.0 });

    client.override_handling(id, 40.0).await.unwrap();
    client
        .set_discount(id, Discount::Percentage(10.0))
        .await
        .unwrap();
    let totals = client.recalculate(id).await.unwrap();
    assert_eq!(totals.handling, 40.0);
    assert_eq!(totals.discount, 169.9);
    assert_eq!(totals.final_total, totals.component_sum());

    let auto = client
        .set_handling_mode(id, HandlingModeChoice::Auto)
        .await
        .unwrap();
    assert_eq!(auto, HandlingMode::Auto);
    assert_eq!(client.recalculate(id).await.unwrap().handling, 25.0);

    let err = client
        .set_discount(id, Discount::Percentage(120.0))
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::Input(_)));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_and_currency_conversion() {
    let system = QuoteSystem::new(config());
    let client = &system.quote_client;
    let id = client.create_quote(sample_quote()).await.unwrap();

    let quote = client
        .update_quote(
            id,
            QuoteUpdate {
                customer_name: Some("Arjun M.".into()),
                domestic_shipping: Some(0.0),
                insurance_opted_in: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(quote.customer_name, "Arjun M.");
    let totals = quote.totals.unwrap();
    assert_eq!(totals.domestic_shipping, 0.0);
    assert_eq!(totals.insurance, 0.0);

    let inr = client.convert_totals(id, "inr").await.unwrap();
    assert_eq!(inr.currency, "INR");
    assert_eq!(inr.final_total, inr.component_sum());
    assert!(inr.final_total > totals.final_total);

    // Conversion is presentation only.
    let quote = client.get(id).await.unwrap().unwrap();
    assert_eq!(quote.currency, "USD");
    assert_eq!(quote.totals.unwrap().currency, "USD");

    let err = client
        .update_quote(
            id,
            QuoteUpdate {
                destination_country: Some("India".into()),
                customer_name: Some("Changed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::Input(_)));
    // Nothing was applied.
    let quote = client.get(id).await.unwrap().unwrap();
    assert_eq!(quote.customer_name, "Arjun M.");

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_flow_locks_the_quote() {
    let system = QuoteSystem::new(config());
    let client = &system.quote_client;
    let id = client.create_quote(sample_quote()).await.unwrap();

    let err = client.transition(id, QuoteStatus::Sent).await.unwrap_err();
    assert!(matches!(
        err,
        QuoteError::InvalidTransition {
            from: QuoteStatus::Draft,
            to: QuoteStatus::Sent
        }
    ));

    for next in [QuoteStatus::Pending, QuoteStatus::Sent, QuoteStatus::Approved] {
        assert_eq!(client.transition(id, next).await.unwrap(), next);
    }

    let err = client
        .add_item(id, NewLineItem::new("Late addition", 5.0, 1, 0.1))
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::NotEditable(QuoteStatus::Approved)));

    for next in [
        QuoteStatus::Paid,
        QuoteStatus::Ordered,
        QuoteStatus::Shipped,
        QuoteStatus::Delivered,
    ] {
        client.transition(id, next).await.unwrap();
    }
    let quote = client.get(id).await.unwrap().unwrap();
    assert!(quote.status.is_order_mode());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_quote_without_selection_cannot_be_sent() {
    let system = QuoteSystem::new(config());
    let client = &system.quote_client;
    let mut params = sample_quote();
    params.shipping_preference = None;
    let id = client.create_quote(params).await.unwrap();

    client.transition(id, QuoteStatus::Pending).await.unwrap();
    let err = client.transition(id, QuoteStatus::Sent).await.unwrap_err();
    assert!(matches!(err, QuoteError::NotReadyToSend(_)));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_list_duplicate_export_and_delete() {
    let cache = Arc::new(InMemoryQuoteCache::new());
    let services = QuoteServices::local(config()).with_cache(cache.clone());
    let system = QuoteSystem::with_services(services);
    let client = &system.quote_client;

    let first = client.create_quote(sample_quote()).await.unwrap();
    client.transition(first, QuoteStatus::Pending).await.unwrap();
    client.transition(first, QuoteStatus::Sent).await.unwrap();
    let copy = client.duplicate(first).await.unwrap();
    assert_ne!(copy, first);

    let rows = client.list().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, first);
    assert_eq!(rows[0].1.status, QuoteStatus::Sent);
    assert_eq!(rows[1].1.status, QuoteStatus::Draft);
    assert_eq!(rows[1].1.route, "US→IN");
    assert_eq!(rows[0].1.final_total, rows[1].1.final_total);
    assert!(cache.cached(copy).await.is_some());

    let json = client.export_json(copy).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["customer_name"], "Arjun Mehta");
    assert_eq!(value["status"], "draft");
    assert_eq!(value["items"].as_array().unwrap().len(), 3);

    client.delete(first).await.unwrap();
    assert!(client.get(first).await.unwrap().is_none());
    assert!(cache.cached(first).await.is_none());
    assert_eq!(cache.invalidation_count().await, 1);

    client.clear_cache(copy).await.unwrap();
    assert!(cache.cached(copy).await.is_none());

    let err = client.recalculate(first).await.unwrap_err();
    assert!(matches!(err, QuoteError::NotFound(_)));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_weight_estimates_and_notifications() {
    let system = QuoteSystem::new(config());
    let client = &system.quote_client;
    let mut params = sample_quote();
    params.items.push(NewLineItem::new("Garden gnome", 30.0, 1, 2.0));
    let id = client.create_quote(params).await.unwrap();
    let quote = client.get(id).await.unwrap().unwrap();
    let macbook = quote.items[0].id;
    let gnome = quote.items[3].id;

    let estimate = client.estimate_weight(id, macbook).await.unwrap();
    assert_eq!(estimate.weight_kg, 1.3);
    let quote = client.get(id).await.unwrap().unwrap();
    assert_eq!(quote.item(macbook).unwrap().weight_kg, 1.3);

    let err = client.estimate_weight(id, gnome).await.unwrap_err();
    assert!(matches!(
        err,
        QuoteError::Service(ServiceError::NoEstimate(_))
    ));

    let notifications = client.take_notifications(id).await.unwrap();
    let levels: Vec<_> = notifications.iter().map(|n| n.level).collect();
    assert_eq!(
        levels,
        vec![NotificationLevel::Info, NotificationLevel::Error]
    );
    assert!(client.take_notifications(id).await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

//! Quote desk demo: prices a sample US→IN order end to end.

use desk_framework::tracing::setup_tracing;
use landed_cost::config::load_config;
use landed_cost::lifecycle::QuoteSystem;
use landed_cost::model::{
    Dimensions, HandlingCharge, InsuranceTerms, NewLineItem, QuoteCreate, QuoteTotals,
    ShippingOption, ShippingPreference, TransitDays,
};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

fn sample_quote() -> QuoteCreate {
    let dhl = ShippingOption::new("dhl", "DHL", "Express", 89.50, TransitDays::new(3, 5))
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
    let fedex = ShippingOption::new("fedex", "FedEx", "Economy", 65.00, TransitDays::new(7, 10));

    QuoteCreate {
        items: vec![
            NewLineItem::new("MacBook Air M2", 1199.00, 1, 1.24)
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

fn print_totals(totals: &QuoteTotals) {
    let c = &totals.currency;
    println!("  Items value            {c} {:>12.2}", totals.items_value);
    println!("  International shipping {c} {:>12.2}", totals.international_shipping);
    println!("  Domestic shipping      {c} {:>12.2}", totals.domestic_shipping);
    println!("  Handling               {c} {:>12.2}", totals.handling);
    println!("  Insurance              {c} {:>12.2}", totals.insurance);
    println!("  Customs                {c} {:>12.2}", totals.customs);
    println!("  Sales tax              {c} {:>12.2}", totals.sales_tax);
    println!("  Destination tax        {c} {:>12.2}", totals.destination_tax);
    println!("  Discount               {c} {:>12.2}", -totals.discount);
    println!("  Final total            {c} {:>12.2}", totals.final_total);
    println!("  Gateway fee            {c} {:>12.2}", totals.gateway_fee);
    println!("  Total payable          {c} {:>12.2}", totals.total_payable);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = Arc::new(load_config()?);
    info!("Starting quote desk");
    let system = QuoteSystem::new(config);
    let client = &system.quote_client;

    let span = tracing::info_span!("sample_quote");
    let id = async {
        info!("Creating sample quote");
        client.create_quote(sample_quote()).await
    }
    .instrument(span)
    .await?;

    let totals = client.recalculate(id).await?;
    println!("Quote {id} ({} kg billable)", totals.billing_weight_kg);
    print_totals(&totals);

    for notification in client.take_notifications(id).await? {
        warn!(level = ?notification.level, "{}", notification.message);
    }

    println!("\n{}", client.export_json(id).await?);

    match client.convert_totals(id, "INR").await {
        Ok(inr) => {
            println!("\nIn INR:");
            print_totals(&inr);
        }
        Err(e) => warn!(error = %e, "Conversion failed"),
    }

    system.shutdown().await?;
    info!("Quote desk stopped");
    Ok(())
}

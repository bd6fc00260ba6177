//! # Landed Cost
//!
//! Quote desk for cross-border purchases: the price of the goods plus everything it
//! takes to land them at the customer's door (international and domestic shipping,
//! handling, insurance, customs on the CIF value, sales tax and destination VAT/GST),
//! less discounts, plus the payment gateway fee.
//!
//! - [`calc`] - pure landed-cost arithmetic
//! - [`config`] - rates, divisors and tables loaded from TOML
//! - [`input`] - parsing operator-typed text
//! - [`model`] - quotes, line items, shipping options, totals
//! - [`services`] - engine, currency, weight-estimation and cache seams
//! - [`quote_actor`] - the quote resource on the desk framework
//! - [`clients`] - the typed [`QuoteClient`](clients::QuoteClient)
//! - [`lifecycle`] - [`QuoteSystem`](lifecycle::QuoteSystem) startup and shutdown

pub mod calc;
pub mod clients;
pub mod config;
pub mod input;
pub mod lifecycle;
pub mod model;
pub mod quote_actor;
pub mod services;

//! Typed clients over the generic desk framework client.

pub mod quote_client;

pub use quote_client::QuoteClient;

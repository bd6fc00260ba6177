//! # Domain Model
//!
//! Plain data for the quote desk: product rows, shipping options, the quote itself
//! and the totals derived from it. Rules that need configuration or collaborators
//! live in [`crate::calc`] and [`crate::quote_actor`].

pub mod line_item;
pub mod quote;
pub mod shipping;
pub mod totals;

pub use line_item::*;
pub use quote::*;
pub use shipping::*;
pub use totals::*;

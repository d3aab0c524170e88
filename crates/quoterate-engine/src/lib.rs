//! # QuoteRate Engine
//!
//! Policy rating for insurance quotes.
//!
//! ## Rating Formula
//!
//! ```text
//! acc      = base(tier)
//! acc      = fold(variables by priority, acc)
//! subtotal = round(acc, 2)
//! taxes    = trunc(acc * tax%)
//! total    = trunc(subtotal + acc * tax%)
//! ```
//!
//! Where each variable either replaces `acc` (additive) or scales it by a
//! percentage (multiplier), with its value taken from the quote or from a
//! global/jurisdiction policy variable.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod snapshot;
pub mod store;

pub use catalog::{SpecificationCatalog, SpecificationTable};
pub use config::{ConfigTables, RatingConfig, RatingSnapshot};
pub use engine::{calculate_quote_rate, PolicyRater};
pub use store::{PolicyVariableStore, VariableTable};

//! # QuoteRate Common
//!
//! Shared data model, errors, and cent arithmetic for the QuoteRate policy
//! rating engine.
//!
//! ## Core Types
//!
//! - [`PolicyVariable`]: scoped numeric configuration value
//! - [`VariableSpecification`]: how a quote variable is resolved and applied
//! - [`Quote`]/[`QuoteVariable`]: the priced object and its attached variables
//! - [`RatingResult`]: subtotal, taxes and total of a rated quote
//!
//! ## Arithmetic
//!
//! - [`truncate_to_cents`]: floor to two decimal places
//! - [`round_to_cents`]: round to two decimal places, ties to even
//! - [`normalized_percent`]: percentage to fraction

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{RatingError, Result, StoreError, ValidationError};
pub use types::{
    policy_variable::{
        PolicyVariable, BASIC_POLICY_BASE_KEY, GLOBAL_SCOPE, PREMIUM_POLICY_BASE_KEY,
        STATE_TAX_RATE_KEY,
    },
    quote::{CoverageTier, Customer, Quote, QuoteVariable},
    rating::{normalized_percent, round_to_cents, truncate_to_cents, RatingResult},
    specification::{ApplicationMode, ResolutionType, VariableSpecification, DEFAULT_PRIORITY},
};

/// QuoteRate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error types for QuoteRate
//!
//! Provides the unified rating error, the validation errors it wraps, and the
//! store error that converts into it.

use thiserror::Error;

/// Result type alias using RatingError
pub type Result<T> = std::result::Result<T, RatingError>;

/// Unified error type for rating operations
#[derive(Debug, Error)]
pub enum RatingError {
    // Required base cost, tax rate or scoped lookup value is absent
    #[error("Missing configuration: no value for '{key}' in scope '{scope}'")]
    MissingConfiguration { scope: String, key: String },

    // Quote variable references a specification the catalog does not hold
    #[error("Unknown variable specification: {0}")]
    UnknownSpecification(String),

    // Data model validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RatingError {
    /// Whether the error aborts a calculation because configuration is absent
    pub fn is_missing_configuration(&self) -> bool {
        matches!(self, RatingError::MissingConfiguration { .. })
    }
}

/// Policy variable store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No policy variable '{key}' in scope '{scope}'")]
    NotFound { scope: String, key: String },
}

/// Every value the rater looks up is required, so a failed lookup is fatal
impl From<StoreError> for RatingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { scope, key } => RatingError::MissingConfiguration { scope, key },
        }
    }
}

/// Data model invariant violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Specification '{code}' uses a lookup resolution but has no lookup key")]
    MissingLookupKey { code: String },

    #[error("Specification '{code}' is already attached to quote {quote}")]
    DuplicateVariable { quote: u64, code: String },

    #[error("Specification code must not be empty")]
    EmptyCode,

    #[error("Variable '{code}' belongs to quote {owner}, not quote {quote}")]
    ForeignVariable { quote: u64, owner: u64, code: String },

    #[error("Quote {0} does not exist")]
    UnknownQuote(u64),

    #[error("Customer {0} does not exist")]
    UnknownCustomer(u64),
}

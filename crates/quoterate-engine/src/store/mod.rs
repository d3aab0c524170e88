//! Policy variable store
//!
//! Provides the `(scope, key) -> value` lookup contract consumed by the
//! rater. It is implemented by immutable views only: a [`VariableTable`]
//! and the [`RatingSnapshot`](crate::config::RatingSnapshot) that wraps one.

pub mod variables;

pub use variables::VariableTable;

use quoterate_common::StoreError;

/// Read access to scoped policy variables
///
/// Lookups are exact: no partial matching and no defaulting. A missing
/// `(scope, key)` pair fails with [`StoreError::NotFound`].
pub trait PolicyVariableStore: Send + Sync {
    fn lookup(&self, scope: &str, key: &str) -> Result<f64, StoreError>;
}

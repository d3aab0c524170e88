//! Policy Variables - scoped numeric configuration
//!
//! Every value the rater reads (base costs, tax rates, multipliers) is a
//! `PolicyVariable` addressed by `(scope, key)`. The scope is either
//! [`GLOBAL_SCOPE`] or a jurisdiction code such as `"NY"`.

use serde::{Deserialize, Serialize};

/// Scope holding values shared by every jurisdiction
pub const GLOBAL_SCOPE: &str = "global";

/// Base cost of a basic-tier policy (global scope)
pub const BASIC_POLICY_BASE_KEY: &str = "basic_policy_base";

/// Base cost of a premium-tier policy (global scope)
pub const PREMIUM_POLICY_BASE_KEY: &str = "premium_policy_base";

/// Tax rate percentage (jurisdiction scope)
pub const STATE_TAX_RATE_KEY: &str = "state_tax_rate";

/// A single scoped configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyVariable {
    /// `global` or a jurisdiction code
    pub scope: String,
    /// Variable name, unique within its scope
    pub key: String,
    /// Configured value
    pub value: f64,
}

impl PolicyVariable {
    pub fn new(scope: impl Into<String>, key: impl Into<String>, value: f64) -> Self {
        Self {
            scope: scope.into(),
            key: key.into(),
            value,
        }
    }

    /// Create a variable in the global scope
    pub fn global(key: impl Into<String>, value: f64) -> Self {
        Self::new(GLOBAL_SCOPE, key, value)
    }

    pub fn is_global(&self) -> bool {
        self.scope == GLOBAL_SCOPE
    }
}

//! Serialized quote view
//!
//! ```json
//! {
//!   "customer_name": "Leroy Jenkins",
//!   "description": "This is a great quote",
//!   "state": "TX",
//!   "coverage_type": "basic",
//!   "cost": {"subtotal": 40.8, "taxes": 0.4, "total": 41.2}
//! }
//! ```

use quoterate_common::{CoverageTier, Quote, RatingResult};
use serde::{Deserialize, Serialize};

/// Quote as exposed to consumers, priced on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteView {
    pub customer_name: String,
    pub description: Option<String>,
    pub state: String,
    pub coverage_type: CoverageTier,
    pub cost: RatingResult,
}

impl QuoteView {
    pub fn new(quote: &Quote, cost: RatingResult) -> Self {
        Self {
            customer_name: quote.customer_name().to_string(),
            description: quote.description.clone(),
            state: quote.jurisdiction.clone(),
            coverage_type: quote.coverage_tier,
            cost,
        }
    }
}

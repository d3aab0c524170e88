//! JSON fixture loading
//!
//! A fixture directory holds one JSON array per record type:
//!
//! ```text
//! customers.json                [{"id": 1, "name": "..."}]
//! policy_variables.json         [{"scope": "global", "key": "...", "value": 15.0}]
//! variable_specifications.json  [{"code": "...", "resolution_type": "...", ...}]
//! quotes.json                   [{"id": 1, "customer": 1, "state": "TX", "coverage_type": "basic"}]
//! quote_variables.json          [{"quote_id": 1, "spec_code": "...", "value": 25.0}]
//! ```
//!
//! Missing files load as empty.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quoterate_common::{
    CoverageTier, Customer, PolicyVariable, Quote, QuoteVariable, RatingError, Result,
    ValidationError, VariableSpecification,
};
use quoterate_engine::{ConfigTables, PolicyRater, RatingConfig, SpecificationTable, VariableTable};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::quote_book::QuoteBook;
use crate::QuoteRate;

pub const CUSTOMERS_FILE: &str = "customers.json";
pub const POLICY_VARIABLES_FILE: &str = "policy_variables.json";
pub const SPECIFICATIONS_FILE: &str = "variable_specifications.json";
pub const QUOTES_FILE: &str = "quotes.json";
pub const QUOTE_VARIABLES_FILE: &str = "quote_variables.json";

/// Quote row as stored, referencing its customer by id
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRecord {
    pub id: u64,
    pub customer: u64,
    #[serde(default)]
    pub description: Option<String>,
    pub state: String,
    #[serde(default)]
    pub coverage_type: CoverageTier,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Every record of a fixture directory
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    pub customers: Vec<Customer>,
    pub policy_variables: Vec<PolicyVariable>,
    pub specifications: Vec<VariableSpecification>,
    pub quotes: Vec<QuoteRecord>,
    pub quote_variables: Vec<QuoteVariable>,
}

impl FixtureSet {
    /// Read all fixture files from `dir`
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let set = Self {
            customers: read_records(dir, CUSTOMERS_FILE).await?,
            policy_variables: read_records(dir, POLICY_VARIABLES_FILE).await?,
            specifications: read_records(dir, SPECIFICATIONS_FILE).await?,
            quotes: read_records(dir, QUOTES_FILE).await?,
            quote_variables: read_records(dir, QUOTE_VARIABLES_FILE).await?,
        };

        info!(
            dir = %dir.display(),
            customers = set.customers.len(),
            policy_variables = set.policy_variables.len(),
            specifications = set.specifications.len(),
            quotes = set.quotes.len(),
            quote_variables = set.quote_variables.len(),
            "Loaded fixtures"
        );
        Ok(set)
    }

    /// Build the rating configuration and quote book described by the fixtures.
    ///
    /// Quotes must reference known customers and quote variables known
    /// quotes. Quote variables naming an unknown specification are kept;
    /// rating such a quote fails with `UnknownSpecification`.
    pub fn install(self) -> Result<QuoteRate> {
        let tables = ConfigTables::new(
            VariableTable::from_variables(self.policy_variables),
            SpecificationTable::from_specs(self.specifications)?,
        );

        let customers: HashMap<u64, Customer> =
            self.customers.into_iter().map(|c| (c.id, c)).collect();

        let quotes = QuoteBook::new();
        for record in self.quotes {
            let customer = customers
                .get(&record.customer)
                .cloned()
                .ok_or(ValidationError::UnknownCustomer(record.customer))?;

            let mut quote = Quote::new(record.id, customer, record.state, record.coverage_type);
            quote.description = record.description;
            if let Some(created_at) = record.created_at {
                quote.created_at = created_at;
                quote.updated_at = created_at;
            }

            if quotes.insert(quote).is_some() {
                return Err(RatingError::Config(format!(
                    "duplicate quote id {} in {}",
                    record.id, QUOTES_FILE
                )));
            }
        }

        for variable in self.quote_variables {
            quotes.attach(variable.quote_id, variable)?;
        }

        debug!(quotes = quotes.len(), "Installed fixtures");
        Ok(QuoteRate::new(
            PolicyRater::new(Arc::new(RatingConfig::new(tables))),
            quotes,
        ))
    }
}

async fn read_records<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(name);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Fixture file absent");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(RatingError::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_str(&content).map_err(|e| {
        RatingError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

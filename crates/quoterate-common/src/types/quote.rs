//! Quotes and the variables attached to them
//!
//! A [`Quote`] owns its [`QuoteVariable`]s; dropping the quote drops them.
//! Each variable references a [`VariableSpecification`](super::specification::VariableSpecification)
//! by code, and a given code may be attached to a quote at most once.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::policy_variable::{BASIC_POLICY_BASE_KEY, PREMIUM_POLICY_BASE_KEY};

/// Coverage tier selecting the policy base cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageTier {
    Basic,
    Premium,
}

impl CoverageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageTier::Basic => "basic",
            CoverageTier::Premium => "premium",
        }
    }

    /// Global policy variable holding the base cost for this tier
    pub fn base_cost_key(&self) -> &'static str {
        match self {
            CoverageTier::Basic => BASIC_POLICY_BASE_KEY,
            CoverageTier::Premium => PREMIUM_POLICY_BASE_KEY,
        }
    }
}

impl Default for CoverageTier {
    fn default() -> Self {
        CoverageTier::Basic
    }
}

impl fmt::Display for CoverageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer a quote is prepared for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
}

impl Customer {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A specification applied to a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteVariable {
    /// Owning quote
    pub quote_id: u64,
    /// Referenced specification code
    pub spec_code: String,
    /// Directly supplied value, used only by simple resolution
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl QuoteVariable {
    pub fn new(spec_code: impl Into<String>) -> Self {
        Self {
            quote_id: 0,
            spec_code: spec_code.into(),
            value: None,
            notes: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Insurance quote awaiting a price
///
/// Deserialization replays [`Quote::attach`] for every variable, so a
/// decoded quote holds the same invariants as one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuote")]
pub struct Quote {
    pub id: u64,
    pub customer: Customer,
    #[serde(default)]
    pub description: Option<String>,
    /// Jurisdiction (state code) used for scoped lookups and tax
    pub jurisdiction: String,
    #[serde(default)]
    pub coverage_tier: CoverageTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Attached variables in insertion order
    variables: Vec<QuoteVariable>,
}

/// Wire form of a [`Quote`] before its variables are attached
#[derive(Deserialize)]
struct RawQuote {
    id: u64,
    customer: Customer,
    #[serde(default)]
    description: Option<String>,
    jurisdiction: String,
    #[serde(default)]
    coverage_tier: CoverageTier,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    variables: Vec<QuoteVariable>,
}

impl TryFrom<RawQuote> for Quote {
    type Error = ValidationError;

    fn try_from(raw: RawQuote) -> Result<Self, Self::Error> {
        let mut quote = Quote::new(raw.id, raw.customer, raw.jurisdiction, raw.coverage_tier);
        quote.description = raw.description;
        for variable in raw.variables {
            quote.attach(variable)?;
        }
        quote.created_at = raw.created_at;
        quote.updated_at = raw.updated_at;
        Ok(quote)
    }
}

impl Quote {
    pub fn new(
        id: u64,
        customer: Customer,
        jurisdiction: impl Into<String>,
        coverage_tier: CoverageTier,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer,
            description: None,
            jurisdiction: jurisdiction.into(),
            coverage_tier,
            created_at: now,
            updated_at: now,
            variables: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn customer_name(&self) -> &str {
        &self.customer.name
    }

    pub fn variables(&self) -> &[QuoteVariable] {
        &self.variables
    }

    /// Attach a variable, rejecting a second variable for the same specification.
    ///
    /// A `quote_id` of 0 means unassigned; any other value must be this quote's id.
    pub fn attach(&mut self, mut variable: QuoteVariable) -> Result<(), ValidationError> {
        if variable.quote_id != 0 && variable.quote_id != self.id {
            return Err(ValidationError::ForeignVariable {
                quote: self.id,
                owner: variable.quote_id,
                code: variable.spec_code,
            });
        }

        if self
            .variables
            .iter()
            .any(|v| v.spec_code == variable.spec_code)
        {
            return Err(ValidationError::DuplicateVariable {
                quote: self.id,
                code: variable.spec_code,
            });
        }

        variable.quote_id = self.id;
        self.variables.push(variable);
        self.touch();
        Ok(())
    }

    /// Remove the variable referencing `spec_code`
    pub fn detach(&mut self, spec_code: &str) -> Option<QuoteVariable> {
        let idx = self.variables.iter().position(|v| v.spec_code == spec_code)?;
        self.touch();
        Some(self.variables.remove(idx))
    }

    pub fn set_coverage_tier(&mut self, tier: CoverageTier) {
        self.coverage_tier = tier;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.description.as_deref().unwrap_or_default(),
            self.customer,
            self.coverage_tier
        )
    }
}

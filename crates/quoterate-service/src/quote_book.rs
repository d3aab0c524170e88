//! Quote book
//!
//! Concurrent in-memory quote repository. Quotes own their variables, so
//! removing a quote removes everything attached to it.

use dashmap::DashMap;
use quoterate_common::{Quote, QuoteVariable, Result, ValidationError};
use tracing::debug;

/// Quotes keyed by id
#[derive(Debug, Default)]
pub struct QuoteBook {
    quotes: DashMap<u64, Quote>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a quote, returning the previous one
    pub fn insert(&self, quote: Quote) -> Option<Quote> {
        self.quotes.insert(quote.id, quote)
    }

    pub fn get(&self, id: u64) -> Option<Quote> {
        self.quotes.get(&id).map(|entry| entry.clone())
    }

    /// Remove a quote together with its variables
    pub fn remove(&self, id: u64) -> Option<Quote> {
        let removed = self.quotes.remove(&id).map(|(_, quote)| quote);
        if let Some(quote) = &removed {
            debug!(quote_id = id, variables = quote.variables().len(), "Removed quote");
        }
        removed
    }

    /// Attach a variable to a stored quote
    pub fn attach(&self, quote_id: u64, variable: QuoteVariable) -> Result<()> {
        let mut quote = self
            .quotes
            .get_mut(&quote_id)
            .ok_or(ValidationError::UnknownQuote(quote_id))?;
        quote.attach(variable)?;
        Ok(())
    }

    /// Detach the variable referencing `spec_code` from a stored quote
    pub fn detach(&self, quote_id: u64, spec_code: &str) -> Result<Option<QuoteVariable>> {
        let mut quote = self
            .quotes
            .get_mut(&quote_id)
            .ok_or(ValidationError::UnknownQuote(quote_id))?;
        Ok(quote.detach(spec_code))
    }

    /// All quote ids in ascending order
    pub fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.quotes.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

//! # QuoteRate Service
//!
//! Host for the policy rating engine: configuration, logging, fixture
//! loading, the quote book, and the serialized quote view.

pub mod config;
pub mod fixtures;
pub mod quote_book;
pub mod telemetry;
pub mod view;

use quoterate_common::{RatingResult, Result, ValidationError};
use quoterate_engine::PolicyRater;
use tracing::instrument;

pub use config::ServiceConfig;
pub use fixtures::FixtureSet;
pub use quote_book::QuoteBook;
pub use view::QuoteView;

/// QuoteRate service
pub struct QuoteRate {
    rater: PolicyRater,
    quotes: QuoteBook,
}

impl QuoteRate {
    pub fn new(rater: PolicyRater, quotes: QuoteBook) -> Self {
        Self { rater, quotes }
    }

    pub fn rater(&self) -> &PolicyRater {
        &self.rater
    }

    pub fn quotes(&self) -> &QuoteBook {
        &self.quotes
    }

    /// Price a stored quote
    #[instrument(skip(self))]
    pub fn rate(&self, quote_id: u64) -> Result<RatingResult> {
        let quote = self
            .quotes
            .get(quote_id)
            .ok_or(ValidationError::UnknownQuote(quote_id))?;
        self.rater.calculate_quote_rate(&quote)
    }

    /// Serialized view of a stored quote
    pub fn view(&self, quote_id: u64) -> Result<QuoteView> {
        let quote = self
            .quotes
            .get(quote_id)
            .ok_or(ValidationError::UnknownQuote(quote_id))?;
        let cost = self.rater.calculate_quote_rate(&quote)?;
        Ok(QuoteView::new(&quote, cost))
    }

    /// Views of every stored quote in id order; failures are reported per quote
    pub fn views(&self) -> Vec<(u64, Result<QuoteView>)> {
        self.quotes
            .ids()
            .into_iter()
            .map(|id| (id, self.view(id)))
            .collect()
    }
}

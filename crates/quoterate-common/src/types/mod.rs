//! Core data types for QuoteRate

pub mod policy_variable;
pub mod quote;
pub mod rating;
pub mod specification;

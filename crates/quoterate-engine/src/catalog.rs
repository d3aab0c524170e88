//! Variable specification catalog
//!
//! Specifications are validated on registration and shared between quotes
//! through `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use quoterate_common::{RatingError, Result, VariableSpecification};

/// Read access to variable specifications by code
pub trait SpecificationCatalog: Send + Sync {
    /// Fails with [`RatingError::UnknownSpecification`] when `code` is absent
    fn resolve_spec(&self, code: &str) -> Result<Arc<VariableSpecification>>;
}

/// Validated specifications keyed by code
#[derive(Debug, Clone, Default)]
pub struct SpecificationTable {
    entries: HashMap<String, Arc<VariableSpecification>>,
}

impl SpecificationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, failing on the first invalid specification
    pub fn from_specs(specs: impl IntoIterator<Item = VariableSpecification>) -> Result<Self> {
        let mut table = Self::new();
        table.load(specs)?;
        Ok(table)
    }

    /// Register many specifications.
    ///
    /// The table is left untouched if any specification is invalid.
    pub fn load(&mut self, specs: impl IntoIterator<Item = VariableSpecification>) -> Result<usize> {
        let specs = specs
            .into_iter()
            .map(|spec| spec.validate().map(|_| spec))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let count = specs.len();
        for spec in specs {
            self.entries.insert(spec.code.clone(), Arc::new(spec));
        }
        Ok(count)
    }

    /// Insert or replace a specification
    pub fn register(
        &mut self,
        spec: VariableSpecification,
    ) -> Result<Option<Arc<VariableSpecification>>> {
        spec.validate()?;
        Ok(self.entries.insert(spec.code.clone(), Arc::new(spec)))
    }

    pub fn remove(&mut self, code: &str) -> Option<Arc<VariableSpecification>> {
        self.entries.remove(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SpecificationCatalog for SpecificationTable {
    fn resolve_spec(&self, code: &str) -> Result<Arc<VariableSpecification>> {
        self.entries
            .get(code)
            .cloned()
            .ok_or_else(|| RatingError::UnknownSpecification(code.to_string()))
    }
}

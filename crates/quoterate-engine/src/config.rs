//! Rating configuration
//!
//! The policy variables and the specification catalog are published
//! together as one [`ConfigTables`] value. A [`RatingSnapshot`] therefore
//! sees both tables at the same version, and an administrative write that
//! touches both becomes visible to calculations in a single step.

use std::sync::Arc;

use quoterate_common::{PolicyVariable, Result, StoreError, VariableSpecification};
use tracing::debug;

use crate::catalog::{SpecificationCatalog, SpecificationTable};
use crate::snapshot::{SnapshotCell, Versioned};
use crate::store::{PolicyVariableStore, VariableTable};

/// Policy variables and specifications at one version
#[derive(Debug, Clone, Default)]
pub struct ConfigTables {
    pub variables: VariableTable,
    pub specifications: SpecificationTable,
}

impl ConfigTables {
    pub fn new(variables: VariableTable, specifications: SpecificationTable) -> Self {
        Self {
            variables,
            specifications,
        }
    }
}

/// Administratively mutable rating configuration
#[derive(Debug, Default)]
pub struct RatingConfig {
    tables: SnapshotCell<ConfigTables>,
}

impl RatingConfig {
    pub fn new(tables: ConfigTables) -> Self {
        debug!(
            variables = tables.variables.len(),
            specifications = tables.specifications.len(),
            "Published rating configuration"
        );
        Self {
            tables: SnapshotCell::new(tables),
        }
    }

    /// Point-in-time view for one calculation
    pub fn snapshot(&self) -> RatingSnapshot {
        RatingSnapshot {
            tables: self.tables.load(),
        }
    }

    /// Edit both tables and publish them together.
    ///
    /// Nothing is published if `f` fails.
    pub fn update<R>(&self, f: impl FnOnce(&mut ConfigTables) -> Result<R>) -> Result<R> {
        self.tables.try_update(f)
    }

    /// Insert or replace a policy variable, returning the previous value
    pub fn upsert_variable(&self, variable: PolicyVariable) -> Option<f64> {
        self.tables.update(|tables| tables.variables.upsert(variable))
    }

    pub fn remove_variable(&self, scope: &str, key: &str) -> Option<f64> {
        self.tables.update(|tables| tables.variables.remove(scope, key))
    }

    /// Insert or replace a specification
    pub fn register_spec(
        &self,
        spec: VariableSpecification,
    ) -> Result<Option<Arc<VariableSpecification>>> {
        self.update(|tables| tables.specifications.register(spec))
    }

    pub fn remove_spec(&self, code: &str) -> Option<Arc<VariableSpecification>> {
        self.tables.update(|tables| tables.specifications.remove(code))
    }
}

/// Immutable view of the whole configuration at one version
#[derive(Debug, Clone)]
pub struct RatingSnapshot {
    tables: Arc<Versioned<ConfigTables>>,
}

impl RatingSnapshot {
    pub fn version(&self) -> u64 {
        self.tables.version
    }

    pub fn variables(&self) -> &VariableTable {
        &self.tables.value.variables
    }

    pub fn specifications(&self) -> &SpecificationTable {
        &self.tables.value.specifications
    }
}

impl PolicyVariableStore for RatingSnapshot {
    fn lookup(&self, scope: &str, key: &str) -> std::result::Result<f64, StoreError> {
        self.variables().lookup(scope, key)
    }
}

impl SpecificationCatalog for RatingSnapshot {
    fn resolve_spec(&self, code: &str) -> Result<Arc<VariableSpecification>> {
        self.specifications().resolve_spec(code)
    }
}

//! Policy variable table

use std::collections::HashMap;

use quoterate_common::{PolicyVariable, StoreError};

use super::PolicyVariableStore;

/// Policy variables keyed by `(scope, key)`
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    entries: HashMap<(String, String), f64>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a set of variables; later rows win on duplicate keys
    pub fn from_variables(variables: impl IntoIterator<Item = PolicyVariable>) -> Self {
        let mut table = Self::new();
        table.load(variables);
        table
    }

    /// Insert or replace many variables
    pub fn load(&mut self, variables: impl IntoIterator<Item = PolicyVariable>) -> usize {
        let mut count = 0;
        for var in variables {
            self.upsert(var);
            count += 1;
        }
        count
    }

    /// Insert or replace a variable, returning the previous value
    pub fn upsert(&mut self, variable: PolicyVariable) -> Option<f64> {
        self.entries
            .insert((variable.scope, variable.key), variable.value)
    }

    /// Remove a variable, returning its value
    pub fn remove(&mut self, scope: &str, key: &str) -> Option<f64> {
        self.entries.remove(&(scope.to_string(), key.to_string()))
    }

    /// All variables, in no particular order
    pub fn variables(&self) -> impl Iterator<Item = PolicyVariable> + '_ {
        self.entries
            .iter()
            .map(|((scope, key), value)| PolicyVariable::new(scope.clone(), key.clone(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PolicyVariableStore for VariableTable {
    fn lookup(&self, scope: &str, key: &str) -> Result<f64, StoreError> {
        // HashMap<(String, String), _> has no borrowed-tuple lookup
        self.entries
            .get(&(scope.to_string(), key.to_string()))
            .copied()
            .ok_or_else(|| StoreError::NotFound {
                scope: scope.to_string(),
                key: key.to_string(),
            })
    }
}

//! Policy rating engine
//!
//! Prices a quote in one pass:
//! 1. Base cost for the coverage tier from the global scope
//! 2. Fold over the quote variables in ascending specification priority
//! 3. Jurisdiction tax on the unrounded accumulator
//! 4. Rounding and truncation into a [`RatingResult`]
//!
//! The fold runs against snapshots, so a calculation never mixes
//! configuration from before and after a concurrent administrative write.

use std::sync::Arc;

use quoterate_common::{
    normalized_percent, ApplicationMode, Quote, QuoteVariable, RatingResult, ResolutionType,
    Result, ValidationError, VariableSpecification, GLOBAL_SCOPE, STATE_TAX_RATE_KEY,
};
use tracing::{debug, instrument, warn};

use crate::catalog::SpecificationCatalog;
use crate::config::{RatingConfig, RatingSnapshot};
use crate::store::PolicyVariableStore;

/// Rates quotes against shared, administratively mutable configuration
#[derive(Debug, Clone)]
pub struct PolicyRater {
    config: Arc<RatingConfig>,
}

impl PolicyRater {
    pub fn new(config: Arc<RatingConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<RatingConfig> {
        &self.config
    }

    /// Capture the current configuration
    pub fn snapshot(&self) -> RatingSnapshot {
        self.config.snapshot()
    }

    /// Price a quote against a fresh snapshot of the configuration
    pub fn calculate_quote_rate(&self, quote: &Quote) -> Result<RatingResult> {
        let snapshot = self.snapshot();
        calculate_quote_rate(quote, &snapshot, &snapshot)
    }
}

/// Price a quote against the given specification catalog and variable store
#[instrument(
    skip_all,
    fields(quote_id = quote.id, jurisdiction = %quote.jurisdiction, tier = %quote.coverage_tier)
)]
pub fn calculate_quote_rate<C, S>(quote: &Quote, catalog: &C, store: &S) -> Result<RatingResult>
where
    C: SpecificationCatalog + ?Sized,
    S: PolicyVariableStore + ?Sized,
{
    let base = store.lookup(GLOBAL_SCOPE, quote.coverage_tier.base_cost_key())?;

    let ordered = ordered_variables(quote, catalog)?;

    let mut acc = base;
    for (variable, spec) in &ordered {
        let Some(value) = resolve_value(quote, variable, spec, store)? else {
            continue;
        };
        acc = apply_value(acc, value, spec);
    }

    let tax_rate = store.lookup(&quote.jurisdiction, STATE_TAX_RATE_KEY)?;

    let result = RatingResult::settle(acc, tax_rate);
    debug!(
        base,
        accumulator = acc,
        tax_rate,
        subtotal = result.subtotal,
        taxes = result.taxes,
        total = result.total,
        "Rated quote"
    );
    Ok(result)
}

/// Pair each variable with its specification, sorted by ascending priority.
///
/// The sort is stable: variables with equal priority keep their attachment
/// order.
fn ordered_variables<'q, C>(
    quote: &'q Quote,
    catalog: &C,
) -> Result<Vec<(&'q QuoteVariable, Arc<VariableSpecification>)>>
where
    C: SpecificationCatalog + ?Sized,
{
    let mut ordered = quote
        .variables()
        .iter()
        .map(|var| catalog.resolve_spec(&var.spec_code).map(|spec| (var, spec)))
        .collect::<Result<Vec<_>>>()?;

    ordered.sort_by_key(|(_, spec)| spec.priority);
    Ok(ordered)
}

/// Resolve a variable's value; `None` means the variable contributes nothing
fn resolve_value<S>(
    quote: &Quote,
    variable: &QuoteVariable,
    spec: &VariableSpecification,
    store: &S,
) -> Result<Option<f64>>
where
    S: PolicyVariableStore + ?Sized,
{
    let scope = match &spec.resolution_type {
        ResolutionType::Simple => {
            if variable.value.is_none() {
                debug!(spec = %spec.code, "Simple variable has no value, skipping");
            }
            return Ok(variable.value);
        }
        ResolutionType::StateLookup => quote.jurisdiction.as_str(),
        ResolutionType::GlobalLookup => GLOBAL_SCOPE,
        ResolutionType::Unsupported(code) => {
            warn!(spec = %spec.code, resolution = %code, "Unsupported resolution type, skipping");
            return Ok(None);
        }
    };

    let key = spec
        .lookup_key
        .as_deref()
        .ok_or_else(|| ValidationError::MissingLookupKey {
            code: spec.code.clone(),
        })?;

    Ok(Some(store.lookup(scope, key)?))
}

/// Combine a resolved value with the running accumulator
fn apply_value(acc: f64, value: f64, spec: &VariableSpecification) -> f64 {
    let next = match &spec.application_mode {
        // replaces the running price rather than adding to it
        ApplicationMode::Additive => value,
        ApplicationMode::Multiplier => acc * normalized_percent(value),
        ApplicationMode::Unsupported(code) => {
            warn!(spec = %spec.code, mode = %code, "Unsupported application mode, skipping");
            acc
        }
    };
    debug!(spec = %spec.code, priority = spec.priority, value, before = acc, after = next, "Applied variable");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quoterate_common::{
        CoverageTier, Customer, PolicyVariable, RatingError, BASIC_POLICY_BASE_KEY,
        PREMIUM_POLICY_BASE_KEY,
    };

    use crate::catalog::SpecificationTable;
    use crate::config::ConfigTables;
    use crate::store::VariableTable;

    fn store() -> VariableTable {
        VariableTable::from_variables([
            PolicyVariable::global(BASIC_POLICY_BASE_KEY, 15.0),
            PolicyVariable::global(PREMIUM_POLICY_BASE_KEY, 30.0),
            PolicyVariable::global("pet_premium", 40.0),
            PolicyVariable::new("NY", STATE_TAX_RATE_KEY, 8.0),
            PolicyVariable::new("NY", "flood_multiplier_percent", 150.0),
        ])
    }

    fn catalog() -> SpecificationTable {
        SpecificationTable::from_specs([
            VariableSpecification::simple("flat_override", ApplicationMode::Additive)
                .with_priority(5),
            VariableSpecification::simple("percent_adjust", ApplicationMode::Multiplier)
                .with_priority(20),
            VariableSpecification::global_lookup(
                "pet_ownership_indicator",
                ApplicationMode::Additive,
                "pet_premium",
            )
            .with_priority(1),
            VariableSpecification::state_lookup(
                "flood_addition_indicator",
                ApplicationMode::Multiplier,
                "flood_multiplier_percent",
            )
            .with_priority(10),
            VariableSpecification::global_lookup(
                "missing_lookup",
                ApplicationMode::Additive,
                "not_configured",
            ),
            VariableSpecification::simple(
                "legacy_indicator",
                ApplicationMode::Unsupported("base_flat".to_string()),
            ),
            VariableSpecification {
                resolution_type: ResolutionType::Unsupported("indicator".to_string()),
                ..VariableSpecification::simple("future_indicator", ApplicationMode::Additive)
            },
        ])
        .unwrap()
    }

    fn quote(tier: CoverageTier) -> Quote {
        Quote::new(1, Customer::new(1, "Leroy Jenkins"), "NY", tier)
    }

    fn rate(quote: &Quote) -> Result<RatingResult> {
        calculate_quote_rate(quote, &catalog(), &store())
    }

    #[test]
    fn test_no_variables() {
        let result = rate(&quote(CoverageTier::Basic)).unwrap();
        assert_eq!(result.subtotal, 15.0);
        assert_eq!(result.taxes, 1.2);
        assert_eq!(result.total, 16.2);
    }

    #[test]
    fn test_simple_additive_replaces_accumulator() {
        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("flat_override").with_value(25.0))
            .unwrap();

        let result = rate(&q).unwrap();
        assert_eq!(result.subtotal, 25.0);
        assert_eq!(result.taxes, 2.0);
        assert_eq!(result.total, 27.0);
    }

    #[test]
    fn test_simple_multiplier_scales_accumulator() {
        let mut q = quote(CoverageTier::Premium);
        q.attach(QuoteVariable::new("percent_adjust").with_value(20.0))
            .unwrap();

        let result = rate(&q).unwrap();
        assert_eq!(result.subtotal, 6.0);
        assert_eq!(result.taxes, 0.48);
        assert_eq!(result.total, 6.48);
    }

    #[test]
    fn test_simple_without_value_is_noop() {
        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("flat_override")).unwrap();

        assert_eq!(rate(&q).unwrap(), rate(&quote(CoverageTier::Basic)).unwrap());
    }

    #[test]
    fn test_lookups_use_scope() {
        // pet premium replaces the base (global), flood scales by 150% (NY)
        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("flood_addition_indicator")).unwrap();
        q.attach(QuoteVariable::new("pet_ownership_indicator").with_value(999.0))
            .unwrap();

        let result = rate(&q).unwrap();
        assert_eq!(result.subtotal, 60.0);
        assert_eq!(result.taxes, 4.8);
        assert_eq!(result.total, 64.8);
    }

    #[test]
    fn test_priority_order_not_attachment_order() {
        // percent (20) after flat (5): 25 * 20% = 5
        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("percent_adjust").with_value(20.0))
            .unwrap();
        q.attach(QuoteVariable::new("flat_override").with_value(25.0))
            .unwrap();

        assert_eq!(rate(&q).unwrap().subtotal, 5.0);
    }

    #[test]
    fn test_equal_priority_keeps_attachment_order() {
        let catalog = SpecificationTable::from_specs([
            VariableSpecification::simple("first", ApplicationMode::Additive),
            VariableSpecification::simple("second", ApplicationMode::Additive),
        ])
        .unwrap();

        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("second").with_value(11.0)).unwrap();
        q.attach(QuoteVariable::new("first").with_value(22.0)).unwrap();

        let result = calculate_quote_rate(&q, &catalog, &store()).unwrap();
        assert_eq!(result.subtotal, 22.0);
    }

    #[test]
    fn test_unsupported_types_are_skipped() {
        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("legacy_indicator").with_value(50.0))
            .unwrap();
        q.attach(QuoteVariable::new("future_indicator").with_value(50.0))
            .unwrap();

        assert_eq!(rate(&q).unwrap().subtotal, 15.0);
    }

    #[test]
    fn test_missing_tax_rate() {
        let q = Quote::new(2, Customer::new(1, "Leroy Jenkins"), "CA", CoverageTier::Basic);
        let err = rate(&q).unwrap_err();
        assert!(matches!(
            err,
            RatingError::MissingConfiguration { ref scope, ref key }
                if scope == "CA" && key == STATE_TAX_RATE_KEY
        ));
    }

    #[test]
    fn test_missing_base_cost() {
        let store = VariableTable::from_variables([PolicyVariable::new(
            "NY",
            STATE_TAX_RATE_KEY,
            8.0,
        )]);
        let err = calculate_quote_rate(&quote(CoverageTier::Premium), &catalog(), &store)
            .unwrap_err();
        assert!(err.is_missing_configuration());
    }

    #[test]
    fn test_missing_lookup_value_is_fatal() {
        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("missing_lookup")).unwrap();
        assert!(rate(&q).unwrap_err().is_missing_configuration());
    }

    #[test]
    fn test_unknown_specification() {
        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("nonexistent")).unwrap();
        assert!(matches!(
            rate(&q).unwrap_err(),
            RatingError::UnknownSpecification(code) if code == "nonexistent"
        ));
    }

    #[test]
    fn test_default_value_is_not_consulted() {
        let catalog = SpecificationTable::from_specs([VariableSpecification::simple(
            "with_default",
            ApplicationMode::Additive,
        )
        .with_default_value(99.0)])
        .unwrap();

        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("with_default")).unwrap();

        let result = calculate_quote_rate(&q, &catalog, &store()).unwrap();
        assert_eq!(result.subtotal, 15.0);
    }

    fn rater() -> PolicyRater {
        PolicyRater::new(Arc::new(RatingConfig::new(ConfigTables::new(
            store(),
            catalog(),
        ))))
    }

    #[test]
    fn test_rater_uses_snapshot() {
        let rater = rater();
        let q = quote(CoverageTier::Basic);

        let snapshot = rater.snapshot();
        rater
            .config()
            .upsert_variable(PolicyVariable::global(BASIC_POLICY_BASE_KEY, 100.0));

        let old = calculate_quote_rate(&q, &snapshot, &snapshot).unwrap();
        assert_eq!(old.subtotal, 15.0);
        assert_eq!(rater.calculate_quote_rate(&q).unwrap().subtotal, 100.0);
    }

    #[test]
    fn test_concurrent_key_migration_never_mixes_tables() {
        // a writer repoints `moving` between two keys in one combined write
        // and drops the old key; readers must always see a matching pair
        let rater = rater();
        rater
            .config()
            .update(|tables| {
                tables.variables.upsert(PolicyVariable::global("k1", 40.0));
                tables.specifications.register(VariableSpecification::global_lookup(
                    "moving",
                    ApplicationMode::Additive,
                    "k1",
                ))?;
                Ok(())
            })
            .unwrap();

        let mut q = quote(CoverageTier::Basic);
        q.attach(QuoteVariable::new("moving")).unwrap();

        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                for round in 0..2_000 {
                    let (old_key, new_key) = if round % 2 == 0 { ("k1", "k2") } else { ("k2", "k1") };
                    rater
                        .config()
                        .update(|tables| {
                            tables.variables.upsert(PolicyVariable::global(new_key, 40.0));
                            tables.specifications.register(VariableSpecification::global_lookup(
                                "moving",
                                ApplicationMode::Additive,
                                new_key,
                            ))?;
                            tables.variables.remove(GLOBAL_SCOPE, old_key);
                            Ok(())
                        })
                        .unwrap();
                }
            });

            let readers: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        for _ in 0..2_000 {
                            let result = rater.calculate_quote_rate(&q).unwrap();
                            assert_eq!(result.subtotal, 40.0);
                        }
                    })
                })
                .collect();

            writer.join().unwrap();
            for reader in readers {
                reader.join().unwrap();
            }
        });

        assert_eq!(rater.snapshot().version(), 2_001);
    }

    proptest! {
        #[test]
        fn zero_variable_subtotal_is_base(cents in 0u32..10_000_000, tax in 0.0f64..20.0) {
            let base = f64::from(cents) / 100.0;
            let store = VariableTable::from_variables([
                PolicyVariable::global(BASIC_POLICY_BASE_KEY, base),
                PolicyVariable::new("NY", STATE_TAX_RATE_KEY, tax),
            ]);
            let result = calculate_quote_rate(&quote(CoverageTier::Basic), &catalog(), &store).unwrap();
            prop_assert_eq!(result.subtotal, base);
        }

        #[test]
        fn rating_is_deterministic(flat in 0.0f64..1000.0, percent in 0.0f64..300.0) {
            let mut q = quote(CoverageTier::Premium);
            q.attach(QuoteVariable::new("percent_adjust").with_value(percent)).unwrap();
            q.attach(QuoteVariable::new("flat_override").with_value(flat)).unwrap();
            q.attach(QuoteVariable::new("flood_addition_indicator")).unwrap();

            let rater = rater();
            let first = rater.calculate_quote_rate(&q).unwrap();
            let second = rater.calculate_quote_rate(&q).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}

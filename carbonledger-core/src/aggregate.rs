use carbonledger_schemas::emission::Emission;
use carbonledger_schemas::factor::{EmissionFactor, FactorKey};
use carbonledger_schemas::input::ScopeInputs;
use carbonledger_schemas::scope::ScopeType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Running emission totals, one bucket per scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeTotals {
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
}

impl ScopeTotals {
    pub fn get(&self, scope: ScopeType) -> f64 {
        match scope {
            ScopeType::Scope1 => self.scope1,
            ScopeType::Scope2 => self.scope2,
            ScopeType::Scope3 => self.scope3,
        }
    }

    pub fn add(&mut self, scope: ScopeType, amount: f64) {
        match scope {
            ScopeType::Scope1 => self.scope1 += amount,
            ScopeType::Scope2 => self.scope2 += amount,
            ScopeType::Scope3 => self.scope3 += amount,
        }
    }

    pub fn total(&self) -> f64 {
        self.scope1 + self.scope2 + self.scope3
    }
}

/// Computes per-row emissions and per-scope totals from the user's
/// activity entries and a factor table.
///
/// Scopes are processed in fixed order (1, 2, 3) and input order is
/// preserved within each scope. Entries with an empty activity, empty
/// unit, or zero quantity are skipped; a deliberately entered zero is
/// indistinguishable from an unfilled row. An activity key absent from
/// the table resolves to factor 0, not an error.
pub fn calculate(
    inputs: &ScopeInputs,
    factors: &HashMap<String, EmissionFactor>,
) -> (ScopeTotals, Vec<Emission>) {
    let mut results = ScopeTotals::default();
    let mut emissions = Vec::new();

    for scope in ScopeType::ALL {
        for input in inputs.for_scope(scope) {
            if input.activity.is_empty()
                || input.unit.is_empty()
                || input.qty == 0.0
                || input.qty.is_nan()
            {
                continue;
            }

            let factor = resolve_factor(factors, scope, &input.activity)
                .map(|f| f.factor)
                .unwrap_or(0.0);
            let emission = factor * input.qty;

            results.add(scope, emission);
            emissions.push(Emission {
                scope,
                activity: input.activity.clone(),
                unit: input.unit.clone(),
                quantity: input.qty,
                factor,
                emission,
                year: input.year,
                product: input.product.clone(),
                waste_type: input.waste_type.clone(),
                disposal_method: input.disposal_method.clone(),
            });
        }
    }

    (results, emissions)
}

/// Resolves an activity reference against the factor table.
///
/// A scope-prefixed reference is looked up directly. A bare reference is
/// first tried with the scope of the entry prepended and then as-is, so
/// legacy scope-less factor keys match entries from any scope.
pub fn resolve_factor<'a>(
    factors: &'a HashMap<String, EmissionFactor>,
    scope: ScopeType,
    activity: &str,
) -> Option<&'a EmissionFactor> {
    match FactorKey::parse(activity) {
        FactorKey::Scoped(..) => factors.get(activity),
        FactorKey::Unscoped(name) => {
            let scoped = FactorKey::Scoped(scope, name).to_string();
            factors.get(&scoped).or_else(|| factors.get(activity))
        }
    }
}

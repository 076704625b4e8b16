use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Externally supplied production volume for one product in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub name: String,
    pub production: f64,
    pub year: i32,
    pub unit: String,
}

/// Per-year emission totals, one bucket per scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyEmissions {
    pub year: i32,
    pub scope1: f64,
    pub scope2: f64,
    pub scope3: f64,
    pub total: f64,
}

impl YearlyEmissions {
    pub fn empty(year: i32) -> Self {
        YearlyEmissions { year, scope1: 0.0, scope2: 0.0, scope3: 0.0, total: 0.0 }
    }
}

/// Emissions per unit of production for one product-year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIntensity {
    pub product: String,
    pub year: i32,
    pub emissions: f64,
    pub production: f64,
    pub intensity: f64,
    pub unit: String,
}

/// Aggregate view of waste emissions for one waste type, bucketed by
/// disposal method. Quantities are summed as-is; units are assumed
/// consistent within a waste type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteDisposalSummary {
    pub waste_type: String,
    pub total_emission: f64,
    pub by_method: BTreeMap<String, f64>,
    pub total_quantity: f64,
    pub unit: String,
}

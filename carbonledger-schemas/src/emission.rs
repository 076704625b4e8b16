use crate::scope::ScopeType;
use serde::{Deserialize, Serialize};

/// One computed result row: the input quantity joined with its resolved
/// factor. `emission` is always `factor * quantity`; never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emission {
    pub scope: ScopeType,
    pub activity: String,
    pub unit: String,
    pub quantity: f64,
    pub factor: f64,
    pub emission: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_method: Option<String>,
}

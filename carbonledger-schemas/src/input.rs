use crate::scope::ScopeType;
use serde::{Deserialize, Serialize};

/// One user-entered activity line: a reference to a factor-table key plus
/// the quantity consumed. Lives only for the duration of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionInput {
    pub activity: String,
    pub unit: String,
    pub qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_method: Option<String>,
}

/// Activity entries grouped per scope, as submitted by the calculator UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeInputs {
    #[serde(default)]
    pub scope1: Vec<EmissionInput>,
    #[serde(default)]
    pub scope2: Vec<EmissionInput>,
    #[serde(default)]
    pub scope3: Vec<EmissionInput>,
}

impl ScopeInputs {
    pub fn for_scope(&self, scope: ScopeType) -> &[EmissionInput] {
        match scope {
            ScopeType::Scope1 => &self.scope1,
            ScopeType::Scope2 => &self.scope2,
            ScopeType::Scope3 => &self.scope3,
        }
    }
}

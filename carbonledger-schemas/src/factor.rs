use crate::scope::ScopeType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named emission coefficient extracted from an uploaded workbook.
///
/// `factor` converts one `unit` of activity into kilograms of CO2
/// equivalent. Waste-specific factors additionally carry the waste type
/// and disposal method they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionFactor {
    pub name: String,
    pub factor: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposal_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A parsed factor-table key.
///
/// Keys synthesized from a workbook are either scope-prefixed
/// (`scope2_grid_electricity`) or scope-less (`grid_electricity`, kept for
/// backward compatibility with older factor files). Lookup tries the
/// scoped form first and falls back to the unscoped one, so a scope-less
/// key matches activity entries from any scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactorKey {
    Scoped(ScopeType, String),
    Unscoped(String),
}

impl FactorKey {
    pub fn parse(key: &str) -> FactorKey {
        for scope in ScopeType::ALL {
            if let Some(rest) = key.strip_prefix(scope.key_prefix()) {
                return FactorKey::Scoped(scope, rest.to_string());
            }
        }
        FactorKey::Unscoped(key.to_string())
    }

    /// The bare activity name without any scope prefix.
    pub fn name(&self) -> &str {
        match self {
            FactorKey::Scoped(_, name) => name,
            FactorKey::Unscoped(name) => name,
        }
    }

    pub fn scope(&self) -> Option<ScopeType> {
        match self {
            FactorKey::Scoped(scope, _) => Some(*scope),
            FactorKey::Unscoped(_) => None,
        }
    }
}

impl fmt::Display for FactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorKey::Scoped(scope, name) => write!(f, "{}{}", scope.key_prefix(), name),
            FactorKey::Unscoped(name) => write!(f, "{}", name),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three GHG Protocol accounting scopes: direct emissions,
/// purchased-energy emissions, and value-chain emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    #[serde(rename = "scope1")]
    Scope1,
    #[serde(rename = "scope2")]
    Scope2,
    #[serde(rename = "scope3")]
    Scope3,
}

impl ScopeType {
    /// Fixed processing order: scope 1, then 2, then 3.
    pub const ALL: [ScopeType; 3] = [ScopeType::Scope1, ScopeType::Scope2, ScopeType::Scope3];

    /// The prefix used when synthesizing factor keys, e.g. `scope1_`.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            ScopeType::Scope1 => "scope1_",
            ScopeType::Scope2 => "scope2_",
            ScopeType::Scope3 => "scope3_",
        }
    }

    /// Human-readable label, e.g. `Scope 1`.
    pub fn label(&self) -> &'static str {
        match self {
            ScopeType::Scope1 => "Scope 1",
            ScopeType::Scope2 => "Scope 2",
            ScopeType::Scope3 => "Scope 3",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            ScopeType::Scope1 => 1,
            ScopeType::Scope2 => 2,
            ScopeType::Scope3 => 3,
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope{}", self.number())
    }
}

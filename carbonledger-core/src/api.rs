//! Pure request handlers behind the calculator's JSON interface.
//!
//! Request fields are optional so that a body omitting one is answered
//! with a malformed-request error instead of a deserialization failure.

use crate::aggregate::{self, ScopeTotals};
use crate::error::LedgerError;
use crate::export;
use crate::report;
use carbonledger_schemas::emission::Emission;
use carbonledger_schemas::factor::EmissionFactor;
use carbonledger_schemas::input::ScopeInputs;
use carbonledger_schemas::report::{ProductData, ProductIntensity, YearlyEmissions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    #[serde(default)]
    pub inputs: Option<ScopeInputs>,
    #[serde(default)]
    pub emission_factors: Option<HashMap<String, EmissionFactor>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub results: ScopeTotals,
    pub emissions: Vec<Emission>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyComparisonRequest {
    #[serde(default)]
    pub emissions: Option<Vec<Emission>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyComparisonResponse {
    pub yearly_emissions: Vec<YearlyEmissions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIntensityRequest {
    #[serde(default)]
    pub emissions: Option<Vec<Emission>>,
    #[serde(default)]
    pub production_data: Option<Vec<ProductData>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIntensityResponse {
    pub product_intensities: Vec<ProductIntensity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExportRequest {
    #[serde(default)]
    pub emissions: Option<Vec<Emission>>,
}

pub fn calculate(request: CalculateRequest) -> Result<CalculateResponse, LedgerError> {
    let inputs = request
        .inputs
        .ok_or(LedgerError::MalformedRequest("inputs"))?;
    let factors = request
        .emission_factors
        .ok_or(LedgerError::MalformedRequest("emissionFactors"))?;

    let (results, emissions) = aggregate::calculate(&inputs, &factors);
    Ok(CalculateResponse { results, emissions })
}

pub fn yearly_comparison(
    request: YearlyComparisonRequest,
) -> Result<YearlyComparisonResponse, LedgerError> {
    let emissions = request
        .emissions
        .ok_or(LedgerError::MalformedRequest("emissions"))?;

    Ok(YearlyComparisonResponse {
        yearly_emissions: report::yearly_comparison(&emissions),
    })
}

pub fn product_intensity(
    request: ProductIntensityRequest,
) -> Result<ProductIntensityResponse, LedgerError> {
    let emissions = request
        .emissions
        .ok_or(LedgerError::MalformedRequest("emissions"))?;
    let production_data = request
        .production_data
        .ok_or(LedgerError::MalformedRequest("productionData"))?;

    Ok(ProductIntensityResponse {
        product_intensities: report::product_intensity(&emissions, &production_data),
    })
}

pub fn export_csv(request: CsvExportRequest) -> Result<String, LedgerError> {
    let emissions = request
        .emissions
        .ok_or(LedgerError::MalformedRequest("emissions"))?;

    Ok(export::generate_csv(&emissions))
}

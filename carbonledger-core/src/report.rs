use carbonledger_schemas::emission::Emission;
use carbonledger_schemas::report::{ProductData, ProductIntensity, WasteDisposalSummary, YearlyEmissions};
use carbonledger_schemas::scope::ScopeType;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Groups emissions by year into per-scope buckets. Rows without a year
/// are excluded; results are sorted ascending by year and each record's
/// total is the sum of its three scope buckets.
pub fn yearly_comparison(emissions: &[Emission]) -> Vec<YearlyEmissions> {
    let mut by_year: BTreeMap<i32, YearlyEmissions> = BTreeMap::new();

    for emission in emissions {
        let Some(year) = emission.year else {
            continue;
        };
        let entry = by_year
            .entry(year)
            .or_insert_with(|| YearlyEmissions::empty(year));
        match emission.scope {
            ScopeType::Scope1 => entry.scope1 += emission.emission,
            ScopeType::Scope2 => entry.scope2 += emission.emission,
            ScopeType::Scope3 => entry.scope3 += emission.emission,
        }
        entry.total += emission.emission;
    }

    by_year.into_values().collect()
}

/// Emissions per unit of production, one record per supplied production
/// entry. Production entries with no matching emissions are skipped;
/// non-positive production yields intensity 0.
pub fn product_intensity(
    emissions: &[Emission],
    production_data: &[ProductData],
) -> Vec<ProductIntensity> {
    let mut per_product_year: HashMap<(&str, i32), f64> = HashMap::new();

    for emission in emissions {
        let (Some(product), Some(year)) = (emission.product.as_deref(), emission.year) else {
            continue;
        };
        *per_product_year.entry((product, year)).or_insert(0.0) += emission.emission;
    }

    production_data
        .iter()
        .filter_map(|record| {
            let total = *per_product_year.get(&(record.name.as_str(), record.year))?;
            let intensity = if record.production > 0.0 {
                total / record.production
            } else {
                0.0
            };
            Some(ProductIntensity {
                product: record.name.clone(),
                year: record.year,
                emissions: total,
                production: record.production,
                intensity,
                unit: record.unit.clone(),
            })
        })
        .collect()
}

/// Summarizes waste emissions per waste type, bucketed by disposal
/// method, sorted descending by total emission.
///
/// Only rows carrying both a waste type and a disposal method count.
/// Quantities are summed as-is, with the unit taken from the first row
/// seen for the waste type; no unit conversion is attempted.
pub fn waste_summary(emissions: &[Emission]) -> Vec<WasteDisposalSummary> {
    let mut summaries: Vec<WasteDisposalSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for emission in emissions {
        let (Some(waste_type), Some(disposal_method)) =
            (emission.waste_type.as_ref(), emission.disposal_method.as_ref())
        else {
            continue;
        };

        let position = *index.entry(waste_type.clone()).or_insert_with(|| {
            summaries.push(WasteDisposalSummary {
                waste_type: waste_type.clone(),
                total_emission: 0.0,
                by_method: BTreeMap::new(),
                total_quantity: 0.0,
                unit: emission.unit.clone(),
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[position];
        *summary.by_method.entry(disposal_method.clone()).or_insert(0.0) += emission.emission;
        summary.total_emission += emission.emission;
        summary.total_quantity += emission.quantity;
    }

    summaries.sort_by(|a, b| {
        b.total_emission
            .partial_cmp(&a.total_emission)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

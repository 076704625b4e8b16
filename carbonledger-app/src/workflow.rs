use crate::config;
use crate::workbook;
use anyhow::{Context, Result};
use carbonledger_core::{aggregate, export, normalize, report};
use carbonledger_schemas::factor::{EmissionFactor, FactorKey};
use carbonledger_schemas::scope::ScopeType;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Runs the full calculation: load and normalize the workbook, aggregate
/// the activity entries, print the reports, and write the run artifacts
/// into a timestamped output directory.
pub fn run(
    factors_path: &Path,
    inputs_path: &Path,
    production_path: Option<&Path>,
    out_root: &Path,
) -> Result<()> {
    println!("Loading workbook from {:?}...", factors_path);
    let sheets = workbook::load_workbook(factors_path)?;
    let factors = normalize::normalize_workbook(&sheets)?;
    print_factor_counts(&factors);

    let activity = config::load_activity_file(inputs_path)?;
    let inputs = activity.into_inputs();

    let (results, emissions) = aggregate::calculate(&inputs, &factors);

    println!("\n--- Scope Totals (kg CO2e) ---");
    for scope in ScopeType::ALL {
        println!("{}: {:.2}", scope.label(), results.get(scope));
    }
    println!("Total:   {:.2}", results.total());

    let yearly = report::yearly_comparison(&emissions);
    if !yearly.is_empty() {
        println!("\n--- Yearly Comparison (kg CO2e) ---");
        for record in &yearly {
            println!(
                "{}: scope1 {:.2} | scope2 {:.2} | scope3 {:.2} | total {:.2}",
                record.year, record.scope1, record.scope2, record.scope3, record.total
            );
        }
    }

    if let Some(path) = production_path {
        let production = config::load_production_file(path)?;
        let intensities = report::product_intensity(&emissions, &production.products);
        if intensities.is_empty() {
            println!("\nNo production records matched the computed emissions.");
        } else {
            println!("\n--- Product Intensity ---");
            for record in &intensities {
                println!(
                    "{} ({}): {:.4} kg CO2e per {} ({:.2} over {} {})",
                    record.product,
                    record.year,
                    record.intensity,
                    record.unit,
                    record.emissions,
                    record.production,
                    record.unit
                );
            }
        }
    }

    let waste = report::waste_summary(&emissions);
    if !waste.is_empty() {
        println!("\n--- Waste Disposal Summary ---");
        for summary in &waste {
            println!(
                "{}: {:.2} kg CO2e from {} {}",
                summary.waste_type, summary.total_emission, summary.total_quantity, summary.unit
            );
            for (method, emission) in &summary.by_method {
                println!("  {}: {:.2}", method, emission);
            }
        }
    }

    let out_dir = out_root.join(format!("ghg_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    let csv_path = out_dir.join("emissions_report.csv");
    fs::write(&csv_path, export::generate_csv(&emissions))
        .with_context(|| format!("Failed to write {:?}", csv_path))?;

    let results_json = serde_json::json!({ "results": results, "emissions": emissions });
    let json_path = out_dir.join("results.json");
    fs::write(&json_path, serde_json::to_string_pretty(&results_json)?)
        .with_context(|| format!("Failed to write {:?}", json_path))?;

    println!("\nRun complete. Results are in {:?}", out_dir);
    Ok(())
}

/// Prints the per-scope factor counts the way the upload confirmation
/// reported them.
fn print_factor_counts(factors: &HashMap<String, EmissionFactor>) {
    println!("{}", factor_count_summary(factors));
}

/// One-line load summary: per-scope counts when any key carries a scope
/// prefix, otherwise just the overall count.
fn factor_count_summary(factors: &HashMap<String, EmissionFactor>) -> String {
    let mut scoped = [0usize; 3];
    let mut unscoped = 0usize;
    let mut has_waste = false;

    for (key, factor) in factors {
        if factor.category.as_deref() == Some("waste") {
            has_waste = true;
        }
        match FactorKey::parse(key).scope() {
            Some(scope) => scoped[(scope.number() - 1) as usize] += 1,
            None => unscoped += 1,
        }
    }

    let waste_note = if has_waste { " (including waste factors)" } else { "" };
    if scoped.iter().all(|count| *count == 0) {
        return format!("{} emission factors loaded{}", factors.len(), waste_note);
    }

    let mut parts = Vec::new();
    for scope in ScopeType::ALL {
        let count = scoped[(scope.number() - 1) as usize];
        if count > 0 {
            parts.push(format!("{} {} factors", count, scope.label()));
        }
    }
    if unscoped > 0 {
        parts.push(format!("{} other factors", unscoped));
    }
    format!("Loaded {}{}", parts.join(", "), waste_note)
}

use carbonledger_schemas::emission::Emission;

/// Fixed header of the emissions report.
pub const CSV_HEADER: &str =
    "Year,Product,Scope,Activity,Unit,Quantity,Emission Factor,Emissions (kg CO₂e)";

/// Renders an emission list as CSV text.
///
/// Scope is rendered as `Scope N`, activity underscores become spaces,
/// the emission value is fixed to two decimals, and missing year or
/// product renders as an empty field. Embedded commas in cell values are
/// not quoted or escaped; the format is line-per-row plain text.
pub fn generate_csv(emissions: &[Emission]) -> String {
    let mut lines = Vec::with_capacity(emissions.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for emission in emissions {
        let year = emission.year.map(|y| y.to_string()).unwrap_or_default();
        let product = emission.product.clone().unwrap_or_default();
        let activity = emission.activity.replace('_', " ");
        lines.push(format!(
            "{},{},{},{},{},{},{},{:.2}",
            year,
            product,
            emission.scope.label(),
            activity,
            emission.unit,
            emission.quantity,
            emission.factor,
            emission.emission,
        ));
    }

    lines.join("\n")
}

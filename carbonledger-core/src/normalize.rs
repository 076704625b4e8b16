use crate::error::LedgerError;
use carbonledger_schemas::factor::EmissionFactor;
use carbonledger_schemas::scope::ScopeType;
use carbonledger_schemas::sheet::{CellValue, Row, Sheet};
use std::collections::HashMap;

/// Ordered candidate columns for the activity label. First match wins.
const ACTIVITY_COLUMNS: &[&str] = &[
    "Activity Type",
    "Activity",
    "Description",
    "Source",
    "Fuel Type",
    "Energy Source",
    "Transport Mode",
    "Vehicle Type",
    "Material",
    "Category",
    "Subcategory",
    "GHG Source",
    "Emission Source",
    "Activity Name",
    "Type",
    "Source Category",
    "Process",
    "Equipment",
    "Industry",
    "Application",
    "Resource",
];

/// Ordered candidate columns for the emission factor value. The first
/// *present* column is taken; if its value does not parse, the generic
/// numeric scan runs instead of trying later candidates.
const FACTOR_COLUMNS: &[&str] = &[
    "Emission Factor (kg CO2e/unit)",
    "Emission Factor",
    "EF",
    "GHG Emission Factor",
    "CO2 Equivalent",
    "CO2e Factor",
    "CO2 Factor",
    "Factor",
    "kg CO2e/unit",
    "tCO2e",
];

/// Ordered candidate columns for the unit of measure.
const UNIT_COLUMNS: &[&str] = &["Unit", "Units", "Measurement Unit", "Unit of Measure"];

/// Activity-label keywords used to infer a unit when no column gives one.
const UNIT_KEYWORDS: &[(&[&str], &str)] = &[
    (&["electricity"], "kWh"),
    (&["fuel", "gas", "oil"], "liter"),
    (&["travel", "transport", "vehicle"], "km"),
    (&["waste"], "kg"),
];

/// Disposal methods recognized as wide-format waste columns.
const DISPOSAL_METHODS: &[&str] = &["Landfill", "Incineration", "Recycling", "Composting"];

const WASTE_TYPE_COLUMN: &str = "Waste Type";
const DISPOSAL_METHOD_COLUMN: &str = "Disposal Method";
const WASTE_FACTOR_COLUMN: &str = "Emission Factor (kg CO2e/unit)";
const SCOPE_COLUMN: &str = "Scope";

/// How waste factors are laid out on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WasteLayout {
    /// One row per waste-type/disposal-method pair, with an explicit
    /// `Disposal Method` column.
    Long,
    /// One column per disposal method, one row per waste type.
    Wide,
}

/// Normalizes a parsed workbook into a factor table keyed by synthesized
/// activity key.
///
/// Rows and sheets that cannot be interpreted are skipped silently; the
/// operation fails only when zero factors were extracted across all
/// sheets. Duplicate keys are last-write-wins.
pub fn normalize_workbook(
    sheets: &[Sheet],
) -> Result<HashMap<String, EmissionFactor>, LedgerError> {
    let mut factors = HashMap::new();

    for sheet in sheets {
        if sheet.rows.is_empty() {
            continue;
        }

        let first_row = &sheet.rows[0];
        let layout = detect_waste_layout(first_row);
        let mut sheet_scope = scope_from_sheet_name(&sheet.name);

        // A waste sheet without an explicit scope is value-chain waste.
        if layout.is_some() && sheet_scope.is_none() {
            sheet_scope = Some(ScopeType::Scope3);
        }

        if sheet_scope.is_none() && first_row.has_column(SCOPE_COLUMN) {
            for row in sheet.rows.iter().take(3) {
                if let Some(scope) = row.get(SCOPE_COLUMN).and_then(scope_from_cell) {
                    sheet_scope = Some(scope);
                    break;
                }
            }
        }

        for row in &sheet.rows {
            if row.len() < 2 {
                continue;
            }

            // Mixed-scope sheets: a per-row Scope value overrides the
            // sheet-level default.
            let row_scope = row
                .get(SCOPE_COLUMN)
                .and_then(scope_from_cell)
                .or(sheet_scope);
            let prefix = row_scope.map(|scope| scope.key_prefix()).unwrap_or("");

            match layout {
                Some(WasteLayout::Long) => extract_long_waste_row(row, prefix, &mut factors),
                Some(WasteLayout::Wide) => extract_wide_waste_row(row, prefix, &mut factors),
                None => extract_standard_row(row, prefix, &mut factors),
            }
        }
    }

    if factors.is_empty() {
        return Err(LedgerError::EmptyWorkbook);
    }
    Ok(factors)
}

fn detect_waste_layout(first_row: &Row) -> Option<WasteLayout> {
    if !first_row.has_column(WASTE_TYPE_COLUMN) {
        return None;
    }
    if first_row.has_column(DISPOSAL_METHOD_COLUMN) {
        return Some(WasteLayout::Long);
    }
    let has_method_columns = first_row
        .headers()
        .any(|header| DISPOSAL_METHODS.iter().any(|method| header.contains(method)));
    if has_method_columns {
        return Some(WasteLayout::Wide);
    }
    None
}

fn scope_from_sheet_name(name: &str) -> Option<ScopeType> {
    let lowered = name.to_lowercase();
    for scope in ScopeType::ALL {
        let spaced = format!("scope {}", scope.number());
        let joined = format!("scope{}", scope.number());
        if lowered.contains(&spaced) || lowered.contains(&joined) {
            return Some(scope);
        }
    }
    None
}

fn scope_from_cell(cell: &CellValue) -> Option<ScopeType> {
    for scope in ScopeType::ALL {
        let matched = match cell {
            CellValue::Number(n) => *n == scope.number() as f64,
            CellValue::Text(s) => {
                *s == scope.number().to_string() || s.as_str() == scope.label()
            }
        };
        if matched {
            return Some(scope);
        }
    }
    None
}

fn extract_long_waste_row(
    row: &Row,
    prefix: &str,
    factors: &mut HashMap<String, EmissionFactor>,
) {
    let Some(waste_type) = truthy_string(row, WASTE_TYPE_COLUMN) else {
        return;
    };
    let Some(disposal_method) = truthy_string(row, DISPOSAL_METHOD_COLUMN) else {
        return;
    };
    let Some(factor) = row.get(WASTE_FACTOR_COLUMN).and_then(parse_number) else {
        return;
    };
    let unit = truthy_string(row, "Unit").unwrap_or_default();

    insert_waste_factor(factors, prefix, &waste_type, &disposal_method, factor, unit);
}

fn extract_wide_waste_row(
    row: &Row,
    prefix: &str,
    factors: &mut HashMap<String, EmissionFactor>,
) {
    let Some(waste_type) = truthy_string(row, WASTE_TYPE_COLUMN) else {
        return;
    };

    for (header, value) in &row.cells {
        let Some(disposal_method) = DISPOSAL_METHODS
            .iter()
            .copied()
            .find(|method| header.contains(method))
        else {
            continue;
        };
        let Some(factor) = parse_number(value) else {
            continue;
        };
        // Header like "Landfill (kg CO2e/t)"; the token after the slash
        // is the measurement unit.
        let unit = parenthetical(header)
            .and_then(|inner| inner.split('/').nth(1))
            .filter(|u| !u.is_empty())
            .unwrap_or("t")
            .to_string();

        insert_waste_factor(factors, prefix, &waste_type, disposal_method, factor, unit);
    }
}

fn insert_waste_factor(
    factors: &mut HashMap<String, EmissionFactor>,
    prefix: &str,
    waste_type: &str,
    disposal_method: &str,
    factor: f64,
    unit: String,
) {
    let key = format!("{}waste_{}_{}", prefix, slug(waste_type), slug(disposal_method));
    factors.insert(
        key,
        EmissionFactor {
            name: format!("{} - {}", waste_type, disposal_method),
            factor,
            unit,
            waste_type: Some(waste_type.to_string()),
            disposal_method: Some(disposal_method.to_string()),
            category: Some("waste".to_string()),
        },
    );
}

fn extract_standard_row(
    row: &Row,
    prefix: &str,
    factors: &mut HashMap<String, EmissionFactor>,
) {
    let Some(activity) = find_activity_label(row) else {
        return;
    };
    let Some(factor) = find_factor_value(row) else {
        return;
    };
    let unit = find_unit(row, &activity);

    let key = format!("{}{}", prefix, slug(&activity));
    factors.insert(
        key,
        EmissionFactor {
            name: activity,
            factor,
            unit,
            waste_type: None,
            disposal_method: None,
            category: None,
        },
    );
}

fn find_activity_label(row: &Row) -> Option<String> {
    for column in ACTIVITY_COLUMNS.iter().copied() {
        if let Some(value) = truthy_string(row, column) {
            return Some(value);
        }
    }
    // Fall back to the first textual column that is not a unit or scope
    // marker.
    for (header, value) in &row.cells {
        if header == "Unit" || header == SCOPE_COLUMN {
            continue;
        }
        if let Some(text) = value.as_text() {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

fn find_factor_value(row: &Row) -> Option<f64> {
    let candidate = FACTOR_COLUMNS
        .iter()
        .copied()
        .find_map(|column| row.get(column))
        .and_then(parse_number);
    if candidate.is_some() {
        return candidate;
    }
    // Generic scan: any numeric-looking column except the scope marker
    // and year columns.
    for (header, value) in &row.cells {
        if header == SCOPE_COLUMN || header.contains("Year") {
            continue;
        }
        if let Some(number) = parse_number(value) {
            return Some(number);
        }
    }
    None
}

fn find_unit(row: &Row, activity: &str) -> String {
    for column in UNIT_COLUMNS.iter().copied() {
        if let Some(unit) = truthy_string(row, column) {
            return unit;
        }
    }

    // No unit column; look for a denominator in the column headers,
    // e.g. "(kg CO2e/kWh)", "per kWh", or a bare slash.
    for header in row.headers() {
        if let Some(inner) = parenthetical(header) {
            let unit = match inner.split_once('/') {
                Some((_, denominator)) => denominator,
                None => inner,
            };
            if !unit.is_empty() {
                return unit.to_string();
            }
            break;
        }
        if let Some((_, rest)) = header.split_once(" per ") {
            if !rest.is_empty() {
                return rest.to_string();
            }
            break;
        }
        if let Some((_, rest)) = header.split_once('/') {
            if !rest.is_empty() {
                return rest.to_string();
            }
            break;
        }
    }

    let lowered = activity.to_lowercase();
    for (keywords, unit) in UNIT_KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return unit.to_string();
        }
    }

    "unit".to_string()
}

/// Lowercases and replaces whitespace runs with single underscores, the
/// form used for synthesized activity keys.
fn slug(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Returns the text between the first pair of parentheses in a header.
fn parenthetical(header: &str) -> Option<&str> {
    let start = header.find('(')? + 1;
    let end = start + header[start..].find(')')?;
    Some(&header[start..end])
}

fn truthy_string(row: &Row, column: &str) -> Option<String> {
    let value = row.get(column)?;
    if !value.is_truthy() {
        return None;
    }
    Some(match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => format_number(*n),
    })
}

fn format_number(n: f64) -> String {
    format!("{}", n)
}

/// Numeric reading of a cell: finite numbers as-is, text by its longest
/// leading float prefix, so "2.5 kg" reads as 2.5. NaN and infinity are
/// rejected; a non-finite factor would silently poison every total
/// downstream.
fn parse_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
        CellValue::Text(s) => leading_float(s),
    }
}

fn leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let integer_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > integer_start;
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        let fraction_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        has_digits |= end > fraction_start;
    }
    if !has_digits {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digit_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digit_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, CellValue)]) -> Row {
        Row::new(
            cells
                .iter()
                .map(|(header, value)| (header.to_string(), value.clone()))
                .collect(),
        )
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    #[test]
    fn long_format_waste_sheet_round_trips() {
        let sheet = Sheet {
            name: "Waste Factors".to_string(),
            rows: vec![
                row(&[
                    ("Waste Type", text("Paper")),
                    ("Disposal Method", text("Landfill")),
                    ("Emission Factor (kg CO2e/unit)", num(2100.0)),
                    ("Unit", text("t")),
                ]),
                row(&[
                    ("Waste Type", text("Paper")),
                    ("Disposal Method", text("Recycling")),
                    ("Emission Factor (kg CO2e/unit)", num(350.0)),
                    ("Unit", text("t")),
                ]),
            ],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors.len(), 2);

        let landfill = &factors["scope3_waste_paper_landfill"];
        assert_eq!(landfill.factor, 2100.0);
        assert_eq!(landfill.name, "Paper - Landfill");
        assert_eq!(landfill.waste_type.as_deref(), Some("Paper"));
        assert_eq!(landfill.disposal_method.as_deref(), Some("Landfill"));
        assert_eq!(landfill.category.as_deref(), Some("waste"));

        let recycling = &factors["scope3_waste_paper_recycling"];
        assert_eq!(recycling.factor, 350.0);
    }

    #[test]
    fn wide_format_waste_row_expands_per_method_column() {
        let sheet = Sheet {
            name: "Waste".to_string(),
            rows: vec![row(&[
                ("Waste Type", text("Plastic")),
                ("Landfill (kg CO2e/t)", num(3200.0)),
                ("Recycling (kg CO2e/t)", num(580.0)),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors["scope3_waste_plastic_landfill"].factor, 3200.0);
        assert_eq!(factors["scope3_waste_plastic_landfill"].unit, "t");
        assert_eq!(factors["scope3_waste_plastic_recycling"].factor, 580.0);
        assert_eq!(factors["scope3_waste_plastic_recycling"].unit, "t");
    }

    #[test]
    fn wide_format_header_without_parenthetical_defaults_to_tonnes() {
        let sheet = Sheet {
            name: "Waste".to_string(),
            rows: vec![row(&[
                ("Waste Type", text("Glass")),
                ("Incineration", num(24.0)),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors["scope3_waste_glass_incineration"].unit, "t");
    }

    #[test]
    fn scope_detected_from_sheet_name() {
        let sheet = Sheet {
            name: "Scope 1 - Stationary Combustion".to_string(),
            rows: vec![row(&[
                ("Activity Type", text("Natural Gas")),
                ("Emission Factor", num(2.02)),
                ("Unit", text("m3")),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert!(factors.contains_key("scope1_natural_gas"));
    }

    #[test]
    fn scope_column_applies_per_row() {
        let sheet = Sheet {
            name: "Factors".to_string(),
            rows: vec![
                row(&[
                    ("Activity Type", text("Diesel")),
                    ("Emission Factor", num(2.68)),
                    ("Scope", num(1.0)),
                ]),
                row(&[
                    ("Activity Type", text("Grid Electricity")),
                    ("Emission Factor", num(0.4)),
                    ("Scope", text("Scope 2")),
                ]),
            ],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert!(factors.contains_key("scope1_diesel"));
        assert!(factors.contains_key("scope2_grid_electricity"));
    }

    #[test]
    fn sheet_without_scope_markers_yields_unscoped_keys() {
        let sheet = Sheet {
            name: "General".to_string(),
            rows: vec![row(&[
                ("Activity", text("Business Travel")),
                ("Factor", num(0.18)),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        let factor = &factors["business_travel"];
        assert_eq!(factor.factor, 0.18);
        // Keyword inference: travel-related activities are measured in km.
        assert_eq!(factor.unit, "km");
    }

    #[test]
    fn unit_extracted_from_header_parenthetical_denominator() {
        let sheet = Sheet {
            name: "Scope 2".to_string(),
            rows: vec![row(&[
                ("Energy Source", text("Purchased Steam")),
                ("Emission Factor (kg CO2e/kWh)", num(0.19)),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors["scope2_purchased_steam"].unit, "kWh");
    }

    #[test]
    fn numeric_looking_text_parses_as_factor() {
        let sheet = Sheet {
            name: "Scope 1".to_string(),
            rows: vec![row(&[
                ("Fuel Type", text("Propane")),
                ("Emission Factor", text("1.51 kg")),
                ("Unit", text("liter")),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors["scope1_propane"].factor, 1.51);
    }

    #[test]
    fn generic_numeric_scan_skips_scope_and_year_columns() {
        let sheet = Sheet {
            name: "Scope 1".to_string(),
            rows: vec![row(&[
                ("Activity", text("Coal")),
                ("Reference Year", num(2021.0)),
                ("Value", num(2.42)),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors["scope1_coal"].factor, 2.42);
    }

    #[test]
    fn non_finite_factor_cells_are_rejected() {
        let not_a_number: f64 = "NaN".parse().unwrap();
        let sheet = Sheet {
            name: "Scope 1".to_string(),
            rows: vec![
                row(&[
                    ("Activity", text("Flaring")),
                    ("Emission Factor", num(not_a_number)),
                    ("Unit", text("m3")),
                ]),
                row(&[
                    ("Activity", text("Venting")),
                    ("Emission Factor", num(f64::INFINITY)),
                    ("Unit", text("m3")),
                ]),
                row(&[
                    ("Activity", text("Diesel")),
                    ("Emission Factor", num(2.68)),
                    ("Unit", text("liter")),
                ]),
            ],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors.len(), 1);
        assert!(factors.contains_key("scope1_diesel"));
        assert!(factors.values().all(|f| f.factor.is_finite()));
    }

    #[test]
    fn duplicate_keys_are_last_write_wins() {
        let sheet = Sheet {
            name: "Scope 1".to_string(),
            rows: vec![
                row(&[("Activity", text("Diesel")), ("Factor", num(2.6)), ("Unit", text("liter"))]),
                row(&[("Activity", text("Diesel")), ("Factor", num(2.7)), ("Unit", text("liter"))]),
            ],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors["scope1_diesel"].factor, 2.7);
    }

    #[test]
    fn rows_with_fewer_than_two_columns_are_skipped() {
        let sheet = Sheet {
            name: "Scope 1".to_string(),
            rows: vec![
                row(&[("Activity", text("Orphan"))]),
                row(&[("Activity", text("Diesel")), ("Factor", num(2.68))]),
            ],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors.len(), 1);
        assert!(factors.contains_key("scope1_diesel"));
    }

    #[test]
    fn workbook_without_usable_rows_is_an_empty_result() {
        let sheets = vec![
            Sheet { name: "Empty".to_string(), rows: vec![] },
            Sheet {
                name: "Notes".to_string(),
                rows: vec![row(&[
                    ("Comment", text("prepared by finance")),
                    ("Author", text("unknown")),
                ])],
            },
        ];

        // "Notes" rows have text in every column, so the first text column
        // becomes a label but no factor parses.
        let err = normalize_workbook(&sheets).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyWorkbook));
    }

    #[test]
    fn long_format_row_missing_disposal_method_is_skipped() {
        let sheet = Sheet {
            name: "Waste".to_string(),
            rows: vec![
                row(&[
                    ("Waste Type", text("Paper")),
                    ("Disposal Method", text("")),
                    ("Emission Factor (kg CO2e/unit)", num(100.0)),
                ]),
                row(&[
                    ("Waste Type", text("Paper")),
                    ("Disposal Method", text("Composting")),
                    ("Emission Factor (kg CO2e/unit)", num(50.0)),
                ]),
            ],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert_eq!(factors.len(), 1);
        assert!(factors.contains_key("scope3_waste_paper_composting"));
    }

    #[test]
    fn waste_keys_collapse_whitespace_runs() {
        let sheet = Sheet {
            name: "Waste".to_string(),
            rows: vec![row(&[
                ("Waste Type", text("Mixed  Organic Waste")),
                ("Disposal Method", text("Open Burning")),
                ("Emission Factor (kg CO2e/unit)", num(900.0)),
                ("Unit", text("t")),
            ])],
        };

        let factors = normalize_workbook(&[sheet]).unwrap();
        assert!(factors.contains_key("scope3_waste_mixed_organic_waste_open_burning"));
    }

    #[test]
    fn leading_float_matches_parsefloat_semantics() {
        assert_eq!(leading_float("2.5 kg"), Some(2.5));
        assert_eq!(leading_float("  -0.3"), Some(-0.3));
        assert_eq!(leading_float("1e3"), Some(1000.0));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("n/a"), None);
        assert_eq!(leading_float(""), None);
    }
}

use anyhow::{bail, Context, Result};
use carbonledger_schemas::sheet::{CellValue, Row, Sheet};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Reads an emission-factor workbook from disk.
///
/// A directory is treated as a workbook with one sheet per `*.csv` file,
/// the sheet name being the file stem; a single `.csv` file becomes a
/// one-sheet workbook. Sheets are ordered by file name.
pub fn load_workbook(path: &Path) -> Result<Vec<Sheet>> {
    if !path.is_dir() {
        return Ok(vec![load_sheet(path)?]);
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(path)
        .with_context(|| format!("Failed to read workbook directory {:?}", path))?
    {
        let entry_path = entry?.path();
        if entry_path.is_file() && entry_path.extension().map_or(false, |ext| ext == "csv") {
            paths.push(entry_path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        bail!("No .csv sheets found in workbook directory {:?}", path);
    }

    paths.iter().map(|sheet_path| load_sheet(sheet_path)).collect()
}

fn load_sheet(path: &Path) -> Result<Sheet> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Sheet1")
        .to_string();
    let file = fs::File::open(path).with_context(|| format!("Failed to open sheet {:?}", path))?;
    sheet_from_reader(name, file).with_context(|| format!("Failed to parse sheet {:?}", path))
}

/// Builds a sheet from CSV data: the header row supplies column names,
/// every following record becomes a row. Blank cells are omitted from
/// the row record, matching how spreadsheet readers emit rows.
fn sheet_from_reader<R: Read>(name: String, reader: R) -> Result<Sheet> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut cells = Vec::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            // f64 parsing accepts "NaN" and "inf"; those are cell text,
            // not usable numbers.
            let value = match field.parse::<f64>() {
                Ok(number) if number.is_finite() => CellValue::Number(number),
                _ => CellValue::Text(field.to_string()),
            };
            cells.push((header.to_string(), value));
        }
        rows.push(Row::new(cells));
    }

    Ok(Sheet { name, rows })
}

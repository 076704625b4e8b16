use serde::{Deserialize, Serialize};

/// A single spreadsheet cell. Blank cells are omitted from rows entirely,
/// mirroring how spreadsheet readers emit row records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// Truthiness in the sense of the calculator's column heuristics: a
    /// cell counts as present unless it is empty text or exactly zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
        }
    }
}

/// One spreadsheet row: an ordered mapping of column header to cell value.
/// Column order is meaningful — several normalizer fallbacks take the
/// first matching column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Row { cells }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.get(header).is_some()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A named sheet from an uploaded workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

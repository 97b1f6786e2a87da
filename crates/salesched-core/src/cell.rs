//! Spreadsheet cell values
//!
//! Workbook readers hand the engine untyped cells. `CellValue` tags them so
//! the configuration parser and input extractor can convert explicitly.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Non-empty text content, if this is a text cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way a spreadsheet displays it
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Bool(true) => "TRUE".into(),
            Self::Bool(false) => "FALSE".into(),
            Self::Date(d) => d.format("%m/%d/%Y").to_string(),
        }
    }

    /// Whole number held by the cell, accepting numeric text
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// A 0-indexed block of cells anchored at A1
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a grid from string literals; `""` becomes an empty cell
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|c| CellValue::from(c.as_ref())).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cell at (row, column); out-of-range positions read as empty
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(EMPTY)
    }

    /// Set a cell, growing the grid as needed
    pub fn set(&mut self, row: usize, column: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, CellValue::Empty);
        }
        cells[column] = value;
    }
}

/// Spreadsheet column name for a 0-based index (0 -> A, 26 -> AA)
pub fn column_letter(column: usize) -> String {
    let mut n = column + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-style reference for a 0-based (row, column)
pub fn cell_reference(row: usize, column: usize) -> String {
    format!("{}{}", column_letter(column), row + 1)
}

/// Convert an Excel 1900-system serial number to a date.
///
/// Serials below 61 are shifted by one to account for the phantom
/// 1900-02-29 in the 1900 date system.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // saturates at u64::MAX, which checked_add_days rejects
    let days = serial.floor() as u64;
    let days = if days < 61 { days + 1 } else { days };
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("   ").is_blank());
        assert!(!CellValue::text(" x ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn as_text_renders_like_a_spreadsheet() {
        assert_eq!(CellValue::Number(5.0).as_text(), "5");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Bool(true).as_text(), "TRUE");
        assert_eq!(
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()).as_text(),
            "01/07/2024"
        );
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn as_integer_accepts_numbers_and_numeric_text() {
        assert_eq!(CellValue::Number(3.0).as_integer(), Some(3));
        assert_eq!(CellValue::Number(3.5).as_integer(), None);
        assert_eq!(CellValue::text(" 12 ").as_integer(), Some(12));
        assert_eq!(CellValue::text("-3").as_integer(), Some(-3));
        assert_eq!(CellValue::text("abc").as_integer(), None);
        assert_eq!(CellValue::Empty.as_integer(), None);
    }

    #[test]
    fn grid_reads_out_of_range_as_empty() {
        let grid = Grid::from_strings([vec!["a", ""], vec!["b"]]);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cell(0, 0), &CellValue::text("a"));
        assert_eq!(grid.cell(0, 1), &CellValue::Empty);
        assert_eq!(grid.cell(1, 5), &CellValue::Empty);
        assert_eq!(grid.cell(9, 0), &CellValue::Empty);
    }

    #[test]
    fn grid_set_grows() {
        let mut grid = Grid::default();
        grid.set(2, 3, CellValue::text("x"));
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell(2, 3), &CellValue::text("x"));
        assert!(grid.row(0).unwrap().is_empty());
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(11), "L");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
        assert_eq!(cell_reference(2, 2), "C3");
    }

    #[test]
    fn excel_serials() {
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        assert_eq!(excel_serial_to_date(45308.0), d(2024, 1, 17));
        assert_eq!(excel_serial_to_date(45308.75), d(2024, 1, 17));
        assert_eq!(excel_serial_to_date(61.0), d(1900, 3, 1));
        assert_eq!(excel_serial_to_date(1.0), d(1900, 1, 1));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(1e20), None);
        assert_eq!(excel_serial_to_date(f64::MAX), None);
    }
}

//! Workbook reading
//!
//! Turns workbook bytes into one `Grid` per sheet. Grids are anchored at A1
//! regardless of where the sheet's used range starts, so column positions in
//! the settings always mean the same spreadsheet column.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDate;
use salesched_core::cell::excel_serial_to_date;
use salesched_core::{CellValue, Grid, ScheduleError};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Anything that can hand out sheets as cell grids
pub trait GridSource {
    /// Grid for a sheet, or `None` if the sheet does not exist
    fn read_grid(&self, sheet: &str) -> Option<&Grid>;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<&str>;
}

/// An in-memory workbook: named sheets of cells
#[derive(Clone, Debug, Default)]
pub struct Workbook {
    sheets: Vec<(String, Grid)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a sheet
    pub fn with_sheet(mut self, name: impl Into<String>, grid: Grid) -> Self {
        self.insert_sheet(name, grid);
        self
    }

    pub fn insert_sheet(&mut self, name: impl Into<String>, grid: Grid) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = grid,
            None => self.sheets.push((name, grid)),
        }
    }

    /// Read every sheet of an xlsx/xlsm/xlsb/xls/ods workbook
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScheduleError> {
        let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ScheduleError::Workbook(e.to_string()))?;

        let mut workbook = Self::new();
        for name in reader.sheet_names() {
            let range = reader
                .worksheet_range(&name)
                .map_err(|e| ScheduleError::Workbook(format!("sheet {name}: {e}")))?;
            let grid = grid_from_range(&range);
            debug!(sheet = %name, rows = grid.height(), "read sheet");
            workbook.sheets.push((name, grid));
        }
        Ok(workbook)
    }

    /// Read a workbook file from disk
    pub fn open(path: &Path) -> Result<Self, ScheduleError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ScheduleError::Workbook(format!("{}: {e}", path.display())))?;
        Self::from_bytes(&bytes)
    }
}

impl GridSource for Workbook {
    fn read_grid(&self, sheet: &str) -> Option<&Grid> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, grid)| grid)
    }

    fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Copy a calamine range into an A1-anchored grid
fn grid_from_range(range: &Range<Data>) -> Grid {
    let mut grid = Grid::default();
    let Some((first_row, first_col)) = range.start() else {
        return grid;
    };
    for (r, row) in range.rows().enumerate() {
        for (c, data) in row.iter().enumerate() {
            let value = cell_from_data(data);
            if value != CellValue::Empty {
                grid.set(first_row as usize + r, first_col as usize + c, value);
            }
        }
    }
    grid
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| CellValue::Date(d.date()))
            .or_else(|| excel_serial_to_date(dt.as_f64()).map(CellValue::Date))
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .map_or_else(|| CellValue::text(s.as_str()), CellValue::Date),
        Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(e) => CellValue::text(e.to_string()),
    }
}

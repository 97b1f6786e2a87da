//! Excel schedule renderer
//!
//! Writes an `OutputGrid` to a single-sheet xlsx workbook:
//!
//! ```text
//! Sheet: Schedule
//! | Lot  | Client | Salesperson | Type     | ... | Design     | Presentation Date |
//! |------|--------|-------------|----------|-----|------------|-------------------|
//! | L-17 | Acme   | John Doe    | standard | ... | 03/07/2025 | 03/14/2025        |
//! ```
//!
//! Every cell is written as text, so the dates appear exactly as the
//! formatter rendered them. The header row is bold and frozen, and column
//! widths are fitted to the longest value in each column.

use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};
use salesched_core::{OutputGrid, RenderError, Renderer};
use tracing::debug;

/// Narrowest column width in character units
const MIN_COLUMN_WIDTH: usize = 8;
/// Widest column width in character units
const MAX_COLUMN_WIDTH: usize = 60;

/// Single-sheet xlsx renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Name of the output sheet
    pub sheet_name: String,
    /// Whether to freeze the header row
    pub freeze_header: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Schedule".into(),
            freeze_header: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output sheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Leave the header row scrollable
    pub fn no_freeze(mut self) -> Self {
        self.freeze_header = false;
        self
    }

    /// Render the grid to xlsx bytes
    pub fn render_to_bytes(&self, grid: &OutputGrid) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(format!("sheet name \"{}\": {e}", self.sheet_name)))?;

        for (col, title) in grid.header.iter().enumerate() {
            sheet
                .write_string_with_format(0, column(col)?, title, &header_format)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        for (index, values) in grid.rows.iter().enumerate() {
            let row = u32::try_from(index + 1)
                .map_err(|_| RenderError::InvalidData(format!("too many rows: {}", index + 1)))?;
            for (col, value) in values.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                sheet
                    .write_string(row, column(col)?, value)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }

        Self::fit_columns(sheet, grid)?;
        if self.freeze_header {
            sheet.set_freeze_panes(1, 0).ok();
        }

        debug!(
            sheet = %self.sheet_name,
            rows = grid.rows.len(),
            columns = grid.column_count(),
            "rendered xlsx"
        );

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    fn fit_columns(sheet: &mut Worksheet, grid: &OutputGrid) -> Result<(), RenderError> {
        for (col, width) in column_widths(grid).into_iter().enumerate() {
            sheet.set_column_width(column(col)?, width as f64).ok();
        }
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, grid: &OutputGrid) -> Result<Vec<u8>, RenderError> {
        if grid.header.is_empty() {
            return Err(RenderError::InvalidData("No columns to render".into()));
        }
        self.render_to_bytes(grid)
    }
}

/// Character width per column, padded and clamped
fn column_widths(grid: &OutputGrid) -> Vec<usize> {
    let mut widths = vec![0; grid.column_count()];
    for line in grid.lines() {
        for (col, value) in line.iter().enumerate() {
            widths[col] = widths[col].max(value.chars().count());
        }
    }
    widths
        .into_iter()
        .map(|w| (w + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
        .collect()
}

fn column(index: usize) -> Result<u16, RenderError> {
    u16::try_from(index).map_err(|_| RenderError::InvalidData(format!("too many columns: {index}")))
}

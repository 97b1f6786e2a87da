//! Plain text table renderer for console output

use salesched_core::{OutputGrid, RenderError, Renderer};

use crate::truncate;

/// Aligned plain-text table
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Longest value shown per cell before truncation
    pub max_cell_width: usize,
    /// Column separator
    pub separator: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            max_cell_width: 40,
            separator: "  ".into(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_cell_width(mut self, width: usize) -> Self {
        self.max_cell_width = width.max(4);
        self
    }

    fn format_line(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col, &width)| {
                let value = cells
                    .get(col)
                    .map(|c| truncate(c, self.max_cell_width))
                    .unwrap_or_default();
                format!("{value:<width$}")
            })
            .collect();
        padded.join(&self.separator).trim_end().to_string()
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, grid: &OutputGrid) -> Result<String, RenderError> {
        let mut widths = vec![0; grid.column_count()];
        for line in grid.lines() {
            for (col, value) in line.iter().enumerate() {
                let len = value.chars().count().min(self.max_cell_width);
                widths[col] = widths[col].max(len);
            }
        }

        let mut out = String::new();
        out.push_str(&self.format_line(&grid.header, &widths));
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join(&self.separator));
        out.push('\n');

        for row in &grid.rows {
            out.push_str(&self.format_line(row, &widths));
            out.push('\n');
        }
        Ok(out)
    }
}

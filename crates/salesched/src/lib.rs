//! # salesched
//!
//! Derives a milestone schedule workbook from a sales pipeline workbook.
//!
//! The pipeline runs in four stages, each in its own `tracing` span:
//!
//! 1. Parse the type rules and salesperson aliases (`salesched-parser`)
//! 2. Extract the schedulable input rows (`salesched-parser`)
//! 3. Compute milestone dates (`salesched-solver`)
//! 4. Format and sort the output table (`salesched-render`)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use salesched::{derive, Grid, Settings, Workbook};
//!
//! let workbook = Workbook::new()
//!     .with_sheet("Schedule_Code", Grid::from_strings([
//!         vec!["", "", "Design"],
//!         vec!["Type", "Alias", "Days"],
//!         vec!["standard", "std", "5"],
//!     ]))
//!     .with_sheet("Sales_Alias", Grid::from_strings([vec!["Alias", "Name"]]))
//!     .with_sheet("Potential", Grid::from_strings([
//!         vec!["", "", "std", "Acme", "", "", "L-1", "", "", "", "", "1/17/24"],
//!     ]));
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let grid = derive(&workbook, &Settings::default(), today).unwrap();
//! assert_eq!(grid.rows[0][6], "01/10/2024");
//! ```

use chrono::{Local, NaiveDate};
use tracing::info_span;

pub use salesched_core::{
    CellValue, Configuration, Grid, InputBatch, OutputGrid, RenderError, Renderer, Schedule,
    ScheduleError, Scheduler, Settings,
};
pub use salesched_parser::{GridSource, Workbook};
pub use salesched_render::{ExcelRenderer, TextRenderer};
pub use salesched_solver::MilestoneSolver;

/// Convert workbook bytes into schedule workbook bytes, using the default
/// settings and today's local date
pub fn process(bytes: &[u8]) -> Result<Vec<u8>, ScheduleError> {
    process_with(bytes, &Settings::default(), Local::now().date_naive())
}

/// Convert workbook bytes into schedule workbook bytes
pub fn process_with(
    bytes: &[u8],
    settings: &Settings,
    today: NaiveDate,
) -> Result<Vec<u8>, ScheduleError> {
    let workbook = {
        let _span = info_span!("read", bytes = bytes.len()).entered();
        Workbook::from_bytes(bytes)?
    };
    let grid = derive(&workbook, settings, today)?;

    let _span = info_span!("write", sheet = %settings.output_sheet).entered();
    let output = ExcelRenderer::new()
        .sheet_name(&settings.output_sheet)
        .render(&grid)?;
    Ok(output)
}

/// Run the scheduling pipeline over already-loaded sheets
pub fn derive(
    source: &dyn GridSource,
    settings: &Settings,
    today: NaiveDate,
) -> Result<OutputGrid, ScheduleError> {
    let config = {
        let _span = info_span!("configuration", sheet = %settings.parameter_sheet).entered();
        salesched_parser::parse_configuration(source, settings)?
    };

    let batch = {
        let _span = info_span!("extract", sheet = %settings.input_sheet, %today).entered();
        salesched_parser::extract_inputs(source, &config, settings, today)?
    };

    let schedule = {
        let _span = info_span!("schedule", records = batch.len()).entered();
        MilestoneSolver::new().schedule(&batch, &config)
    };

    let _span = info_span!("format", entries = schedule.len()).entered();
    salesched_render::format_schedule(&schedule, &config, settings)
}

//! # salesched-parser
//!
//! Reads sales workbooks into typed salesched inputs.
//!
//! This crate provides:
//! - Workbook reading into cell grids (`Workbook`, backed by calamine)
//! - Configuration parsing (`Schedule_Code` and `Sales_Alias` sheets)
//! - Input extraction and normalization (`Potential` sheet)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use salesched_core::{Grid, Settings};
//! use salesched_parser::{extract_inputs, parse_configuration, Workbook};
//!
//! let workbook = Workbook::new()
//!     .with_sheet("Schedule_Code", Grid::from_strings([
//!         vec!["", "", "Design Review", ""],
//!         vec!["Type", "Alias", "Days", "Weekday"],
//!         vec!["standard", "std", "5", ""],
//!     ]))
//!     .with_sheet("Sales_Alias", Grid::from_strings([
//!         vec!["Alias", "Name"],
//!         vec!["jd", "John Doe"],
//!     ]))
//!     .with_sheet("Potential", Grid::from_strings([
//!         vec!["", "JD", "std", "Acme", "", "", "L-100", "", "", "", "", "3/14/25"],
//!     ]));
//!
//! let settings = Settings::default();
//! let config = parse_configuration(&workbook, &settings).unwrap();
//! let today = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let batch = extract_inputs(&workbook, &config, &settings, today).unwrap();
//!
//! assert_eq!(batch.get("L-100").unwrap().sales_person, "John Doe");
//! ```

pub mod config;
pub mod input;
pub mod workbook;

pub use config::{parse_configuration, parse_sales_aliases, parse_type_rules};
pub use input::{
    extract_inputs, extract_rows, normalize_build_type, normalize_shot_grade,
    parse_presentation_date, SchedulingWindow,
};
pub use workbook::{GridSource, Workbook};

/// Supported workbook formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Office Open XML workbook (.xlsx, .xlsm)
    Xlsx,
    /// Binary workbook (.xlsb)
    Xlsb,
    /// Legacy Excel 97-2003 workbook (.xls)
    Xls,
    /// OpenDocument spreadsheet (.ods)
    Ods,
}

/// Detect workbook format from extension
pub fn detect_format(path: &std::path::Path) -> Option<FileFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" | "xlam" => Some(FileFormat::Xlsx),
        "xlsb" => Some(FileFormat::Xlsb),
        "xls" | "xla" => Some(FileFormat::Xls),
        "ods" => Some(FileFormat::Ods),
        _ => None,
    }
}

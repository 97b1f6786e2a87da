//! # salesched-render
//!
//! Output formatting and rendering backends for salesched schedules.
//!
//! This crate provides:
//! - The output formatter that turns a `Schedule` into a sorted `OutputGrid`
//! - Excel output (a single-sheet xlsx workbook)
//! - Plain text tables for console output
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use salesched_core::{
//!     Configuration, InputRecord, Renderer, Schedule, ScheduleEntry, ScheduledMilestone,
//!     Settings, TypeRule,
//! };
//! use salesched_render::{format_schedule, ExcelRenderer, TextRenderer};
//!
//! let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
//! let config = Configuration::with_types([TypeRule::new("standard", "std")]);
//! let schedule = Schedule {
//!     entries: vec![ScheduleEntry {
//!         record: InputRecord {
//!             lot: "L-1".into(),
//!             type_key: "standard".into(),
//!             sales_person: "John Doe".into(),
//!             client: "Acme".into(),
//!             presentation_date: date(3, 14),
//!             shot_grade: "Yes".into(),
//!             build_type: "Signature".into(),
//!         },
//!         milestones: vec![ScheduledMilestone { name: "Design".into(), date: date(3, 7) }],
//!     }],
//! };
//!
//! let grid = format_schedule(&schedule, &config, &Settings::default()).unwrap();
//! assert_eq!(grid.rows[0][6], "03/07/2025");
//!
//! let table = TextRenderer::new().render(&grid).unwrap();
//! assert!(table.contains("Presentation Date"));
//!
//! let xlsx = ExcelRenderer::new().render(&grid).unwrap();
//! assert_eq!(&xlsx[0..2], b"PK");
//! ```

pub mod excel;
pub mod formatter;
pub mod text;

pub use excel::ExcelRenderer;
pub use formatter::{format_schedule, OUTPUT_COLUMNS};
pub use text::TextRenderer;

/// Truncate a string to at most `max` characters, marking the cut with `...`
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

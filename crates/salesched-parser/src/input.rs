//! Input sheet extraction
//!
//! Selects the rows of the input sheet that can be scheduled and normalizes
//! them into `InputRecord`s. Rows without a usable presentation date, or
//! with one outside the scheduling window, are skipped without error.

use chrono::{Datelike, Months, NaiveDate};
use salesched_core::cell::excel_serial_to_date;
use salesched_core::{
    CellValue, Configuration, Grid, InputBatch, InputRecord, ScheduleError, Settings,
};
use tracing::{debug, info, warn};

use crate::workbook::GridSource;

const UNKNOWN_SHOT_GRADE: &str = "Unknown Shot Grade Type";
const UNKNOWN_BUILD_TYPE: &str = "Unknown Build Type";

/// Dates strictly after `today`, up to and including `end`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulingWindow {
    pub today: NaiveDate,
    pub end: NaiveDate,
}

impl SchedulingWindow {
    pub fn new(today: NaiveDate, years: u32) -> Self {
        let end = today
            .checked_add_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MAX);
        Self { today, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.today && date <= self.end
    }
}

/// Extract schedulable rows from the input sheet named in `settings`
pub fn extract_inputs(
    source: &dyn GridSource,
    config: &Configuration,
    settings: &Settings,
    today: NaiveDate,
) -> Result<InputBatch, ScheduleError> {
    extract_rows(
        source.read_grid(&settings.input_sheet),
        config,
        settings,
        today,
    )
}

/// Extract schedulable rows from an input grid
pub fn extract_rows(
    grid: Option<&Grid>,
    config: &Configuration,
    settings: &Settings,
    today: NaiveDate,
) -> Result<InputBatch, ScheduleError> {
    let grid = grid
        .filter(|g| !g.is_empty())
        .ok_or_else(|| ScheduleError::MissingSheet {
            sheet: settings.input_sheet.clone(),
        })?;

    let columns = &settings.input_columns;
    let window = SchedulingWindow::new(today, settings.window_years);
    let mut batch = InputBatch::new();

    for (row, cells) in grid.rows().enumerate() {
        let cell = |column: usize| cells.get(column).unwrap_or(&CellValue::Empty);

        let date_cell = cell(columns.presentation_date);
        if date_cell.is_blank() {
            continue;
        }
        let Some(presentation_date) = parse_presentation_date(date_cell, today) else {
            debug!(row = row + 1, value = %date_cell.as_text(), "unparsable presentation date");
            continue;
        };
        if !window.contains(presentation_date) {
            debug!(row = row + 1, %presentation_date, "presentation date outside scheduling window");
            continue;
        }

        let sales_person = config
            .resolve_sales_person(&cell(columns.sales_person).as_text())
            .unwrap_or(&settings.default_sales_person)
            .to_string();

        let record = InputRecord {
            lot: cell(columns.lot).as_text().trim().to_string(),
            type_key: config
                .resolve_type(&cell(columns.lead_type).as_text())
                .to_string(),
            sales_person,
            client: cell(columns.client).as_text().trim().to_string(),
            presentation_date,
            shot_grade: normalize_shot_grade(
                &cell(columns.shot_grade).as_text(),
                &settings.default_shot_grade,
            ),
            build_type: normalize_build_type(
                &cell(columns.build_type).as_text(),
                &settings.default_build_type,
            ),
        };

        if let Some(previous) = batch.insert(record) {
            warn!(
                lot = %previous.lot,
                row = row + 1,
                "lot appears more than once; the later row replaces the earlier one"
            );
        }
    }

    info!(rows = grid.height(), scheduled = batch.len(), "extracted input rows");
    Ok(batch)
}

/// Parse a presentation date cell.
///
/// Date cells are taken as-is and numbers are Excel serial dates. Text may
/// be `M/D/YY`, `M/D/YYYY` or `M/D`; the short form uses `today`'s year.
pub fn parse_presentation_date(cell: &CellValue, today: NaiveDate) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::Number(serial) => excel_serial_to_date(*serial),
        CellValue::Text(text) => parse_date_text(text, today),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

fn parse_date_text(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.trim().split('/').map(str::trim).collect();
    let (month, day, year) = match parts.as_slice() {
        [month, day] => (number(month)?, number(day)?, today.year()),
        [month, day, year] => {
            let year = match year.len() {
                1 | 2 => expand_two_digit_year(number(year)?),
                4 => i32::try_from(number(year)?).ok()?,
                _ => return None,
            };
            (number(month)?, number(day)?, year)
        }
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn number(part: &str) -> Option<u32> {
    if part.is_empty() || part.len() > 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// `00..=68` are 2000s, `69..=99` are 1900s
fn expand_two_digit_year(year: u32) -> i32 {
    let year = year as i32;
    if year > 68 {
        1900 + year
    } else {
        2000 + year
    }
}

/// `y` -> Yes, `n` -> No, blank -> `default`
pub fn normalize_shot_grade(raw: &str, default: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "" => default.to_string(),
        "y" => "Yes".to_string(),
        "n" => "No".to_string(),
        _ => UNKNOWN_SHOT_GRADE.to_string(),
    }
}

/// `s` -> Signature, `t` -> Traditional, `w` -> White Glove, blank -> `default`
pub fn normalize_build_type(raw: &str, default: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "" => default.to_string(),
        "s" => "Signature".to_string(),
        "t" => "Traditional".to_string(),
        "w" => "White Glove".to_string(),
        _ => UNKNOWN_BUILD_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use salesched_core::{MilestoneTemplate, TypeRule};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 1, 3)
    }

    fn config() -> Configuration {
        Configuration::with_types([
            TypeRule::new("standard", "std").milestone(MilestoneTemplate::new("Kickoff", 5)),
            TypeRule::new("signature", "sig").milestone(MilestoneTemplate::new("Kickoff", 10)),
        ])
        .sales_alias("jd", "John Doe")
    }

    /// Input row with the standard column layout (B, C, D, G, L, O, P)
    fn row(sales: &str, kind: &str, client: &str, lot: &str, when: &str, shot: &str, build: &str) -> Vec<String> {
        let mut cells = vec![String::new(); 16];
        cells[1] = sales.into();
        cells[2] = kind.into();
        cells[3] = client.into();
        cells[6] = lot.into();
        cells[11] = when.into();
        cells[14] = shot.into();
        cells[15] = build.into();
        cells
    }

    fn extract(rows: Vec<Vec<String>>) -> InputBatch {
        let grid = Grid::from_strings(rows);
        extract_rows(Some(&grid), &config(), &Settings::default(), today()).unwrap()
    }

    #[test]
    fn normalizes_a_full_row() {
        let batch = extract(vec![
            row("Sales", "Type", "Client", "Lot", "Presentation Date", "Shot", "Build"),
            row(" JD ", "SIG", " Acme Homes ", " L-17 ", "1/17/24", "Y", "w"),
        ]);

        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.get("L-17").unwrap(),
            &InputRecord {
                lot: "L-17".into(),
                type_key: "signature".into(),
                sales_person: "John Doe".into(),
                client: "Acme Homes".into(),
                presentation_date: date(2024, 1, 17),
                shot_grade: "Yes".into(),
                build_type: "White Glove".into(),
            }
        );
    }

    #[test]
    fn salesperson_and_type_fallbacks() {
        let batch = extract(vec![
            row("john doe", "warehouse", "A", "1", "2/1/24", "", ""),
            row("Unknown", "", "B", "2", "2/2/24", "n", "t"),
            row("", "std", "C", "3", "2/5/24", "maybe", "x"),
        ]);

        let first = batch.get("1").unwrap();
        assert_eq!(first.sales_person, "John Doe");
        assert_eq!(first.type_key, "standard");
        assert_eq!(first.shot_grade, "Not Specified");
        assert_eq!(first.build_type, "Not Specified");

        let second = batch.get("2").unwrap();
        assert_eq!(second.sales_person, "Not Assigned");
        assert_eq!(second.shot_grade, "No");
        assert_eq!(second.build_type, "Traditional");

        let third = batch.get("3").unwrap();
        assert_eq!(third.sales_person, "Not Assigned");
        assert_eq!(third.shot_grade, "Unknown Shot Grade Type");
        assert_eq!(third.build_type, "Unknown Build Type");
    }

    #[test]
    fn rows_outside_window_are_dropped() {
        let batch = extract(vec![
            row("jd", "std", "past", "past", "12/1/23", "", ""),
            row("jd", "std", "today", "today", "1/3/24", "", ""),
            row("jd", "std", "soon", "soon", "1/4/24", "", ""),
            row("jd", "std", "edge", "edge", "1/2/26", "", ""),
            row("jd", "std", "last", "last", "1/3/26", "", ""),
            row("jd", "std", "far", "far", "1/4/26", "", ""),
            row("jd", "std", "way", "way", "6/1/27", "", ""),
        ]);

        let lots: Vec<&str> = batch.iter().map(|r| r.lot.as_str()).collect();
        assert_eq!(lots, vec!["soon", "edge", "last"]);
    }

    #[test]
    fn blank_and_garbage_dates_are_dropped() {
        let batch = extract(vec![
            row("jd", "std", "a", "blank", "   ", "", ""),
            row("jd", "std", "b", "garbage", "next week", "", ""),
            row("jd", "std", "c", "bad-day", "2/30/24", "", ""),
            row("jd", "std", "d", "ok", "2/29/24", "", ""),
        ]);
        assert_eq!(batch.len(), 1);
        assert!(batch.get("ok").is_some());
    }

    #[test]
    fn short_rows_without_date_column_are_skipped() {
        let grid = Grid::from_strings([vec!["only", "three", "cells"]]);
        let batch = extract_rows(Some(&grid), &config(), &Settings::default(), today()).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn duplicate_lots_keep_the_later_row() {
        let batch = extract(vec![
            row("jd", "std", "First", "L-1", "3/1/24", "", ""),
            row("jd", "std", "Other", "L-2", "3/2/24", "", ""),
            row("jd", "sig", "Second", "L-1", "3/4/24", "", ""),
        ]);
        assert_eq!(batch.len(), 2);
        let l1 = batch.get("L-1").unwrap();
        assert_eq!(l1.client, "Second");
        assert_eq!(l1.type_key, "signature");
        assert_eq!(l1.presentation_date, date(2024, 3, 4));
    }

    #[test]
    fn missing_input_sheet() {
        let err = extract_rows(None, &config(), &Settings::default(), today()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sheet Potential does not exist in the workbook or is empty."
        );
    }

    #[test]
    fn typed_date_cells() {
        let mut grid = Grid::default();
        grid.set(0, 6, CellValue::text("typed"));
        grid.set(0, 11, CellValue::Date(date(2024, 5, 6)));
        grid.set(1, 6, CellValue::text("serial"));
        grid.set(1, 11, CellValue::Number(45412.0)); // 2024-04-30
        grid.set(2, 6, CellValue::Number(1001.0));
        grid.set(2, 11, CellValue::text("5/7"));

        let batch = extract_rows(Some(&grid), &config(), &Settings::default(), today()).unwrap();
        assert_eq!(batch.get("typed").unwrap().presentation_date, date(2024, 5, 6));
        assert_eq!(batch.get("serial").unwrap().presentation_date, date(2024, 4, 30));
        // Numeric lot cells render without a fractional part
        assert_eq!(batch.get("1001").unwrap().presentation_date, date(2024, 5, 7));
    }

    #[test]
    fn huge_serial_numbers_are_dropped() {
        let mut grid = Grid::default();
        grid.set(0, 6, CellValue::text("huge"));
        grid.set(0, 11, CellValue::Number(1e20));
        grid.set(1, 6, CellValue::text("ok"));
        grid.set(1, 11, CellValue::Number(45412.0));

        let batch = extract_rows(Some(&grid), &config(), &Settings::default(), today()).unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.get("ok").is_some());
        assert_eq!(parse_presentation_date(&CellValue::Number(1e20), today()), None);
    }

    #[test]
    fn date_text_formats() {
        let t = today();
        let parse = |s: &str| parse_presentation_date(&CellValue::text(s), t);
        assert_eq!(parse("1/17/24"), Some(date(2024, 1, 17)));
        assert_eq!(parse("01/17/2024"), Some(date(2024, 1, 17)));
        assert_eq!(parse(" 3/5 "), Some(date(2024, 3, 5)));
        assert_eq!(parse("3/5/68"), Some(date(2068, 3, 5)));
        assert_eq!(parse("3/5/69"), Some(date(1969, 3, 5)));
        assert_eq!(parse("13/5/24"), None);
        assert_eq!(parse("3/5/123"), None);
        assert_eq!(parse("3-5-24"), None);
        assert_eq!(parse("3/x/24"), None);
        assert_eq!(parse_presentation_date(&CellValue::Bool(true), t), None);
    }

    #[test]
    fn window_bounds() {
        let window = SchedulingWindow::new(date(2024, 2, 29), 2);
        assert_eq!(window.end, date(2026, 2, 28));
        assert!(!window.contains(date(2024, 2, 29)));
        assert!(window.contains(date(2024, 3, 1)));
        assert!(window.contains(date(2026, 2, 27)));
        assert!(window.contains(date(2026, 2, 28)));
        assert!(!window.contains(date(2026, 3, 1)));

        let window = SchedulingWindow::new(date(2024, 1, 3), 2);
        assert!(window.contains(date(2026, 1, 3)));
    }

    #[test]
    fn code_normalization() {
        assert_eq!(normalize_shot_grade(" Y ", "-"), "Yes");
        assert_eq!(normalize_shot_grade("N", "-"), "No");
        assert_eq!(normalize_shot_grade("  ", "-"), "-");
        assert_eq!(normalize_build_type("S", "-"), "Signature");
        assert_eq!(normalize_build_type("T", "-"), "Traditional");
        assert_eq!(normalize_build_type(" W", "-"), "White Glove");
        assert_eq!(normalize_build_type("custom", "-"), "Unknown Build Type");
    }
}

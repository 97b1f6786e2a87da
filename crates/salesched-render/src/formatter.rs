//! Output formatter
//!
//! Builds the final table from a schedule: a header row, then one row per
//! lot sorted by configured type order and presentation date. Dates stay
//! `NaiveDate` through the sort and are rendered as text only at the end.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write as _;
use salesched_core::{
    Configuration, OutputGrid, RenderError, Schedule, ScheduleEntry, ScheduleError, Settings,
};
use tracing::debug;

/// Fixed leading output columns
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "Lot",
    "Client",
    "Salesperson",
    "Type",
    "Shot Grade",
    "Build Type",
];

/// Trailing output column
pub const PRESENTATION_DATE_COLUMN: &str = "Presentation Date";

/// Format a schedule into the output grid.
///
/// Milestone columns are taken from the first entry; every entry of a
/// schedule derives from the same configuration and so shares them.
pub fn format_schedule(
    schedule: &Schedule,
    config: &Configuration,
    settings: &Settings,
) -> Result<OutputGrid, ScheduleError> {
    let first = schedule.entries.first().ok_or(ScheduleError::EmptySchedule)?;
    let date_format = date_items(&settings.output_date_format)?;

    let header: Vec<String> = OUTPUT_COLUMNS
        .iter()
        .map(|c| (*c).to_string())
        .chain(first.milestones.iter().map(|m| m.name.clone()))
        .chain(std::iter::once(PRESENTATION_DATE_COLUMN.to_string()))
        .collect();
    let milestone_count = first.milestones.len();

    let mut entries: Vec<&ScheduleEntry> = schedule.entries.iter().collect();
    // slice::sort_by_key is stable
    entries.sort_by_key(|e| (config.order_of(&e.record.type_key), e.record.presentation_date));

    let format_date = |date: NaiveDate| render_date(date, &date_format, &settings.output_date_format);
    let rows = entries
        .into_iter()
        .map(|entry| -> Result<Vec<String>, ScheduleError> {
            let record = &entry.record;
            let mut row = vec![
                record.lot.clone(),
                record.client.clone(),
                record.sales_person.clone(),
                record.type_key.clone(),
                record.shot_grade.clone(),
                record.build_type.clone(),
            ];
            for index in 0..milestone_count {
                let cell = match entry.milestones.get(index) {
                    Some(milestone) => format_date(milestone.date)?,
                    None => String::new(),
                };
                row.push(cell);
            }
            row.push(format_date(record.presentation_date)?);
            Ok(row)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(columns = header.len(), rows = rows.len(), "formatted output grid");
    Ok(OutputGrid { header, rows })
}

/// Parse a strftime pattern up front so a bad pattern is an error, not a panic.
///
/// Time fields (`%H`, `%M`, ...) parse but cannot be rendered
/// from a bare date, so the pattern is also tried on one date.
fn date_items(pattern: &str) -> Result<Vec<Item<'_>>, ScheduleError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid_format(pattern));
    }
    render_date(NaiveDate::default(), &items, pattern)?;
    Ok(items)
}

fn render_date(date: NaiveDate, items: &[Item<'_>], pattern: &str) -> Result<String, ScheduleError> {
    let mut out = String::new();
    write!(out, "{}", date.format_with_items(items.iter())).map_err(|_| invalid_format(pattern))?;
    Ok(out)
}

fn invalid_format(pattern: &str) -> ScheduleError {
    RenderError::Format(format!("invalid date format \"{pattern}\"")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use salesched_core::{InputRecord, ScheduledMilestone, TypeRule};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn entry(lot: &str, type_key: &str, presentation: NaiveDate) -> ScheduleEntry {
        ScheduleEntry {
            record: InputRecord {
                lot: lot.into(),
                type_key: type_key.into(),
                sales_person: "John Doe".into(),
                client: format!("Client {lot}"),
                presentation_date: presentation,
                shot_grade: "Yes".into(),
                build_type: "Traditional".into(),
            },
            milestones: vec![
                ScheduledMilestone { name: "Design".into(), date: presentation - chrono::Days::new(7) },
                ScheduledMilestone { name: "Walk".into(), date: presentation - chrono::Days::new(1) },
            ],
        }
    }

    fn config() -> Configuration {
        Configuration::with_types([
            TypeRule::new("standard", "std"),
            TypeRule::new("signature", "sig"),
        ])
    }

    fn lots(grid: &OutputGrid) -> Vec<&str> {
        grid.rows.iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn header_layout() {
        let schedule = Schedule { entries: vec![entry("L-1", "standard", date(2024, 3, 14))] };
        let grid = format_schedule(&schedule, &config(), &Settings::default()).unwrap();
        assert_eq!(
            grid.header,
            vec![
                "Lot", "Client", "Salesperson", "Type", "Shot Grade", "Build Type", "Design",
                "Walk", "Presentation Date",
            ]
        );
        assert_eq!(
            grid.rows[0],
            vec![
                "L-1", "Client L-1", "John Doe", "standard", "Yes", "Traditional", "03/07/2024",
                "03/13/2024", "03/14/2024",
            ]
        );
    }

    #[test]
    fn sorted_by_type_order_then_date() {
        let schedule = Schedule {
            entries: vec![
                entry("sig-late", "signature", date(2024, 5, 1)),
                entry("std-late", "standard", date(2024, 4, 1)),
                entry("sig-early", "signature", date(2024, 2, 1)),
                entry("std-early", "standard", date(2024, 3, 1)),
            ],
        };
        let grid = format_schedule(&schedule, &config(), &Settings::default()).unwrap();
        assert_eq!(lots(&grid), vec!["std-early", "std-late", "sig-early", "sig-late"]);
    }

    #[test]
    fn dates_sort_chronologically_not_lexically() {
        // "01/05/2025" sorts before "12/01/2024" as text
        let schedule = Schedule {
            entries: vec![
                entry("next-year", "standard", date(2025, 1, 5)),
                entry("this-year", "standard", date(2024, 12, 1)),
            ],
        };
        let grid = format_schedule(&schedule, &config(), &Settings::default()).unwrap();
        assert_eq!(lots(&grid), vec!["this-year", "next-year"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let when = date(2024, 6, 3);
        let schedule = Schedule {
            entries: vec![
                entry("b", "standard", when),
                entry("a", "standard", when),
                entry("c", "standard", when),
            ],
        };
        let grid = format_schedule(&schedule, &config(), &Settings::default()).unwrap();
        assert_eq!(lots(&grid), vec!["b", "a", "c"]);
    }

    #[test]
    fn unknown_types_sort_last() {
        let schedule = Schedule {
            entries: vec![
                entry("odd", "custom", date(2024, 1, 10)),
                entry("sig", "signature", date(2024, 6, 1)),
            ],
        };
        let grid = format_schedule(&schedule, &config(), &Settings::default()).unwrap();
        assert_eq!(lots(&grid), vec!["sig", "odd"]);
    }

    #[test]
    fn empty_schedule_is_an_error() {
        let err = format_schedule(&Schedule::default(), &config(), &Settings::default())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::EmptySchedule));
    }

    #[test]
    fn custom_date_format() {
        let settings = Settings {
            output_date_format: "%Y-%m-%d".into(),
            ..Settings::default()
        };
        let schedule = Schedule { entries: vec![entry("L-1", "standard", date(2024, 3, 14))] };
        let grid = format_schedule(&schedule, &config(), &settings).unwrap();
        assert_eq!(grid.rows[0][8], "2024-03-14");
    }

    #[test]
    fn invalid_date_format_is_reported() {
        let settings = Settings {
            output_date_format: "%Q".into(),
            ..Settings::default()
        };
        let schedule = Schedule { entries: vec![entry("L-1", "standard", date(2024, 3, 14))] };
        let err = format_schedule(&schedule, &config(), &settings).unwrap_err();
        assert!(err.to_string().contains("%Q"), "{err}");
    }

    #[test]
    fn time_fields_in_date_format_are_reported() {
        let schedule = Schedule { entries: vec![entry("L-1", "standard", date(2024, 3, 14))] };
        for pattern in ["%m/%d/%Y %H:%M", "%H"] {
            let settings = Settings {
                output_date_format: pattern.into(),
                ..Settings::default()
            };
            let err = format_schedule(&schedule, &config(), &settings).unwrap_err();
            assert!(
                matches!(err, ScheduleError::Render(RenderError::Format(ref m)) if m.contains(pattern)),
                "{err}"
            );
        }
    }
}

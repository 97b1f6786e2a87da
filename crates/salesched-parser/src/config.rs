//! Configuration sheet parsing
//!
//! Layout of the parameter sheet:
//!
//! ```text
//! |           |       | Design Review |         | Final Walk |         |
//! | Type      | Alias | Days          | Weekday | Days       | Weekday |
//! | standard  | std   | 10            |         | 3          | 5       |
//! | signature | sig   | 20            | 1       | 5          |         |
//! ```
//!
//! Milestone names are the text cells of the first row, so the key and alias
//! labels belong in the second row. Each milestone owns a
//! pair of columns starting at column C: workdays before the presentation
//! date, then an optional ISO weekday (1 = Monday .. 7 = Sunday).

use salesched_core::calendar::weekday_from_iso;
use salesched_core::{
    CellValue, Configuration, Grid, MilestoneTemplate, ScheduleError, Settings, TypeRule,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::workbook::GridSource;

/// First row holding a type definition
const FIRST_TYPE_ROW: usize = 2;
/// First column of the milestone column pairs
const FIRST_MILESTONE_COLUMN: usize = 2;

/// Parse the type rules and sales aliases named in `settings`
pub fn parse_configuration(
    source: &dyn GridSource,
    settings: &Settings,
) -> Result<Configuration, ScheduleError> {
    let mut config = parse_type_rules(
        source.read_grid(&settings.parameter_sheet),
        &settings.parameter_sheet,
    )?;
    config.sales_aliases = parse_sales_aliases(
        source.read_grid(&settings.sales_alias_sheet),
        &settings.sales_alias_sheet,
    )?;

    info!(
        types = config.types.len(),
        default_type = %config.default_type_key,
        aliases = config.sales_aliases.len(),
        "parsed configuration"
    );
    Ok(config)
}

/// Parse the type/milestone rule sheet.
///
/// The returned configuration has no sales aliases.
pub fn parse_type_rules(grid: Option<&Grid>, sheet: &str) -> Result<Configuration, ScheduleError> {
    let grid = require_sheet(grid, sheet)?;

    let milestone_names: Vec<String> = grid
        .row(0)
        .unwrap_or_default()
        .iter()
        .filter_map(CellValue::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    let type_rows: Vec<usize> = (FIRST_TYPE_ROW..grid.height())
        .filter(|&row| !lowered(grid.cell(row, 0)).is_empty())
        .collect();

    if milestone_names.is_empty() || type_rows.is_empty() {
        return Err(ScheduleError::NotEnoughInput {
            sheet: sheet.to_string(),
        });
    }

    let mut config = Configuration::default();
    for (order, &row) in type_rows.iter().enumerate() {
        let key = lowered(grid.cell(row, 0));
        if config.types.contains_key(&key) {
            return Err(ScheduleError::DuplicateType {
                sheet: sheet.to_string(),
                row,
                key,
            });
        }

        let mut rule = TypeRule::new(key.as_str(), lowered(grid.cell(row, 1)));
        rule.order = order;
        for (index, name) in milestone_names.iter().enumerate() {
            let column = index * 2 + FIRST_MILESTONE_COLUMN;
            rule.milestones
                .push(parse_milestone(grid, sheet, row, column, name)?);
        }

        debug!(
            key = %rule.key,
            alias = %rule.alias,
            order,
            milestones = rule.milestones.len(),
            "parsed type rule"
        );
        if order == 0 {
            config.default_type_key = key.clone();
        }
        config.types.insert(key, rule);
    }

    Ok(config)
}

/// Parse the salesperson alias sheet.
///
/// The header row is skipped. Aliases are keyed lowercase; names are kept
/// exactly as written.
pub fn parse_sales_aliases(
    grid: Option<&Grid>,
    sheet: &str,
) -> Result<BTreeMap<String, String>, ScheduleError> {
    let grid = require_sheet(grid, sheet)?;

    let mut aliases = BTreeMap::new();
    for row in 1..grid.height() {
        let alias = lowered(grid.cell(row, 0));
        if alias.is_empty() {
            continue;
        }
        let name = grid.cell(row, 1).as_text();
        debug!(%alias, %name, "sales alias");
        aliases.insert(alias, name);
    }
    Ok(aliases)
}

fn parse_milestone(
    grid: &Grid,
    sheet: &str,
    row: usize,
    column: usize,
    name: &str,
) -> Result<MilestoneTemplate, ScheduleError> {
    let offset_cell = grid.cell(row, column);
    let workdays = offset_cell
        .as_integer()
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ScheduleError::InvalidMilestoneOffset {
            sheet: sheet.to_string(),
            row,
            column,
            value: offset_cell.as_text(),
        })?;

    let mut template = MilestoneTemplate::new(name, workdays);

    let day_cell = grid.cell(row, column + 1);
    if !day_cell.is_blank() {
        let weekday = day_cell
            .as_integer()
            .and_then(|n| u32::try_from(n).ok())
            .and_then(weekday_from_iso)
            .ok_or_else(|| ScheduleError::InvalidSpecificDay {
                sheet: sheet.to_string(),
                row,
                column: column + 1,
                value: day_cell.as_text(),
            })?;
        template = template.on(weekday);
    }

    Ok(template)
}

fn require_sheet<'a>(grid: Option<&'a Grid>, sheet: &str) -> Result<&'a Grid, ScheduleError> {
    grid.filter(|g| !g.is_empty())
        .ok_or_else(|| ScheduleError::MissingSheet {
            sheet: sheet.to_string(),
        })
}

fn lowered(cell: &CellValue) -> String {
    cell.as_text().trim().to_lowercase()
}

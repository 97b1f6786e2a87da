//! # salesched-core
//!
//! Core domain model for the salesched schedule derivation engine.
//!
//! This crate provides:
//! - Domain types: `Configuration`, `TypeRule`, `MilestoneTemplate`,
//!   `InputRecord`, `ScheduleEntry`, `OutputGrid`
//! - The tagged spreadsheet cell value (`CellValue`) and `Grid`
//! - Weekday arithmetic for milestone dates (`calendar`)
//! - The immutable `Settings` record
//! - Error types and the `Scheduler` / `Renderer` traits
//!
//! ## Example
//!
//! ```rust
//! use salesched_core::{Configuration, MilestoneTemplate, TypeRule};
//!
//! let config = Configuration::with_types([
//!     TypeRule::new("standard", "std")
//!         .milestone(MilestoneTemplate::new("Design Review", 10)),
//!     TypeRule::new("signature", "sig")
//!         .milestone(MilestoneTemplate::new("Design Review", 15)),
//! ])
//! .sales_alias("jd", "John Doe");
//!
//! assert_eq!(config.default_type_key, "standard");
//! assert_eq!(config.resolve_type("SIG"), "signature");
//! assert_eq!(config.resolve_sales_person("jd"), Some("John Doe"));
//! ```

pub mod calendar;
pub mod cell;
pub mod settings;

pub use cell::{cell_reference, column_letter, CellValue, Grid};
pub use settings::{InputColumns, Settings};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Canonical (lowercase) identifier of a lead type
pub type TypeKey = String;

/// Identifier of a scheduling subject
pub type Lot = String;

// ============================================================================
// Configuration
// ============================================================================

/// A milestone rule: how far before the presentation date it falls
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneTemplate {
    /// Column header from the configuration sheet
    pub name: String,
    /// Number of Monday-Friday days before the presentation date
    pub workdays_before: u32,
    /// Weekday the milestone is snapped back onto, if any
    pub specific_weekday: Option<Weekday>,
}

impl MilestoneTemplate {
    pub fn new(name: impl Into<String>, workdays_before: u32) -> Self {
        Self {
            name: name.into(),
            workdays_before,
            specific_weekday: None,
        }
    }

    /// Pin the milestone to a weekday (applied after the workday offset)
    pub fn on(mut self, weekday: Weekday) -> Self {
        self.specific_weekday = Some(weekday);
        self
    }
}

/// Milestone rules for one lead type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    /// Canonical lowercase key
    pub key: TypeKey,
    /// Lowercase alternative spelling accepted in the input sheet
    pub alias: String,
    /// Output sort precedence (declaration order, 0-based)
    pub order: usize,
    /// Milestone templates in configuration column order
    pub milestones: Vec<MilestoneTemplate>,
}

impl TypeRule {
    pub fn new(key: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            key: key.into().trim().to_lowercase(),
            alias: alias.into().trim().to_lowercase(),
            order: 0,
            milestones: Vec::new(),
        }
    }

    pub fn milestone(mut self, template: MilestoneTemplate) -> Self {
        self.milestones.push(template);
        self
    }

    /// True if `lowered` names this type by key or alias
    pub fn matches(&self, lowered: &str) -> bool {
        self.key == lowered || (!self.alias.is_empty() && self.alias == lowered)
    }
}

/// Parsed rule set for one conversion run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Key of the first declared type; fallback for unrecognized input
    pub default_type_key: TypeKey,
    /// Type rules indexed by key
    pub types: HashMap<TypeKey, TypeRule>,
    /// Lowercased alias -> canonical salesperson display name
    pub sales_aliases: BTreeMap<String, String>,
}

impl Configuration {
    /// Build a configuration from rules in declaration order.
    ///
    /// The first rule becomes the default type and `order` is reassigned
    /// from the iteration position. A later rule with an existing key
    /// replaces the earlier one.
    pub fn with_types(rules: impl IntoIterator<Item = TypeRule>) -> Self {
        let mut config = Self::default();
        for (order, mut rule) in rules.into_iter().enumerate() {
            rule.order = order;
            if order == 0 {
                config.default_type_key = rule.key.clone();
            }
            config.types.insert(rule.key.clone(), rule);
        }
        config
    }

    /// Register a salesperson alias
    pub fn sales_alias(mut self, alias: impl AsRef<str>, name: impl Into<String>) -> Self {
        self.sales_aliases
            .insert(alias.as_ref().trim().to_lowercase(), name.into());
        self
    }

    pub fn get_type(&self, key: &str) -> Option<&TypeRule> {
        self.types.get(key)
    }

    /// The rule used when an input names no known type
    pub fn default_type(&self) -> Option<&TypeRule> {
        self.types.get(&self.default_type_key)
    }

    /// Type rules sorted by declaration order
    pub fn types_in_order(&self) -> Vec<&TypeRule> {
        let mut rules: Vec<&TypeRule> = self.types.values().collect();
        rules.sort_by_key(|r| r.order);
        rules
    }

    /// Sort precedence of a type key; unknown keys sort last
    pub fn order_of(&self, key: &str) -> usize {
        self.types.get(key).map_or(usize::MAX, |r| r.order)
    }

    /// Map a raw input cell to a type key.
    ///
    /// Matches keys and aliases case-insensitively, earliest declared type
    /// first. Anything unmatched resolves to the default type.
    pub fn resolve_type(&self, raw: &str) -> &str {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return &self.default_type_key;
        }
        self.types_in_order()
            .into_iter()
            .find(|r| r.matches(&lowered))
            .map_or(self.default_type_key.as_str(), |r| r.key.as_str())
    }

    /// Map a raw salesperson cell to a canonical name.
    ///
    /// An alias resolves to its name; a value already equal to a canonical
    /// name (ignoring case) resolves to that name. `None` if neither.
    pub fn resolve_sales_person(&self, raw: &str) -> Option<&str> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        if let Some(name) = self.sales_aliases.get(&lowered) {
            return Some(name.as_str());
        }
        self.sales_aliases
            .values()
            .find(|name| name.trim().to_lowercase() == lowered)
            .map(|name| name.as_str())
    }
}

// ============================================================================
// Input
// ============================================================================

/// A normalized, schedulable row of the input sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub lot: Lot,
    pub type_key: TypeKey,
    pub sales_person: String,
    pub client: String,
    pub presentation_date: NaiveDate,
    pub shot_grade: String,
    pub build_type: String,
}

/// Input records keyed by lot.
///
/// Inserting a lot that is already present replaces the stored record in
/// place; iteration follows the order in which lots were first seen.
#[derive(Clone, Debug, Default)]
pub struct InputBatch {
    records: Vec<InputRecord>,
    index: HashMap<Lot, usize>,
}

impl InputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the record it replaced
    pub fn insert(&mut self, record: InputRecord) -> Option<InputRecord> {
        match self.index.get(&record.lot) {
            Some(&slot) => Some(std::mem::replace(&mut self.records[slot], record)),
            None => {
                self.index.insert(record.lot.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, lot: &str) -> Option<&InputRecord> {
        self.index.get(lot).map(|&slot| &self.records[slot])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a InputBatch {
    type Item = &'a InputRecord;
    type IntoIter = std::slice::Iter<'a, InputRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<InputRecord> for InputBatch {
    fn from_iter<I: IntoIterator<Item = InputRecord>>(iter: I) -> Self {
        let mut batch = Self::new();
        for record in iter {
            batch.insert(record);
        }
        batch
    }
}

// ============================================================================
// Schedule (Result)
// ============================================================================

/// A milestone with its computed date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMilestone {
    pub name: String,
    pub date: NaiveDate,
}

/// One scheduled lot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// The input row this entry was derived from
    pub record: InputRecord,
    /// Milestones in template order
    pub milestones: Vec<ScheduledMilestone>,
}

/// The result of scheduling an input batch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Entries in input batch order
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Final formatted table handed to an output sink
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputGrid {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputGrid {
    /// Header followed by data rows
    pub fn lines(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }

    pub fn column_count(&self) -> usize {
        self.lines().map(Vec::len).max().unwrap_or(0)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Milestone scheduling
pub trait Scheduler {
    /// Compute milestone dates for every record in the batch
    fn schedule(&self, batch: &InputBatch, config: &Configuration) -> Schedule;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a formatted schedule grid to the output format
    fn render(&self, grid: &OutputGrid) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Conversion error, shown verbatim to the end user
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Sheet {sheet} does not exist in the workbook or is empty.")]
    MissingSheet { sheet: String },

    #[error("Not enough milestones or types in sheet {sheet}.")]
    NotEnoughInput { sheet: String },

    #[error(
        "Day offset is not a positive number. Sheet {sheet}, cell {}. Given \"{value}\".",
        cell_at(.row, .column)
    )]
    InvalidMilestoneOffset {
        sheet: String,
        row: usize,
        column: usize,
        value: String,
    },

    #[error(
        "Specific day is not a number 1-7. Sheet {sheet}, cell {}. Given \"{value}\".",
        cell_at(.row, .column)
    )]
    InvalidSpecificDay {
        sheet: String,
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Type \"{key}\" is defined more than once. Sheet {sheet}, row {}.", .row + 1)]
    DuplicateType {
        sheet: String,
        row: usize,
        key: String,
    },

    #[error("No rows have a presentation date inside the scheduling window.")]
    EmptySchedule,

    #[error("Could not read workbook: {0}")]
    Workbook(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

fn cell_at(row: &usize, column: &usize) -> String {
    cell_reference(*row, *column)
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

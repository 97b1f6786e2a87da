//! # salesched-solver
//!
//! Turns normalized input records into dated milestones.
//!
//! Each record is joined with its type's milestone templates and every
//! template is evaluated against the record's presentation date with the
//! weekday arithmetic in `salesched_core::calendar`.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use salesched_core::{
//!     Configuration, InputBatch, InputRecord, MilestoneTemplate, Scheduler, TypeRule,
//! };
//! use salesched_solver::MilestoneSolver;
//!
//! let config = Configuration::with_types([
//!     TypeRule::new("standard", "std").milestone(MilestoneTemplate::new("Design", 5)),
//! ]);
//! let mut batch = InputBatch::new();
//! batch.insert(InputRecord {
//!     lot: "L-1".into(),
//!     type_key: "standard".into(),
//!     sales_person: "John Doe".into(),
//!     client: "Acme".into(),
//!     presentation_date: NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
//!     shot_grade: "Yes".into(),
//!     build_type: "Signature".into(),
//! });
//!
//! let schedule = MilestoneSolver::new().schedule(&batch, &config);
//! assert_eq!(
//!     schedule.entries[0].milestones[0].date,
//!     NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
//! );
//! ```

use salesched_core::calendar::milestone_date;
use salesched_core::{
    Configuration, InputBatch, InputRecord, Schedule, ScheduleEntry, ScheduledMilestone,
    Scheduler, TypeRule,
};
use tracing::{debug, info, warn};

/// Workday-offset milestone scheduler
#[derive(Clone, Debug, Default)]
pub struct MilestoneSolver;

impl MilestoneSolver {
    pub fn new() -> Self {
        Self
    }

    /// Schedule a single record against its type rule
    pub fn schedule_record(&self, record: &InputRecord, rule: &TypeRule) -> ScheduleEntry {
        let milestones = rule
            .milestones
            .iter()
            .map(|template| ScheduledMilestone {
                name: template.name.clone(),
                date: milestone_date(record.presentation_date, template),
            })
            .collect();

        ScheduleEntry {
            record: record.clone(),
            milestones,
        }
    }
}

impl Scheduler for MilestoneSolver {
    fn schedule(&self, batch: &InputBatch, config: &Configuration) -> Schedule {
        let mut entries = Vec::with_capacity(batch.len());

        for record in batch {
            let rule = match config.get_type(&record.type_key) {
                Some(rule) => rule,
                None => {
                    warn!(
                        lot = %record.lot,
                        type_key = %record.type_key,
                        "unknown type; using the default type's milestones"
                    );
                    match config.default_type() {
                        Some(rule) => rule,
                        None => continue,
                    }
                }
            };

            let entry = self.schedule_record(record, rule);
            debug!(lot = %record.lot, milestones = entry.milestones.len(), "scheduled lot");
            entries.push(entry);
        }

        info!(entries = entries.len(), "assembled schedule");
        Schedule { entries }
    }
}

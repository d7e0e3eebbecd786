// Multi-season projection: surplus of a constant projected value against each
// season of a salary schedule.

use serde::Serialize;

use crate::model::{SalarySchedule, Season};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub season: Season,
    pub projected_value: Option<f64>,
    /// `None` for an unsigned (free agent) season.
    pub salary: Option<f64>,
    /// `projected_value - salary`, only when both are known.
    pub surplus: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionTable {
    pub rows: Vec<ProjectionRow>,
    /// Sum of the known per-season surpluses.
    pub total_surplus: f64,
}

/// Project `projected_value` across every season of `schedule`.
///
/// The projected value is the same for all seasons; it is not re-derived per
/// season. Seasons without a salary contribute no surplus: free agency is not
/// a zero-cost season.
pub fn project(schedule: &SalarySchedule, projected_value: Option<f64>) -> ProjectionTable {
    let mut total_surplus = 0.0;
    let rows = schedule
        .iter()
        .map(|(season, salary)| {
            let surplus = match (projected_value, salary) {
                (Some(value), Some(salary)) => Some(value - salary),
                _ => None,
            };
            if let Some(s) = surplus {
                total_surplus += s;
            }
            ProjectionRow {
                season,
                projected_value,
                salary,
                surplus,
            }
        })
        .collect();

    ProjectionTable { rows, total_surplus }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

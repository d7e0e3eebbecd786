// Canonical player records and salary schedules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// A season identified by the calendar year it starts in (2025 = "2025-26").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season(u16);

impl Season {
    pub const fn new(start_year: u16) -> Self {
        Season(start_year)
    }

    pub fn start_year(self) -> u16 {
        self.0
    }

    /// Column label used by the salary dataset, e.g. `2025-26`.
    pub fn label(self) -> String {
        format!("{}-{:02}", self.0, (self.0 % 100 + 1) % 100)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The contract window covered by the salary dataset, in ascending order.
/// The first entry is the current season.
pub const SALARY_WINDOW: [Season; 4] = [
    Season::new(2025),
    Season::new(2026),
    Season::new(2027),
    Season::new(2028),
];

// ---------------------------------------------------------------------------
// Salary schedule
// ---------------------------------------------------------------------------

/// Per-season salaries. `None` marks a season with no contract (free agency),
/// which is not the same thing as a zero salary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalarySchedule(BTreeMap<Season, Option<f64>>);

impl SalarySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, season: Season, salary: Option<f64>) {
        self.0.insert(season, salary);
    }

    /// Salary for `season`, or `None` if unsigned or outside the schedule.
    pub fn salary(&self, season: Season) -> Option<f64> {
        self.0.get(&season).copied().flatten()
    }

    /// Salary for the first season of the contract window.
    pub fn current(&self) -> Option<f64> {
        self.salary(SALARY_WINDOW[0])
    }

    /// Seasons in ascending order with their salaries.
    pub fn iter(&self) -> impl Iterator<Item = (Season, Option<f64>)> + '_ {
        self.0.iter().map(|(season, salary)| (*season, *salary))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Season, Option<f64>)> for SalarySchedule {
    fn from_iter<I: IntoIterator<Item = (Season, Option<f64>)>>(iter: I) -> Self {
        SalarySchedule(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Player record
// ---------------------------------------------------------------------------

/// A merged player: performance data joined with an optional salary schedule.
///
/// Built once per load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub team: Option<String>,
    pub impact_score: Option<f64>,
    pub minutes_per_game: Option<f64>,
    /// `None` when no salary row matched this player.
    pub salary_schedule: Option<SalarySchedule>,
}

impl PlayerRecord {
    /// Current-season salary, if the player has a schedule and a salary for it.
    pub fn current_salary(&self) -> Option<f64> {
        self.salary_schedule.as_ref().and_then(SalarySchedule::current)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

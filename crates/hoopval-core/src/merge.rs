// Dataset merge: performance rows left-joined with salary rows on player id.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::model::{PlayerRecord, SalarySchedule};
use crate::normalize::{CanonicalRow, PerformanceRow, SalaryRow};

/// Build the id -> schedule lookup. Rows without a usable id are skipped.
/// On duplicate ids the last row wins.
pub fn salary_index(rows: &[SalaryRow]) -> HashMap<String, SalarySchedule> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let Some(id) = row.id.as_ref() else {
            debug!("skipping salary row without player id");
            continue;
        };
        if index.insert(id.clone(), row.schedule.clone()).is_some() {
            warn!("duplicate salary row for player '{}', using latest", id);
        }
    }
    index
}

/// Merge performance and salary rows into player records.
///
/// Performance rows drive the join: salary-only ids produce nothing and a
/// missing salary row just leaves `salary_schedule` empty. A row is kept only
/// if it has an id, a name, and at least one of impact score or schedule.
/// If several kept rows share an id, the last one wins but the record stays
/// at the position of the first, so output order follows the performance
/// dataset and ids are unique.
pub fn merge_players(performance: &[PerformanceRow], salaries: &[SalaryRow]) -> Vec<PlayerRecord> {
    let salary_by_id = salary_index(salaries);

    let mut players: Vec<PlayerRecord> = Vec::with_capacity(performance.len());
    let mut position_by_id: HashMap<String, usize> = HashMap::with_capacity(performance.len());
    let mut dropped = 0usize;

    for row in performance {
        let Some(record) = build_record(row, &salary_by_id) else {
            dropped += 1;
            continue;
        };

        match position_by_id.get(&record.id) {
            Some(&pos) => {
                warn!("duplicate performance row for player '{}', using latest", record.id);
                players[pos] = record;
            }
            None => {
                position_by_id.insert(record.id.clone(), players.len());
                players.push(record);
            }
        }
    }

    info!(
        "Merged players: {} ({} performance rows, {} salary rows, {} dropped)",
        players.len(),
        performance.len(),
        salaries.len(),
        dropped
    );
    players
}

/// Normalize canonical rows from both datasets and merge them.
pub fn merge_canonical(performance: &[CanonicalRow], salaries: &[CanonicalRow]) -> Vec<PlayerRecord> {
    let performance: Vec<PerformanceRow> =
        performance.iter().map(PerformanceRow::from_canonical).collect();
    let salaries: Vec<SalaryRow> = salaries.iter().map(SalaryRow::from_canonical).collect();
    merge_players(&performance, &salaries)
}

fn build_record(
    row: &PerformanceRow,
    salary_by_id: &HashMap<String, SalarySchedule>,
) -> Option<PlayerRecord> {
    let Some(id) = row.id.clone() else {
        debug!("skipping performance row without player id");
        return None;
    };
    let Some(name) = row.name.clone() else {
        debug!("skipping player '{}': no name", id);
        return None;
    };

    let salary_schedule = salary_by_id.get(&id).cloned();
    if row.impact_score.is_none() && salary_schedule.is_none() {
        debug!("skipping player '{}': neither impact score nor salary", id);
        return None;
    }

    Some(PlayerRecord {
        id,
        name,
        team: row.team.clone(),
        impact_score: row.impact_score,
        minutes_per_game: row.minutes_per_game,
        salary_schedule,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

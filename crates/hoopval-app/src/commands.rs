// CLI command bodies. Each returns the text to print so it can be tested
// without a terminal.

use hoopval_core::config::MarketBand;
use hoopval_core::{project, Assumptions, PlayerRecord, ProjectionTable, ValuationResult};
use serde::Serialize;

use crate::report;
use crate::session::{Session, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a player argument is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Exact player id only.
    Id,
    /// Id, then exact name, then first name match.
    Text,
}

#[derive(Debug, Serialize)]
struct ValueReport<'a> {
    player: &'a PlayerRecord,
    assumptions: &'a Assumptions,
    valuation: &'a ValuationResult,
    projection: Option<&'a ProjectionTable>,
    market_band: Option<&'a MarketBand>,
}

fn find<'s>(session: &'s Session, query: &str, lookup: Lookup) -> Result<&'s PlayerRecord, SessionError> {
    match lookup {
        Lookup::Text => session.find(query),
        Lookup::Id => session
            .directory()?
            .get(query)
            .ok_or_else(|| SessionError::PlayerNotFound(query.to_string())),
    }
}

pub fn search(session: &Session, query: &str, limit: usize) -> Result<String, CommandError> {
    let results = session.directory()?.search(query.trim(), None);
    Ok(report::render_search(&results, limit))
}

pub fn value(
    session: &Session,
    query: &str,
    lookup: Lookup,
    assumptions: &Assumptions,
    json: bool,
) -> Result<String, CommandError> {
    let player = find(session, query, lookup)?;
    let valuation = session.value(player, assumptions);
    let projection = player
        .salary_schedule
        .as_ref()
        .map(|schedule| project(schedule, valuation.production_value));
    let market_band = player
        .impact_score
        .and_then(|score| session.model().market_band_for(score));

    if json {
        let payload = ValueReport {
            player,
            assumptions,
            valuation: &valuation,
            projection: projection.as_ref(),
            market_band,
        };
        return Ok(serde_json::to_string_pretty(&payload)?);
    }

    let mut out = report::render_valuation(player, &valuation, market_band);
    match &projection {
        Some(table) => out.push_str(&report::render_projection(table)),
        None => out.push_str("  No contract data.\n"),
    }
    Ok(out)
}

/// Compare the first player against each of the others in turn. A later
/// argument never resolves to the first player.
pub fn compare(
    session: &Session,
    first: &str,
    others: &[String],
    assumptions: &Assumptions,
    json: bool,
) -> Result<String, CommandError> {
    let left = session.find(first)?;
    let directory = session.directory()?;

    let mut texts = Vec::new();
    let mut comparisons = Vec::new();
    for query in others {
        let right = match directory.get(query) {
            Some(p) if p.id != left.id => p,
            _ => directory
                .search(query.trim(), Some(&left.id))
                .into_iter()
                .next()
                .ok_or_else(|| SessionError::PlayerNotFound(query.clone()))?,
        };
        let cmp = session.compare(left, right, assumptions);
        if json {
            comparisons.push(cmp);
        } else {
            texts.push(report::render_comparison(left, right, &cmp));
        }
    }

    if json {
        return Ok(serde_json::to_string_pretty(&comparisons)?);
    }
    Ok(texts.join("\n"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

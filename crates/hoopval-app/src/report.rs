// Plain-text rendering of search results, valuations and projections.

use std::fmt::Write;

use hoopval_core::config::MarketBand;
use hoopval_core::{Comparison, PlayerRecord, ProjectionTable, ValuationResult};

/// Placeholder for values that could not be computed.
pub const PLACEHOLDER: &str = "—";

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `$27.7M`, or the placeholder when absent. Ties round away from zero
/// (1,250,000 -> `$1.3M`).
pub fn money(value: Option<f64>) -> String {
    match value {
        Some(v) if v < 0.0 => format!("-${:.1}M", millions(-v)),
        Some(v) => format!("${:.1}M", millions(v)),
        None => PLACEHOLDER.to_string(),
    }
}

fn millions(v: f64) -> f64 {
    (v / 100_000.0).round() / 10.0
}

/// Like `money` but always signed: `+$1.2M`, `-$7.7M`.
pub fn signed_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 0.0 => format!("+{}", money(Some(v))),
        other => money(other),
    }
}

/// Salary cell of the projection table; unsigned seasons read "Free Agent".
pub fn salary_cell(value: Option<f64>) -> String {
    match value {
        Some(_) => money(value),
        None => "Free Agent".to_string(),
    }
}

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.2}x"))
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.1}"))
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

pub fn render_search(results: &[&PlayerRecord], limit: usize) -> String {
    if results.is_empty() {
        return "No matching players.\n".to_string();
    }
    let mut out = String::new();
    for p in results.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:<10} {:<28} {:<5} PIE {:>5}  {}",
            p.id,
            p.name,
            p.team.as_deref().unwrap_or(PLACEHOLDER),
            number(p.impact_score),
            money(p.current_salary()),
        );
    }
    if results.len() > limit {
        let _ = writeln!(out, "... {} more", results.len() - limit);
    }
    out
}

pub fn render_valuation(
    player: &PlayerRecord,
    result: &ValuationResult,
    band: Option<&MarketBand>,
) -> String {
    let mut out = String::new();
    let tier = result.tier.as_ref().map_or(PLACEHOLDER, |t| t.label.as_str());

    let _ = writeln!(
        out,
        "{} ({}) · {}",
        player.name,
        player.team.as_deref().unwrap_or(PLACEHOLDER),
        tier
    );
    let _ = writeln!(out, "  Impact score (PIE)        {}", number(player.impact_score));
    let _ = writeln!(out, "  Production value          {}", money(result.production_value));
    let _ = writeln!(out, "  Base expected salary      {}", money(result.base_expected_salary));
    let _ = writeln!(out, "  Tier-adjusted expected    {}", money(result.tier_adjusted_expected_salary));
    let _ = writeln!(out, "  Actual salary (current)   {}", money(result.actual_salary));
    let _ = writeln!(out, "  Contract surplus          {}", signed_money(result.market_surplus));
    let _ = writeln!(out, "  Impact per dollar         {}", ratio(result.impact_per_dollar));
    if let Some(band) = band {
        let _ = writeln!(out, "  Market band expectation   {}", money(Some(band.expected)));
    }
    let _ = writeln!(
        out,
        "  Contract evaluation       {} [{}]",
        result.evaluation.label,
        result.evaluation.tone.as_str()
    );
    out
}

pub fn render_projection(table: &ProjectionTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<9} {:>10} {:>12} {:>10}", "Season", "Projected", "Salary", "Surplus");
    for row in &table.rows {
        let _ = writeln!(
            out,
            "  {:<9} {:>10} {:>12} {:>10}",
            row.season.label(),
            money(row.projected_value),
            salary_cell(row.salary),
            row.surplus.map_or_else(|| PLACEHOLDER.to_string(), |s| signed_money(Some(s))),
        );
    }
    let _ = writeln!(out, "  Total contract surplus {}", signed_money(Some(table.total_surplus)));
    out
}

pub fn render_comparison(left: &PlayerRecord, right: &PlayerRecord, cmp: &Comparison) -> String {
    let rows: [(&str, String, String); 8] = [
        ("Player", left.name.clone(), right.name.clone()),
        (
            "Tier",
            cmp.left.tier.as_ref().map_or(PLACEHOLDER.into(), |t| t.label.clone()),
            cmp.right.tier.as_ref().map_or(PLACEHOLDER.into(), |t| t.label.clone()),
        ),
        ("PIE", number(left.impact_score), number(right.impact_score)),
        ("Production value", money(cmp.left.production_value), money(cmp.right.production_value)),
        (
            "Expected salary",
            money(cmp.left.tier_adjusted_expected_salary),
            money(cmp.right.tier_adjusted_expected_salary),
        ),
        ("Actual salary", money(cmp.left.actual_salary), money(cmp.right.actual_salary)),
        ("Impact per dollar", ratio(cmp.left.impact_per_dollar), ratio(cmp.right.impact_per_dollar)),
        (
            "Evaluation",
            cmp.left.evaluation.label.to_string(),
            cmp.right.evaluation.label.to_string(),
        ),
    ];

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Assumptions: {} games, {} min/game, adjustment {:+.1}",
        cmp.assumptions.games_played, cmp.assumptions.minutes_per_game, cmp.assumptions.adjustment
    );
    for (label, l, r) in rows {
        let _ = writeln!(out, "  {label:<18} {l:<26} {r}");
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

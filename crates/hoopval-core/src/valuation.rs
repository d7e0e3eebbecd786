// Valuation formulas: production value, expected salary, impact per dollar.
//
// Every function here is a pure function of its arguments and the model
// config. Missing inputs propagate as `None` instead of raising errors so the
// presentation layer can render a placeholder.

use serde::Serialize;
use thiserror::Error;

use crate::config::ModelConfig;
use crate::evaluation::{evaluate_contract, truthy, ContractEvaluation};
use crate::model::PlayerRecord;
use crate::tier::Tier;

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssumptionError {
    #[error("{field} must be greater than 0")]
    NonPositive { field: &'static str },

    #[error("adjustment must be finite, got {0}")]
    NonFiniteAdjustment(f64),
}

/// User-adjustable inputs to the production value. Defaults: 70 games,
/// 30 minutes, no adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assumptions {
    pub games_played: u32,
    pub minutes_per_game: u32,
    /// Added to the impact score before computing production value.
    pub adjustment: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            games_played: 70,
            minutes_per_game: 30,
            adjustment: 0.0,
        }
    }
}

impl Assumptions {
    pub fn new(games_played: u32, minutes_per_game: u32, adjustment: f64) -> Result<Self, AssumptionError> {
        if games_played == 0 {
            return Err(AssumptionError::NonPositive { field: "games_played" });
        }
        if minutes_per_game == 0 {
            return Err(AssumptionError::NonPositive { field: "minutes_per_game" });
        }
        if !adjustment.is_finite() {
            return Err(AssumptionError::NonFiniteAdjustment(adjustment));
        }
        Ok(Assumptions {
            games_played,
            minutes_per_game,
            adjustment,
        })
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to the nearest integer, with halves going toward positive infinity
/// (-2.5 -> -2, 2.5 -> 3).
pub fn round_half_up(x: f64) -> f64 {
    let r = x.round();
    if x - r == 0.5 {
        r + 1.0
    } else {
        r
    }
}

/// Round to two decimal places, ties away from zero (-0.125 -> -0.13).
/// Unlike `round_half_up`, the sign does not affect the tie direction.
pub fn round_to_hundredths(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// On-court production value, scaled by availability.
///
/// `avg_rotation_value * ((score + adjustment) / average_score)
///   * (games / baseline_games) * (minutes / baseline_minutes) * value_multiplier`
///
/// The availability factor is not clamped: more games or minutes than the
/// baseline increase the value.
pub fn production_value(
    config: &ModelConfig,
    score: Option<f64>,
    games_played: f64,
    minutes_per_game: f64,
    adjustment: f64,
) -> Option<f64> {
    let score = known(score)?;
    let b = &config.baselines;

    let impact_ratio = (score + adjustment) / b.average_score;
    let availability = (games_played / b.games) * (minutes_per_game / b.minutes);

    Some(round_half_up(
        config.league.average_rotation_value() * impact_ratio * availability * b.value_multiplier,
    ))
}

/// Linear market salary: `avg_rotation_value * (score / average_score)
/// * (minutes / expected_salary_minutes_divisor)`.
pub fn base_expected_salary(config: &ModelConfig, score: Option<f64>, minutes_per_game: f64) -> Option<f64> {
    let score = known(score)?;
    let b = &config.baselines;

    let impact_ratio = score / b.average_score;
    let minutes_factor = minutes_per_game / b.expected_salary_minutes_divisor;

    Some(round_half_up(
        config.league.average_rotation_value() * impact_ratio * minutes_factor,
    ))
}

/// Base expected salary scaled by the multiplier of the score's tier.
pub fn tier_adjusted_expected_salary(
    config: &ModelConfig,
    score: Option<f64>,
    base_expected_salary: Option<f64>,
) -> Option<f64> {
    let base = known(base_expected_salary)?;
    let tier = config.tiers.classify(score)?;
    Some(round_half_up(base * tier.multiplier()))
}

/// Impact per dollar as a multiple of the league-average ratio, to two
/// decimals. A zero score or salary counts as missing.
pub fn impact_per_dollar(config: &ModelConfig, score: Option<f64>, actual_salary: Option<f64>) -> Option<f64> {
    let score = truthy(score)?;
    let salary = truthy(actual_salary)?;

    let player_ratio = score / salary;
    let league_ratio = config.reference.league_avg_score / config.reference.league_avg_salary;

    Some(round_to_hundredths(player_ratio / league_ratio))
}

// ---------------------------------------------------------------------------
// Full valuation
// ---------------------------------------------------------------------------

/// Everything derived for one player under one set of assumptions.
/// Recomputed on demand and never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationResult {
    pub player_id: String,
    pub tier: Option<Tier>,
    pub production_value: Option<f64>,
    pub base_expected_salary: Option<f64>,
    pub tier_adjusted_expected_salary: Option<f64>,
    pub impact_per_dollar: Option<f64>,
    /// Current-season salary.
    pub actual_salary: Option<f64>,
    /// Tier-adjusted expected salary minus actual salary. Positive means the
    /// player is underpaid.
    pub market_surplus: Option<f64>,
    pub evaluation: ContractEvaluation,
}

/// Run the whole pipeline for one player.
pub fn value_player(config: &ModelConfig, player: &PlayerRecord, assumptions: &Assumptions) -> ValuationResult {
    let score = player.impact_score;
    let games = f64::from(assumptions.games_played);
    let minutes = f64::from(assumptions.minutes_per_game);

    let actual_salary = player.current_salary();
    let production = production_value(config, score, games, minutes, assumptions.adjustment);
    let base = base_expected_salary(config, score, minutes);
    let tier = config.tiers.classify(score).cloned();

    let tier_adjusted = truthy(base).and_then(|b| tier_adjusted_expected_salary(config, score, Some(b)));
    let ipd = truthy(actual_salary).and_then(|s| impact_per_dollar(config, score, Some(s)));

    let evaluation = match truthy(tier_adjusted) {
        Some(expected) => evaluate_contract(config, score, actual_salary, Some(expected)),
        None => ContractEvaluation::unknown(),
    };

    let market_surplus = match (truthy(tier_adjusted), truthy(actual_salary)) {
        (Some(expected), Some(actual)) => Some(expected - actual),
        _ => None,
    };

    ValuationResult {
        player_id: player.id.clone(),
        tier,
        production_value: production,
        base_expected_salary: base,
        tier_adjusted_expected_salary: tier_adjusted,
        impact_per_dollar: ipd,
        actual_salary,
        market_surplus,
        evaluation,
    }
}

/// Two players valued under the same assumptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub assumptions: Assumptions,
    pub left: ValuationResult,
    pub right: ValuationResult,
}

pub fn compare(
    config: &ModelConfig,
    left: &PlayerRecord,
    right: &PlayerRecord,
    assumptions: &Assumptions,
) -> Comparison {
    Comparison {
        assumptions: *assumptions,
        left: value_player(config, left, assumptions),
        right: value_player(config, right, assumptions),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

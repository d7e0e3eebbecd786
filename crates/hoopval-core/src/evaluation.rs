// Contract evaluation: a tier-policy decision table producing a label and tone.

use serde::Serialize;

use crate::config::ModelConfig;
use crate::tier::EvaluationPolicy;

/// Label shown when there is not enough data to judge a contract.
pub const UNKNOWN_LABEL: &str = "—";

/// Softened surplus thresholds for star-premium tiers.
const STAR_POSITIVE: f64 = 5_000_000.0;
const STAR_ACCEPTABLE: f64 = -5_000_000.0;
/// Weight applied to surplus before comparing against the star thresholds.
const STAR_SURPLUS_WEIGHT: f64 = 0.5;

/// Surplus thresholds for value-economy tiers.
const VALUE_ELITE: f64 = 10_000_000.0;
const VALUE_STRONG: f64 = 3_000_000.0;
const VALUE_NEUTRAL: f64 = -3_000_000.0;

// ---------------------------------------------------------------------------
// Tone and verdict
// ---------------------------------------------------------------------------

/// Coarse sentiment of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
    Elite,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Neutral => "neutral",
            Tone::Negative => "negative",
            Tone::Elite => "elite",
        }
    }
}

/// Every outcome the evaluator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Unknown,
    CbaCappedSuperstar,
    PositiveStarValue,
    AcceptableStarPremium,
    RiskyStarBet,
    EliteValueContract,
    StrongValue,
    MarketNeutral,
    InefficientContract,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Unknown => UNKNOWN_LABEL,
            Verdict::CbaCappedSuperstar => "CBA-Capped Superstar",
            Verdict::PositiveStarValue => "Positive Star Value",
            Verdict::AcceptableStarPremium => "Acceptable Star Premium",
            Verdict::RiskyStarBet => "Risky Star Bet",
            Verdict::EliteValueContract => "Elite Value Contract",
            Verdict::StrongValue => "Strong Value",
            Verdict::MarketNeutral => "Market Neutral",
            Verdict::InefficientContract => "Inefficient Contract",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Verdict::Unknown => Tone::Neutral,
            Verdict::CbaCappedSuperstar => Tone::Elite,
            Verdict::PositiveStarValue => Tone::Positive,
            Verdict::AcceptableStarPremium => Tone::Neutral,
            Verdict::RiskyStarBet => Tone::Negative,
            Verdict::EliteValueContract => Tone::Positive,
            Verdict::StrongValue => Tone::Positive,
            Verdict::MarketNeutral => Tone::Neutral,
            Verdict::InefficientContract => Tone::Negative,
        }
    }
}

/// The judgment handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContractEvaluation {
    pub verdict: Verdict,
    pub label: &'static str,
    pub tone: Tone,
}

impl From<Verdict> for ContractEvaluation {
    fn from(verdict: Verdict) -> Self {
        ContractEvaluation {
            verdict,
            label: verdict.label(),
            tone: verdict.tone(),
        }
    }
}

impl ContractEvaluation {
    pub fn unknown() -> Self {
        Verdict::Unknown.into()
    }

    pub fn is_unknown(&self) -> bool {
        self.verdict == Verdict::Unknown
    }
}

// ---------------------------------------------------------------------------
// Policy dispatch
// ---------------------------------------------------------------------------

impl EvaluationPolicy {
    /// Judge a contract under this policy. Policies that compare against the
    /// expected salary return `Verdict::Unknown` when it is missing.
    pub fn evaluate(self, actual_salary: f64, expected_salary: Option<f64>) -> Verdict {
        match self {
            EvaluationPolicy::CbaCapped => cba_capped(),
            EvaluationPolicy::StarPremium => expected_salary
                .map_or(Verdict::Unknown, |expected| star_premium(actual_salary, expected)),
            EvaluationPolicy::ValueEconomy => expected_salary
                .map_or(Verdict::Unknown, |expected| value_economy(actual_salary, expected)),
        }
    }
}

/// Capped superstars are always elite; surplus is ignored.
pub fn cba_capped() -> Verdict {
    Verdict::CbaCappedSuperstar
}

/// Star contracts: half the surplus counts.
pub fn star_premium(actual_salary: f64, expected_salary: f64) -> Verdict {
    let softened = (expected_salary - actual_salary) * STAR_SURPLUS_WEIGHT;
    if softened >= STAR_POSITIVE {
        Verdict::PositiveStarValue
    } else if softened >= STAR_ACCEPTABLE {
        Verdict::AcceptableStarPremium
    } else {
        Verdict::RiskyStarBet
    }
}

/// Everyone else: full surplus.
pub fn value_economy(actual_salary: f64, expected_salary: f64) -> Verdict {
    let surplus = expected_salary - actual_salary;
    if surplus >= VALUE_ELITE {
        Verdict::EliteValueContract
    } else if surplus >= VALUE_STRONG {
        Verdict::StrongValue
    } else if surplus >= VALUE_NEUTRAL {
        Verdict::MarketNeutral
    } else {
        Verdict::InefficientContract
    }
}

/// Evaluate a contract.
///
/// A score or actual salary that is absent, zero or NaN yields the unknown
/// sentinel. A zero salary is treated as missing data, not as a free contract.
pub fn evaluate_contract(
    config: &ModelConfig,
    score: Option<f64>,
    actual_salary: Option<f64>,
    tier_adjusted_expected_salary: Option<f64>,
) -> ContractEvaluation {
    let (Some(score), Some(actual)) = (truthy(score), truthy(actual_salary)) else {
        return ContractEvaluation::unknown();
    };
    let Some(tier) = config.tiers.classify(Some(score)) else {
        return ContractEvaluation::unknown();
    };
    tier.policy.evaluate(actual, tier_adjusted_expected_salary).into()
}

/// Falsy filter: absent, zero and NaN all count as missing.
pub(crate) fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

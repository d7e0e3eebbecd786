// Tier classification: maps an impact score onto an ordered role/market tier.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Evaluation policy
// ---------------------------------------------------------------------------

/// How contracts in a tier are judged. See `crate::evaluation` for the
/// per-policy decision tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationPolicy {
    /// Compensation is capped by the CBA; surplus is not meaningful.
    CbaCapped,
    /// Surplus counts at half weight.
    StarPremium,
    /// Full surplus math.
    ValueEconomy,
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub label: String,
    /// Inclusive lower bound on the impact score.
    pub min_score: f64,
    pub policy: EvaluationPolicy,
    /// Applied to the base expected salary. Tiers without one use 1.0.
    #[serde(default)]
    pub salary_multiplier: Option<f64>,
}

impl Tier {
    pub fn multiplier(&self) -> f64 {
        self.salary_multiplier.unwrap_or(1.0)
    }
}

// ---------------------------------------------------------------------------
// Tier table
// ---------------------------------------------------------------------------

/// The tier table, held in descending `min_score` order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Vec<Tier>")]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl From<Vec<Tier>> for TierTable {
    fn from(tiers: Vec<Tier>) -> Self {
        TierTable::new(tiers)
    }
}

impl TierTable {
    /// Build a table from tiers in any order. Ties keep their given order.
    pub fn new(mut tiers: Vec<Tier>) -> Self {
        tiers.sort_by(|a, b| {
            b.min_score
                .partial_cmp(&a.min_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        TierTable { tiers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// The tier with the lowest minimum.
    pub fn lowest(&self) -> Option<&Tier> {
        self.tiers.last()
    }

    /// Classify an impact score.
    ///
    /// Absent or NaN scores have no tier. Otherwise the first tier (scanning
    /// from the highest minimum down) whose minimum the score meets wins. A
    /// score below every minimum falls back to the lowest tier.
    pub fn classify(&self, score: Option<f64>) -> Option<&Tier> {
        let score = score.filter(|s| !s.is_nan())?;
        self.tiers
            .iter()
            .find(|t| score >= t.min_score)
            .or_else(|| self.lowest())
    }
}

/// The four-tier table the model ships with.
pub fn default_tiers() -> TierTable {
    let tier = |id: &str, label: &str, min_score: f64, policy, multiplier: f64| Tier {
        id: id.into(),
        label: label.into(),
        min_score,
        policy,
        salary_multiplier: Some(multiplier),
    };
    TierTable::new(vec![
        tier("SUPERSTAR", "Franchise Superstar", 17.0, EvaluationPolicy::CbaCapped, 1.25),
        tier("STAR", "Max Contract Player", 14.0, EvaluationPolicy::StarPremium, 1.05),
        tier("VALUE", "High-Value Starter", 11.0, EvaluationPolicy::ValueEconomy, 0.90),
        tier("ROTATION", "Rotation Player", 0.0, EvaluationPolicy::ValueEconomy, 0.80),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

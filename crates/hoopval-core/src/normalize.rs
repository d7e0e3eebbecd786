// Record normalization: canonical column keys, identifiers, numbers, currency.
//
// Raw rows arrive as column-name -> cell-text maps straight from the CSV
// reader. Header casing and stray BOMs vary between sources, and empty cells
// mean "unknown", never zero.

use std::collections::HashMap;
use tracing::warn;

use crate::model::{SalarySchedule, SALARY_WINDOW};

/// A row keyed by canonical (BOM-stripped, trimmed, lowercase) column names.
pub type CanonicalRow = HashMap<String, String>;

/// Canonical column names of the two datasets.
pub mod columns {
    pub const PLAYER_ID: &str = "player_id";
    pub const PLAYER: &str = "player";
    pub const TEAM: &str = "team";
    pub const PIE: &str = "pie";
    pub const MINUTES: &str = "minutes";
}

const BYTE_ORDER_MARK: char = '\u{feff}';

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

/// Canonical form of a column name.
pub fn canonical_key(key: &str) -> String {
    key.strip_prefix(BYTE_ORDER_MARK)
        .unwrap_or(key)
        .trim()
        .to_lowercase()
}

/// Rebuild a raw row with canonical keys. When two raw keys collapse to the
/// same canonical key, the later one wins.
pub fn normalize_keys<I, K, V>(row: I) -> CanonicalRow
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    row.into_iter()
        .map(|(k, v)| (canonical_key(k.as_ref()), v.into()))
        .collect()
}

/// Trimmed identifier, or `None` if absent or blank.
pub fn normalize_id(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed text, or `None` if absent or blank.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    normalize_id(value)
}

/// Parse a plain numeric cell. Blank cells are `None`; so is anything that
/// does not parse to a finite number.
pub fn parse_number(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!("ignoring non-numeric cell '{}'", raw);
            None
        }
    }
}

/// Parse a currency cell such as `$27,700,000`. `$` and `,` are stripped
/// before parsing. Blank cells are `None`, never zero.
pub fn parse_currency(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!("ignoring unparseable currency cell '{}'", raw);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Typed rows
// ---------------------------------------------------------------------------

/// One row of the performance dataset after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub team: Option<String>,
    pub impact_score: Option<f64>,
    pub minutes_per_game: Option<f64>,
}

impl PerformanceRow {
    pub fn from_canonical(row: &CanonicalRow) -> Self {
        let cell = |key: &str| row.get(key).map(String::as_str);
        PerformanceRow {
            id: normalize_id(cell(columns::PLAYER_ID)),
            name: normalize_text(cell(columns::PLAYER)),
            team: normalize_text(cell(columns::TEAM)),
            impact_score: parse_number(cell(columns::PIE)),
            minutes_per_game: parse_number(cell(columns::MINUTES)),
        }
    }
}

/// One row of the salary dataset after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRow {
    pub id: Option<String>,
    pub schedule: SalarySchedule,
}

impl SalaryRow {
    /// Every season of the contract window gets an entry, `None` where the
    /// cell is blank or the column is missing.
    pub fn from_canonical(row: &CanonicalRow) -> Self {
        let schedule = SALARY_WINDOW
            .iter()
            .map(|season| {
                let cell = row.get(&season.label()).map(String::as_str);
                (*season, parse_currency(cell))
            })
            .collect();
        SalaryRow {
            id: normalize_id(row.get(columns::PLAYER_ID).map(String::as_str)),
            schedule,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

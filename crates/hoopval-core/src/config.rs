// Model configuration loading and parsing (hoopval.toml).
//
// Everything the valuation formulas read lives here: league economics,
// baselines, the reference point for impact-per-dollar, the tier table and
// the market bands. The built-in defaults are exposed as a process-wide
// static through `ModelConfig::standard()`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

use crate::tier::{default_tiers, TierTable};

/// Name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE_NAME: &str = "hoopval.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// Full configuration: the valuation model plus where the datasets live.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub data_paths: DataPaths,
}

/// Raw deserialization target for the entire hoopval.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    league: LeagueEconomics,
    baselines: Baselines,
    reference: ReferencePoint,
    tiers: TierTable,
    #[serde(default)]
    market_bands: Vec<MarketBand>,
    data: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub performance: String,
    pub salaries: String,
}

// ---------------------------------------------------------------------------
// Model config
// ---------------------------------------------------------------------------

/// Read-only constants consumed by the valuation formulas and the classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub league: LeagueEconomics,
    pub baselines: Baselines,
    pub reference: ReferencePoint,
    pub tiers: TierTable,
    /// Flat expected-value figures per score band. Carried as reference data;
    /// none of the salary formulas read it.
    #[serde(default)]
    pub market_bands: Vec<MarketBand>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueEconomics {
    pub salary_cap: f64,
    pub rotation_players: u32,
}

impl LeagueEconomics {
    /// Salary share of one rotation player: `salary_cap / rotation_players`.
    pub fn average_rotation_value(&self) -> f64 {
        self.salary_cap / f64::from(self.rotation_players)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Baselines {
    pub average_score: f64,
    pub games: f64,
    pub minutes: f64,
    pub value_multiplier: f64,
    /// Divisor for the minutes factor of the base expected salary.
    /// Independent of `minutes`.
    #[serde(default = "default_expected_salary_minutes_divisor")]
    pub expected_salary_minutes_divisor: f64,
}

fn default_expected_salary_minutes_divisor() -> f64 {
    30.0
}

/// League-average impact and salary that impact-per-dollar is expressed against.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferencePoint {
    pub league_avg_score: f64,
    pub league_avg_salary: f64,
}

/// A half-open score band `[min, max)` mapped to a flat expected value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketBand {
    pub min: f64,
    pub max: f64,
    pub expected: f64,
}

impl MarketBand {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score < self.max
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            league: LeagueEconomics {
                salary_cap: 136_000_000.0,
                rotation_players: 10,
            },
            baselines: Baselines {
                average_score: 10.0,
                games: 70.0,
                minutes: 30.0,
                value_multiplier: 1.0,
                expected_salary_minutes_divisor: default_expected_salary_minutes_divisor(),
            },
            reference: ReferencePoint {
                league_avg_score: 15.0,
                league_avg_salary: 20_000_000.0,
            },
            tiers: default_tiers(),
            market_bands: vec![
                MarketBand { min: 0.0, max: 7.0, expected: 3_000_000.0 },
                MarketBand { min: 7.0, max: 9.0, expected: 8_000_000.0 },
                MarketBand { min: 9.0, max: 11.0, expected: 15_000_000.0 },
                MarketBand { min: 11.0, max: 13.0, expected: 22_000_000.0 },
                MarketBand { min: 13.0, max: 15.0, expected: 30_000_000.0 },
                MarketBand { min: 15.0, max: 99.0, expected: 45_000_000.0 },
            ],
        }
    }
}

impl ModelConfig {
    /// The built-in model, constructed once per process.
    pub fn standard() -> &'static ModelConfig {
        static STANDARD: OnceLock<ModelConfig> = OnceLock::new();
        STANDARD.get_or_init(ModelConfig::default)
    }

    /// Find the market band containing `score`, if any.
    pub fn market_band_for(&self, score: f64) -> Option<&MarketBand> {
        if score.is_nan() {
            return None;
        }
        self.market_bands.iter().find(|band| band.contains(score))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate a configuration document. `path` is only used for
/// error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        model: ModelConfig {
            league: file.league,
            baselines: file.baselines,
            reference: file.reference,
            tiers: file.tiers,
            market_bands: file.market_bands,
        },
        data_paths: file.data,
    };

    validate(&config.model)?;
    Ok(config)
}

/// Load and validate `config/hoopval.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for normal startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE_NAME);
    let text = std::fs::read_to_string(&path)
        .map_err(|_| ConfigError::FileNotFound { path: path.clone() })?;
    parse_config(&text, &path)
}

/// Copy `defaults/hoopval.toml` into `config/` when the latter is missing.
/// Returns the path written, or `None` if nothing needed copying.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE_NAME);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE_NAME);

    if !source.is_file() {
        if target.is_file() {
            return Ok(None);
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/{CONFIG_FILE_NAME} nor config/{CONFIG_FILE_NAME} found in {}; \
                 run from the project root",
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;

    // Existing files are never overwritten.
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            });
        }
    }

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory,
/// copying the default file first if needed.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            field: field.into(),
            message: format!("must be a finite number > 0, got {value}"),
        })
    }
}

pub fn validate(model: &ModelConfig) -> Result<(), ConfigError> {
    positive("league.salary_cap", model.league.salary_cap)?;
    if model.league.rotation_players == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.rotation_players".into(),
            message: "must be greater than 0".into(),
        });
    }

    let b = &model.baselines;
    let baseline_fields: &[(&str, f64)] = &[
        ("baselines.average_score", b.average_score),
        ("baselines.games", b.games),
        ("baselines.minutes", b.minutes),
        ("baselines.expected_salary_minutes_divisor", b.expected_salary_minutes_divisor),
        ("reference.league_avg_score", model.reference.league_avg_score),
        ("reference.league_avg_salary", model.reference.league_avg_salary),
    ];
    for (name, val) in baseline_fields {
        positive(name, *val)?;
    }
    if !b.value_multiplier.is_finite() {
        return Err(ConfigError::ValidationError {
            field: "baselines.value_multiplier".into(),
            message: format!("must be finite, got {}", b.value_multiplier),
        });
    }

    if model.tiers.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "tiers".into(),
            message: "at least one tier is required".into(),
        });
    }
    let mut seen = HashSet::new();
    for tier in model.tiers.iter() {
        if !seen.insert(tier.id.as_str()) {
            return Err(ConfigError::ValidationError {
                field: format!("tiers.{}", tier.id),
                message: "duplicate tier id".into(),
            });
        }
        if !tier.min_score.is_finite() {
            return Err(ConfigError::ValidationError {
                field: format!("tiers.{}.min_score", tier.id),
                message: format!("must be finite, got {}", tier.min_score),
            });
        }
        if let Some(m) = tier.salary_multiplier {
            positive(&format!("tiers.{}.salary_multiplier", tier.id), m)?;
        }
    }

    for (i, band) in model.market_bands.iter().enumerate() {
        if band.min.is_nan() || band.max.is_nan() || band.min >= band.max {
            return Err(ConfigError::ValidationError {
                field: format!("market_bands[{i}]"),
                message: format!("min ({}) must be below max ({})", band.min, band.max),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::EvaluationPolicy;
    use std::fs;

    /// Locate the workspace `defaults/` directory from either the crate or
    /// the workspace root.
    fn workspace_root() -> PathBuf {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        manifest
            .ancestors()
            .find(|p| p.join("defaults").join(CONFIG_FILE_NAME).exists())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| panic!("cannot locate defaults/ from {}", manifest.display()))
    }

    fn default_text() -> String {
        fs::read_to_string(workspace_root().join("defaults").join(CONFIG_FILE_NAME)).unwrap()
    }

    #[test]
    fn default_file_matches_builtin_model() {
        let config = parse_config(&default_text(), Path::new("defaults/hoopval.toml"))
            .expect("defaults should parse");
        let builtin = ModelConfig::default();

        assert!((config.model.league.salary_cap - builtin.league.salary_cap).abs() < f64::EPSILON);
        assert_eq!(config.model.league.rotation_players, 10);
        assert!((config.model.baselines.average_score - 10.0).abs() < f64::EPSILON);
        assert!((config.model.baselines.games - 70.0).abs() < f64::EPSILON);
        assert!((config.model.baselines.minutes - 30.0).abs() < f64::EPSILON);
        assert!(
            (config.model.baselines.expected_salary_minutes_divisor - 30.0).abs() < f64::EPSILON
        );
        assert!((config.model.reference.league_avg_salary - 20_000_000.0).abs() < f64::EPSILON);
        assert_eq!(config.model.market_bands, builtin.market_bands);

        let ids: Vec<&str> = config.model.tiers.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["SUPERSTAR", "STAR", "VALUE", "ROTATION"]);
        assert_eq!(config.data_paths.performance, "data/pie.csv");
        assert_eq!(config.data_paths.salaries, "data/salaries.csv");
    }

    #[test]
    fn standard_is_a_single_instance() {
        let a = ModelConfig::standard() as *const ModelConfig;
        let b = ModelConfig::standard() as *const ModelConfig;
        assert_eq!(a, b);
    }

    #[test]
    fn average_rotation_value() {
        let model = ModelConfig::default();
        assert!((model.league.average_rotation_value() - 13_600_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn market_band_lookup_is_half_open() {
        let model = ModelConfig::default();
        assert_eq!(model.market_band_for(0.0).map(|b| b.expected), Some(3_000_000.0));
        assert_eq!(model.market_band_for(7.0).map(|b| b.expected), Some(8_000_000.0));
        assert_eq!(model.market_band_for(14.99).map(|b| b.expected), Some(30_000_000.0));
        assert_eq!(model.market_band_for(15.0).map(|b| b.expected), Some(45_000_000.0));
        assert!(model.market_band_for(99.0).is_none());
        assert!(model.market_band_for(-1.0).is_none());
        assert!(model.market_band_for(f64::NAN).is_none());
    }

    #[test]
    fn divisor_defaults_when_omitted() {
        let text = default_text().replace("expected_salary_minutes_divisor = 30\n", "");
        let config = parse_config(&text, Path::new("x.toml")).unwrap();
        assert!(
            (config.model.baselines.expected_salary_minutes_divisor - 30.0).abs() < f64::EPSILON
        );
    }

    #[test]
    fn tier_table_is_sorted_descending_regardless_of_file_order() {
        let text = r#"
[league]
salary_cap = 100
rotation_players = 5

[baselines]
average_score = 10
games = 70
minutes = 30
value_multiplier = 1.0

[reference]
league_avg_score = 15
league_avg_salary = 20000000

[[tiers]]
id = "LOW"
label = "Low"
min_score = 0
policy = "VALUE_ECONOMY"

[[tiers]]
id = "HIGH"
label = "High"
min_score = 20
policy = "CBA_CAPPED"

[data]
performance = "p.csv"
salaries = "s.csv"
"#;
        let config = parse_config(text, Path::new("x.toml")).unwrap();
        let first = config.model.tiers.iter().next().unwrap();
        assert_eq!(first.id, "HIGH");
        assert_eq!(first.policy, EvaluationPolicy::CbaCapped);
        assert!(first.salary_multiplier.is_none());
        assert!(config.model.market_bands.is_empty());
    }

    #[test]
    fn rejects_zero_rotation_players() {
        let text = default_text().replace("rotation_players = 10", "rotation_players = 0");
        let err = parse_config(&text, Path::new("x.toml")).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "league.rotation_players");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_zero_average_score() {
        let text = default_text().replace("average_score = 10", "average_score = 0");
        let err = parse_config(&text, Path::new("x.toml")).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "baselines.average_score");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_duplicate_tier_ids() {
        let text = default_text().replace("id = \"STAR\"", "id = \"VALUE\"");
        let err = parse_config(&text, Path::new("x.toml")).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "tiers.VALUE");
                assert!(message.contains("duplicate"));
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_unknown_policy() {
        let text = default_text().replace("policy = \"STAR_PREMIUM\"", "policy = \"LUXURY_TAX\"");
        let err = parse_config(&text, Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn rejects_inverted_market_band() {
        let mut model = ModelConfig::default();
        model.market_bands.push(MarketBand { min: 20.0, max: 10.0, expected: 1.0 });
        let err = validate(&model).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "market_bands[6]"),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("hoopval_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE_NAME)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let err = parse_config("this is not valid [[[ toml", Path::new("bad.toml")).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("bad.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
    }

    #[test]
    fn ensure_config_file_copies_then_skips() {
        let tmp = std::env::temp_dir().join("hoopval_config_test_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE_NAME), default_text()).unwrap();

        let copied = ensure_config_file(&tmp).expect("should copy");
        assert!(copied.is_some_and(|p| p.ends_with(CONFIG_FILE_NAME)));
        assert!(load_config_from(&tmp).is_ok());

        fs::write(tmp.join("config").join(CONFIG_FILE_NAME), "# custom\n").unwrap();
        assert!(ensure_config_file(&tmp).unwrap().is_none());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_keeps_existing_config_without_defaults() {
        let tmp = std::env::temp_dir().join("hoopval_config_test_config_only");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE_NAME), default_text()).unwrap();

        assert!(ensure_config_file(&tmp).unwrap().is_none());
        assert!(load_config_from(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_never_truncates_existing_target() {
        let tmp = std::env::temp_dir().join("hoopval_config_test_no_truncate");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE_NAME), default_text()).unwrap();
        // An empty file still counts as present.
        fs::write(tmp.join("config").join(CONFIG_FILE_NAME), "").unwrap();

        assert!(ensure_config_file(&tmp).unwrap().is_none());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE_NAME)).unwrap();
        assert!(content.is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_errors_without_defaults() {
        let tmp = std::env::temp_dir().join("hoopval_config_test_no_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_file(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}

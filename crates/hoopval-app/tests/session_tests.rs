// End-to-end tests: load the fixture CSV files through a session, then value
// and compare the merged players.

use hoopval_app::commands::{self, Lookup};
use hoopval_app::ingest;
use hoopval_app::session::{LoadState, Session, SessionError};
use hoopval_core::config::{Config, DataPaths, ModelConfig};
use hoopval_core::{project, Assumptions, Season, Tone, Verdict};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_config() -> Config {
    Config {
        model: ModelConfig::default(),
        data_paths: DataPaths {
            performance: fixture("pie.csv").display().to_string(),
            salaries: fixture("salaries.csv").display().to_string(),
        },
    }
}

async fn loaded_session() -> Session {
    let session = Session::load(fixture_config()).await;
    assert!(session.state().is_ready(), "fixture load failed: {:?}", session.state());
    session
}

#[tokio::test]
async fn fixtures_load_and_merge() {
    let session = loaded_session().await;
    let dir = session.directory().unwrap();

    let ids: Vec<&str> = dir.players().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["1628369", "1627759", "203999", "1641705", "1629029", "1630578"]
    );

    // Salary-only and unidentified rows never make it in.
    assert!(dir.get("5555555").is_none());
    assert!(dir.get("9999999").is_none());
}

#[tokio::test]
async fn duplicate_id_keeps_last_row() {
    let session = loaded_session().await;
    let luka = session.find("Luka Doncic").unwrap();
    assert_eq!(luka.team.as_deref(), Some("LAL"));
    assert!((luka.impact_score.unwrap() - 18.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn truncated_salary_row_keeps_its_schedule() {
    let session = loaded_session().await;
    let luka = session.find("1629029").unwrap();
    let schedule = luka.salary_schedule.as_ref().unwrap();
    assert_eq!(schedule.current(), Some(45_999_660.0));
    assert_eq!(schedule.salary(Season::new(2026)), None);
    assert_eq!(schedule.len(), 4);
}

#[tokio::test]
async fn currency_and_blank_cells() {
    let session = loaded_session().await;
    let wemby = session.find("1641705").unwrap();
    assert!(wemby.impact_score.is_none());

    let schedule = wemby.salary_schedule.as_ref().unwrap();
    assert_eq!(schedule.salary(Season::new(2025)), Some(13_376_880.0));
    assert_eq!(schedule.salary(Season::new(2026)), Some(16_868_245.0));
    assert_eq!(schedule.salary(Season::new(2027)), None);
    assert_eq!(schedule.salary(Season::new(2028)), None);

    let sengun = session.find("sengun").unwrap();
    assert!(sengun.salary_schedule.is_none());
}

#[tokio::test]
async fn valuation_of_value_tier_player() {
    let session = loaded_session().await;
    let brown = session.find("Jaylen Brown").unwrap();
    let result = session.value(brown, &Assumptions::default());

    assert_eq!(result.tier.as_ref().map(|t| t.id.as_str()), Some("VALUE"));
    assert_eq!(result.production_value, Some(16_320_000.0));
    assert_eq!(result.base_expected_salary, Some(16_320_000.0));
    assert_eq!(result.tier_adjusted_expected_salary, Some(14_688_000.0));
    assert_eq!(result.actual_salary, Some(4_000_000.0));
    assert_eq!(result.market_surplus, Some(10_688_000.0));
    assert_eq!(result.impact_per_dollar, Some(4.0));
    assert_eq!(result.evaluation.verdict, Verdict::EliteValueContract);
    assert_eq!(result.evaluation.tone, Tone::Positive);

    let table = project(brown.salary_schedule.as_ref().unwrap(), result.production_value);
    assert_eq!(table.rows.len(), 4);
    assert_eq!(table.rows[0].surplus, Some(12_320_000.0));
    assert_eq!(table.rows[2].surplus, None);
    assert!((table.total_surplus - 24_640_000.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn policies_per_tier() {
    let session = loaded_session().await;
    let assumptions = Assumptions::default();

    let jokic = session.value(session.find("jokic").unwrap(), &assumptions);
    assert_eq!(jokic.evaluation.verdict, Verdict::CbaCappedSuperstar);
    assert_eq!(jokic.evaluation.tone, Tone::Elite);

    let tatum = session.value(session.find("tatum").unwrap(), &assumptions);
    assert_eq!(tatum.tier.as_ref().map(|t| t.id.as_str()), Some("STAR"));
    assert_eq!(tatum.evaluation.verdict, Verdict::RiskyStarBet);

    // No score and no current salary respectively.
    let wemby = session.value(session.find("wembanyama").unwrap(), &assumptions);
    assert!(wemby.tier.is_none());
    assert!(wemby.evaluation.is_unknown());

    let sengun = session.value(session.find("sengun").unwrap(), &assumptions);
    assert!(sengun.evaluation.is_unknown());
    assert!(sengun.impact_per_dollar.is_none());
    assert!(sengun.market_surplus.is_none());
}

#[tokio::test]
async fn value_command_text_report() {
    let session = loaded_session().await;
    let text = commands::value(&session, "1627759", Lookup::Id, &Assumptions::default(), false).unwrap();
    assert!(text.contains("Jaylen Brown (BOS)"));
    assert!(text.contains("Elite Value Contract [positive]"));
    assert!(text.contains("+$10.7M"));
    assert!(text.contains("Free Agent"));
}

#[tokio::test]
async fn compare_command_uses_shared_assumptions() {
    let session = loaded_session().await;
    let assumptions = Assumptions::new(82, 36, 1.5).unwrap();
    let text = commands::compare(&session, "tatum", &["brown".to_string()], &assumptions, false).unwrap();
    assert!(text.starts_with("Assumptions: 82 games, 36 min/game, adjustment +1.5"));
    assert!(text.contains("Jayson Tatum"));
    assert!(text.contains("Jaylen Brown"));
}

#[tokio::test]
async fn missing_file_fails_the_load() {
    let mut config = fixture_config();
    config.data_paths.salaries = fixture("does_not_exist.csv").display().to_string();

    let session = Session::load(config).await;
    match session.state() {
        LoadState::Failed(message) => assert!(message.contains("does_not_exist.csv")),
        other => panic!("expected Failed, got: {other:?}"),
    }
    assert!(matches!(session.find("tatum"), Err(SessionError::NotLoaded(_))));
}

#[tokio::test]
async fn missing_required_column_fails_the_load() {
    let dir = std::env::temp_dir().join("hoopval_test_missing_column");
    std::fs::create_dir_all(&dir).unwrap();
    let bad = dir.join("pie.csv");
    std::fs::write(&bad, "id,player,pie\n1,A,10\n").unwrap();

    let err = ingest::load_performance(&bad).await.unwrap_err();
    match err {
        ingest::IngestError::Validation { message, .. } => assert!(message.contains("player_id")),
        other => panic!("expected Validation, got: {other}"),
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn reload_picks_up_new_data() {
    let dir = std::env::temp_dir().join("hoopval_test_reload");
    std::fs::create_dir_all(&dir).unwrap();
    let pie = dir.join("pie.csv");
    let salaries = dir.join("salaries.csv");
    std::fs::write(&pie, "player_id,player,pie\n1,First Player,10\n").unwrap();
    std::fs::write(&salaries, "player_id,2025-26\n1,\"$1,000,000\"\n").unwrap();

    let config = Config {
        model: ModelConfig::default(),
        data_paths: DataPaths {
            performance: pie.display().to_string(),
            salaries: salaries.display().to_string(),
        },
    };
    let mut session = Session::load(config).await;
    assert_eq!(session.directory().unwrap().len(), 1);

    std::fs::write(&pie, "player_id,player,pie\n1,First Player,10\n2,Second Player,12\n").unwrap();
    session.reload().await;
    assert_eq!(session.directory().unwrap().len(), 2);

    let _ = std::fs::remove_dir_all(&dir);
}

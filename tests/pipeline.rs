//! End-to-end run against an in-memory SQLite store.

use fantasy_xv::config::AppConfig;
use fantasy_xv::runner::run_selection;
use fantasy_xv::storage::sqlite::SqlitePlayerStore;
use fantasy_xv::storage::{load_snapshot, PlayerStore};
use fantasy_xv::types::{CallUp, Country, Player, Position, Stats};
use rust_decimal_macros::dec;

fn temp_file(ext: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("fantasy_pipeline_{}.{ext}", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

fn six_nations_pool() -> Vec<Player> {
    vec![
        Player::new("O. Lock", Country::England, dec!(14), Position::SecondRow, CallUp::Start)
            .with_stats(Stats { tackles: 18, lineout_steals: 1, ..Default::default() }),
        Player::new("A. Wing", Country::France, dec!(20.5), Position::BackThree, CallUp::Start)
            .with_stats(Stats { tries: 2, metres_carried: 95, ..Default::default() }),
        Player::new("B. Wing", Country::France, dec!(30), Position::BackThree, CallUp::Start)
            .with_stats(Stats { tries: 1, ..Default::default() }),
        Player::new("C. Prop", Country::Italy, dec!(9), Position::Prop, CallUp::Start)
            .with_stats(Stats { tackles: 9, conceded_penalties: 2, ..Default::default() }),
        Player::new("D. Bench", Country::Scotland, dec!(6), Position::ScrumHalf, CallUp::Sub)
            .with_stats(Stats { assists: 1, ..Default::default() }),
    ]
}

#[tokio::test]
async fn test_full_run_writes_report_and_leaves_store_unchanged() {
    let store = SqlitePlayerStore::connect("sqlite::memory:", true).await.unwrap();
    let pool = six_nations_pool();
    store.save_players(&pool).await.unwrap();

    let report_path = temp_file("txt");
    let snapshot_path = temp_file("json");
    let mut cfg = AppConfig::default();
    cfg.selection.budget = dec!(50);
    cfg.selection.report_path = report_path.clone();
    cfg.selection.snapshot_path = Some(snapshot_path.clone());

    let summary = run_selection(&store, &cfg).await.unwrap();

    // A. Wing 29, O. Lock 25, C. Prop 7; B. Wing no longer affordable;
    // D. Bench (4 pts) takes the supersub slot.
    assert_eq!(summary.players_loaded, 5);
    assert_eq!(summary.captain.as_deref(), Some("A. Wing"));
    assert_eq!(summary.supersub.as_deref(), Some("D. Bench"));
    assert_eq!(summary.roster_size, 3);
    assert_eq!(summary.total_spent, dec!(49.5));
    assert_eq!(summary.total_points, 61 + 29 + 16);

    let text = std::fs::read_to_string(&report_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Selected Team:");
    assert_eq!(
        lines[1],
        "Captain: A. Wing (France), Position: back_three, Call-up: start, Value: 20.5, Points: 29"
    );
    assert_eq!(lines[4], "Total Points of the Selected Team: 106");
    assert_eq!(lines[5], "Total Value of the Selected Team: 49.5");

    let snapshot = load_snapshot(&snapshot_path).unwrap().unwrap();
    assert_eq!(snapshot.total_points, 106);

    assert_eq!(store.load_players().await.unwrap(), pool);

    std::fs::remove_file(&report_path).unwrap();
    std::fs::remove_file(&snapshot_path).unwrap();
}

#[tokio::test]
async fn test_empty_store_produces_empty_report() {
    let store = SqlitePlayerStore::connect("sqlite::memory:", true).await.unwrap();
    let report_path = temp_file("txt");
    let mut cfg = AppConfig::default();
    cfg.selection.report_path = report_path.clone();

    let summary = run_selection(&store, &cfg).await.unwrap();
    assert_eq!(summary.players_loaded, 0);
    assert_eq!(summary.roster_size, 0);

    let text = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(
        text,
        "Selected Team:\nTotal Points of the Selected Team: 0\nTotal Value of the Selected Team: 0\n"
    );
    std::fs::remove_file(&report_path).unwrap();
}

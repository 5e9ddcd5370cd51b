//! One selection run: load → select → report → persist.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fmt;
use tracing::info;

use crate::config::AppConfig;
use crate::report::TeamReport;
use crate::storage::{self, PlayerStore, SelectionSnapshot};

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub players_loaded: usize,
    pub roster_size: usize,
    pub captain: Option<String>,
    pub supersub: Option<String>,
    pub total_points: i64,
    pub total_spent: Decimal,
    pub report_path: String,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} players picked | captain={} supersub={} | points={} spent={}",
            self.roster_size,
            self.players_loaded,
            self.captain.as_deref().unwrap_or("-"),
            self.supersub.as_deref().unwrap_or("-"),
            self.total_points,
            self.total_spent.normalize(),
        )
    }
}

/// Run a full selection against `store` with the settings in `cfg`.
pub async fn run_selection(store: &dyn PlayerStore, cfg: &AppConfig) -> Result<RunSummary> {
    // 1. Snapshot the pool
    let players = store.load_players().await.context("Failed to load players")?;
    info!(count = players.len(), budget = %cfg.selection.budget, "Pool loaded");

    // 2. Select
    let selector = cfg.selector();
    let selection = selector.select(&players, cfg.selection.budget);

    // 3. Report
    let report = TeamReport::build(&selection, selector.roles());
    report.write_to(&cfg.selection.report_path)?;

    // 4. Optional JSON snapshot
    if let Some(path) = cfg.selection.snapshot_path.as_deref() {
        let snapshot = SelectionSnapshot::new(selection.clone(), report.total_points);
        storage::save_snapshot(&snapshot, path)?;
    }

    // 5. Write the pool back; selection leaves every record untouched
    store.save_players(&players).await.context("Failed to save players")?;

    let summary = RunSummary {
        players_loaded: players.len(),
        roster_size: selection.roster.len(),
        captain: selection.captain.map(|c| c.player.name),
        supersub: selection.supersub.map(|s| s.player.name),
        total_points: report.total_points,
        total_spent: report.total_value,
        report_path: cfg.selection.report_path.clone(),
    };
    info!(summary = %summary, "Run complete");
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

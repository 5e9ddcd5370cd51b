//! Persistence layer.
//!
//! Defines the `PlayerStore` trait the run pipeline reads candidates from
//! and writes them back to, and saves/loads the JSON snapshot of a
//! finished selection.

pub mod sqlite;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::selection::Selection;
use crate::types::Player;

/// Abstraction over the player data store.
///
/// Selection itself only ever sees the in-memory list, so the store is
/// read once before a run and written once after it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Read every player record.
    async fn load_players(&self) -> Result<Vec<Player>>;

    /// Upsert counters, call-up and supersub tag by name.
    async fn save_players(&self, players: &[Player]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Selection snapshot
// ---------------------------------------------------------------------------

/// A finished run, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub total_points: i64,
    pub selection: Selection,
}

impl SelectionSnapshot {
    pub fn new(selection: Selection, total_points: i64) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            total_points,
            selection,
        }
    }
}

/// Save a selection snapshot as pretty JSON.
pub fn save_snapshot(snapshot: &SelectionSnapshot, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .context("Failed to serialise selection snapshot")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write snapshot to {path}"))?;

    debug!(path, run_id = %snapshot.run_id, "Snapshot saved");
    Ok(())
}

/// Load a selection snapshot. Returns None if the file doesn't exist.
pub fn load_snapshot(path: &str) -> Result<Option<SelectionSnapshot>> {
    if !Path::new(path).exists() {
        info!(path, "No snapshot found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read snapshot from {path}"))?;

    let snapshot: SelectionSnapshot = serde_json::from_str(&json)
        .context(format!("Failed to parse snapshot from {path}"))?;

    info!(
        path,
        run_id = %snapshot.run_id,
        roster = snapshot.selection.roster.len(),
        "Snapshot loaded from disk"
    );

    Ok(Some(snapshot))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

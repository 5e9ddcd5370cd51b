//! SQLite player store.
//!
//! One `players` table keyed by name. Counter columns tolerate NULL and
//! junk values (read as zero); rows whose identity fields cannot be read
//! are skipped with a warning rather than failing the load.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use rust_decimal::prelude::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::PlayerStore;
use crate::types::{CallUp, Country, FantasyError, Player, Position, Stats};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    name TEXT PRIMARY KEY,
    country TEXT NOT NULL,
    value REAL NOT NULL,
    position TEXT NOT NULL,
    call_up TEXT NOT NULL DEFAULT 'start',
    supersub TEXT NOT NULL DEFAULT 'no',
    tackles INTEGER DEFAULT 0,
    conceded_penalties INTEGER DEFAULT 0,
    defenders_beaten INTEGER DEFAULT 0,
    metres_carried INTEGER DEFAULT 0,
    kick_50_22 INTEGER DEFAULT 0,
    lineout_steal INTEGER DEFAULT 0,
    breakdown_steal INTEGER DEFAULT 0,
    "try" INTEGER DEFAULT 0,
    assists INTEGER DEFAULT 0,
    conversion INTEGER DEFAULT 0,
    penalty INTEGER DEFAULT 0,
    drop_goal INTEGER DEFAULT 0,
    yellow_cards INTEGER DEFAULT 0,
    red_cards INTEGER DEFAULT 0
)
"#;

const SELECT_ALL: &str = r#"
SELECT name, country, value, position, call_up, supersub,
       tackles, conceded_penalties, defenders_beaten, metres_carried,
       kick_50_22, lineout_steal, breakdown_steal, "try", assists,
       conversion, penalty, drop_goal, yellow_cards, red_cards
FROM players
ORDER BY rowid
"#;

const UPSERT: &str = r#"
INSERT INTO players (
    name, country, value, position, call_up, supersub,
    tackles, conceded_penalties, defenders_beaten, metres_carried,
    kick_50_22, lineout_steal, breakdown_steal, "try", assists,
    conversion, penalty, drop_goal, yellow_cards, red_cards
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(name) DO UPDATE SET
    call_up = excluded.call_up,
    supersub = excluded.supersub,
    tackles = excluded.tackles,
    conceded_penalties = excluded.conceded_penalties,
    defenders_beaten = excluded.defenders_beaten,
    metres_carried = excluded.metres_carried,
    kick_50_22 = excluded.kick_50_22,
    lineout_steal = excluded.lineout_steal,
    breakdown_steal = excluded.breakdown_steal,
    "try" = excluded."try",
    assists = excluded.assists,
    conversion = excluded.conversion,
    penalty = excluded.penalty,
    drop_goal = excluded.drop_goal,
    yellow_cards = excluded.yellow_cards,
    red_cards = excluded.red_cards
"#;

/// `PlayerStore` backed by a SQLite database.
pub struct SqlitePlayerStore {
    pool: SqlitePool,
}

impl SqlitePlayerStore {
    /// Open `url` (e.g. `sqlite://players.db` or `sqlite::memory:`) and
    /// make sure the `players` table exists.
    pub async fn connect(url: &str, create_if_missing: bool) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {url}"))?
            .create_if_missing(create_if_missing);

        // A single long-lived connection: an in-memory database lives and
        // dies with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open player database: {url}"))?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .context("Failed to create players table")?;

        info!(url, "Player store ready");
        Ok(Self { pool })
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlayerStore for SqlitePlayerStore {
    async fn load_players(&self) -> Result<Vec<Player>> {
        let mut rows = sqlx::query(SELECT_ALL).fetch(&self.pool);
        let mut players = Vec::new();
        let mut skipped = 0usize;

        while let Some(row) = rows.try_next().await.context("Failed to read players")? {
            match player_from_row(&row) {
                Ok(player) => players.push(player),
                Err(e) => {
                    warn!(error = %e, "Skipping player record");
                    skipped += 1;
                }
            }
        }

        info!(loaded = players.len(), skipped, "Players loaded");
        Ok(players)
    }

    async fn save_players(&self, players: &[Player]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for p in players {
            let s = &p.stats;
            sqlx::query(UPSERT)
                .bind(&p.name)
                .bind(p.country.as_str())
                .bind(p.value.to_f64().unwrap_or_default())
                .bind(p.position.as_str())
                .bind(p.call_up.as_str())
                .bind(if p.supersub_tag { "yes" } else { "no" })
                .bind(s.tackles)
                .bind(s.conceded_penalties)
                .bind(s.defenders_beaten)
                .bind(s.metres_carried)
                .bind(s.kicks_50_22)
                .bind(s.lineout_steals)
                .bind(s.breakdown_steals)
                .bind(s.tries)
                .bind(s.assists)
                .bind(s.conversions)
                .bind(s.penalty_kicks)
                .bind(s.drop_goals)
                .bind(s.yellow_cards)
                .bind(s.red_cards)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to save player {}", p.name))?;
        }

        tx.commit().await.context("Failed to commit player updates")?;
        debug!(count = players.len(), "Players saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

fn player_from_row(row: &SqliteRow) -> Result<Player, FantasyError> {
    let name: String = row
        .try_get::<Option<String>, _>("name")
        .ok()
        .flatten()
        .ok_or_else(|| invalid("<unnamed>", "missing name"))?;

    let text = |col: &str| -> Option<String> { row.try_get::<Option<String>, _>(col).ok().flatten() };

    let country = text("country").ok_or_else(|| invalid(&name, "missing country"))?;
    let position = text("position").ok_or_else(|| invalid(&name, "missing position"))?;

    let value = row
        .try_get::<Option<f64>, _>("value")
        .ok()
        .flatten()
        .and_then(Decimal::from_f64)
        .ok_or_else(|| invalid(&name, "missing or non-numeric value"))?;
    if value < Decimal::ZERO {
        return Err(invalid(&name, &format!("negative value {value}")));
    }

    let call_up = text("call_up").unwrap_or_else(|| "start".to_string());
    let call_up = CallUp::from_str(&call_up).map_err(|e| invalid(&name, &e.to_string()))?;

    let supersub_tag = text("supersub").is_some_and(|s| s.trim().eq_ignore_ascii_case("yes"));

    let stats = Stats {
        tackles: counter(row, &name, "tackles"),
        conceded_penalties: counter(row, &name, "conceded_penalties"),
        defenders_beaten: counter(row, &name, "defenders_beaten"),
        metres_carried: counter(row, &name, "metres_carried"),
        kicks_50_22: counter(row, &name, "kick_50_22"),
        lineout_steals: counter(row, &name, "lineout_steal"),
        breakdown_steals: counter(row, &name, "breakdown_steal"),
        tries: counter(row, &name, "try"),
        assists: counter(row, &name, "assists"),
        conversions: counter(row, &name, "conversion"),
        penalty_kicks: counter(row, &name, "penalty"),
        drop_goals: counter(row, &name, "drop_goal"),
        yellow_cards: counter(row, &name, "yellow_cards"),
        red_cards: counter(row, &name, "red_cards"),
    };

    Ok(Player {
        name,
        country: Country::from(country),
        value,
        position: Position::from(position),
        call_up,
        supersub_tag,
        stats,
    })
}

/// Read a counter column. NULL is zero, a real is truncated, anything
/// else is zero.
fn counter(row: &SqliteRow, name: &str, col: &str) -> i64 {
    if let Ok(v) = row.try_get::<Option<i64>, _>(col) {
        return v.unwrap_or(0);
    }
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(col) {
        return v.trunc() as i64;
    }
    debug!(player = name, column = col, "Malformed counter read as zero");
    0
}

fn invalid(name: &str, reason: &str) -> FantasyError {
    FantasyError::InvalidRecord {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Expected-points scoring.
//!
//! Maps a player's raw performance counters to a single integer used to
//! rank candidates. Weights default to the league's published points table
//! and can be overridden from `config.toml`.

use serde::Deserialize;

use crate::types::{Player, Stats};

/// Points per counter. Penalty weights (`conceded_penalty`, cards) are
/// magnitudes and are subtracted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringWeights {
    pub tackle: i64,
    pub conceded_penalty: i64,
    pub defender_beaten: i64,
    /// Metres carried per point (floor division). Zero disables the term.
    pub metres_per_point: i64,
    pub kick_50_22: i64,
    pub lineout_steal: i64,
    pub breakdown_steal: i64,
    pub try_scored: i64,
    pub assist: i64,
    pub conversion: i64,
    pub penalty_kick: i64,
    pub drop_goal: i64,
    pub yellow_card: i64,
    pub red_card: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tackle: 1,
            conceded_penalty: 1,
            defender_beaten: 2,
            metres_per_point: 10,
            kick_50_22: 7,
            lineout_steal: 7,
            breakdown_steal: 5,
            try_scored: 10,
            assist: 4,
            conversion: 2,
            penalty_kick: 3,
            drop_goal: 5,
            yellow_card: 3,
            red_card: 6,
        }
    }
}

impl ScoringWeights {
    /// Expected points for a set of counters.
    pub fn score(&self, stats: &Stats) -> i64 {
        // Counters come straight from the store, so every step saturates.
        let metres = stats
            .metres_carried
            .checked_div_euclid(self.metres_per_point)
            .unwrap_or(0);

        let gains = [
            (stats.tackles, self.tackle),
            (stats.defenders_beaten, self.defender_beaten),
            (stats.kicks_50_22, self.kick_50_22),
            (stats.lineout_steals, self.lineout_steal),
            (stats.breakdown_steals, self.breakdown_steal),
            (stats.tries, self.try_scored),
            (stats.assists, self.assist),
            (stats.conversions, self.conversion),
            (stats.penalty_kicks, self.penalty_kick),
            (stats.drop_goals, self.drop_goal),
        ];
        let losses = [
            (stats.conceded_penalties, self.conceded_penalty),
            (stats.yellow_cards, self.yellow_card),
            (stats.red_cards, self.red_card),
        ];

        let gained = gains
            .iter()
            .fold(metres, |acc, &(n, w)| acc.saturating_add(n.saturating_mul(w)));
        losses
            .iter()
            .fold(gained, |acc, &(n, w)| acc.saturating_sub(n.saturating_mul(w)))
    }

    /// Expected points for a player.
    pub fn score_player(&self, player: &Player) -> i64 {
        self.score(&player.stats)
    }
}

/// Expected points under the default points table.
pub fn expected_points(player: &Player) -> i64 {
    ScoringWeights::default().score_player(player)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

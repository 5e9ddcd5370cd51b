//! Captain and supersub roles.
//!
//! The captain's points count double and the supersub's points count
//! quadruple in the team total. Multipliers only apply when totals are
//! aggregated; the selector ranks on raw points, except that a supersub
//! picked during backfill must have its multiplied points fit the
//! remaining budget.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::Selection;

/// Role multipliers applied to the team total.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoleMultipliers {
    pub captain: i64,
    pub supersub: i64,
}

impl Default for RoleMultipliers {
    fn default() -> Self {
        Self {
            captain: 2,
            supersub: 4,
        }
    }
}

impl RoleMultipliers {
    /// Extra points the captain adds on top of its own roster line.
    pub fn captain_bonus(&self, points: i64) -> i64 {
        points.saturating_mul(self.captain.saturating_sub(1))
    }

    /// Points the supersub adds to the total. This is added whether or not
    /// the supersub also has a roster line of its own.
    pub fn supersub_bonus(&self, points: i64) -> i64 {
        points.saturating_mul(self.supersub)
    }

    /// Backfill threshold: multiplied points must not exceed what is left.
    pub fn supersub_fits(&self, points: i64, remaining: Decimal) -> bool {
        Decimal::from(points.saturating_mul(self.supersub)) <= remaining
    }

    /// Team total: every roster line once, plus the captain and supersub
    /// bonuses.
    pub fn team_points(&self, selection: &Selection) -> i64 {
        let base = selection
            .roster
            .iter()
            .fold(0i64, |acc, s| acc.saturating_add(s.points));
        let captain = selection
            .captain
            .as_ref()
            .map_or(0, |c| self.captain_bonus(c.points));
        let supersub = selection
            .supersub
            .as_ref()
            .map_or(0, |s| self.supersub_bonus(s.points));
        base.saturating_add(captain).saturating_add(supersub)
    }
}

/// Position of the first highest value.
pub fn strongest<I>(points: I) -> Option<usize>
where
    I: IntoIterator<Item = i64>,
{
    let mut best: Option<(usize, i64)> = None;
    for (i, p) in points.into_iter().enumerate() {
        if best.map_or(true, |(_, b)| p > b) {
            best = Some((i, p));
        }
    }
    best.map(|(i, _)| i)
}

/// Position of the first lowest value.
pub fn weakest<I>(points: I) -> Option<usize>
where
    I: IntoIterator<Item = i64>,
{
    let mut worst: Option<(usize, i64)> = None;
    for (i, p) in points.into_iter().enumerate() {
        if worst.map_or(true, |(_, w)| p < w) {
            worst = Some((i, p));
        }
    }
    worst.map(|(i, _)| i)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

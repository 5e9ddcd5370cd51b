//! Squad constraints.
//!
//! Roster size, per-position quotas and the optional per-country cap, plus
//! the running tallies the selector checks them against.

use std::collections::{BTreeMap, HashMap};

use crate::types::{Country, Player, Position};

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Squad shape. Positions missing from `quotas` have a quota of zero and can
/// never take a start slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SquadRules {
    pub roster_size: usize,
    pub quotas: HashMap<Position, usize>,
    /// Hard cap on start slots per country. `None` tallies without limiting.
    pub max_per_country: Option<usize>,
}

impl Default for SquadRules {
    fn default() -> Self {
        Self {
            roster_size: 15,
            quotas: Self::rugby_union_quotas(),
            max_per_country: None,
        }
    }
}

impl SquadRules {
    /// The standard XV: 3-2-1-1 backs, 3-2-2-1 forwards.
    pub fn rugby_union_quotas() -> HashMap<Position, usize> {
        HashMap::from([
            (Position::BackThree, 3),
            (Position::Centre, 2),
            (Position::FlyHalf, 1),
            (Position::ScrumHalf, 1),
            (Position::BackRow, 3),
            (Position::SecondRow, 2),
            (Position::Prop, 2),
            (Position::Hooker, 1),
        ])
    }

    pub fn quota_for(&self, position: &Position) -> usize {
        self.quotas.get(position).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Start slots taken so far, by position and by country.
#[derive(Debug, Clone, Default)]
pub struct SquadTally {
    positions: HashMap<Position, usize>,
    countries: BTreeMap<Country, usize>,
}

impl SquadTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position_count(&self, position: &Position) -> usize {
        self.positions.get(position).copied().unwrap_or(0)
    }

    pub fn country_count(&self, country: &Country) -> usize {
        self.countries.get(country).copied().unwrap_or(0)
    }

    /// Whether `player` fits a start slot without breaking a quota or the
    /// country cap. Call-up and budget are the caller's concern.
    pub fn has_room(&self, player: &Player, rules: &SquadRules) -> bool {
        if self.position_count(&player.position) >= rules.quota_for(&player.position) {
            return false;
        }
        match rules.max_per_country {
            Some(cap) => self.country_count(&player.country) < cap,
            None => true,
        }
    }

    /// Count `player` into a start slot.
    pub fn record(&mut self, player: &Player) {
        *self.positions.entry(player.position.clone()).or_insert(0) += 1;
        *self.countries.entry(player.country.clone()).or_insert(0) += 1;
    }

    /// Undo a `record`.
    pub fn release(&mut self, player: &Player) {
        if let Some(n) = self.positions.get_mut(&player.position) {
            *n = n.saturating_sub(1);
        }
        if let Some(n) = self.countries.get_mut(&player.country) {
            *n = n.saturating_sub(1);
        }
    }

    /// Country tally, zero entries dropped.
    pub fn countries(&self) -> BTreeMap<Country, usize> {
        self.countries
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(c, n)| (c.clone(), *n))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

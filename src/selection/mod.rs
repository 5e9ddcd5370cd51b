//! Squad selection: greedy fill, role assignment, budget repair.
//!
//! Candidates are ranked by expected points and taken greedily into start
//! slots subject to position quotas and budget. The strongest starter is
//! held out as captain while remaining slots are backfilled, then
//! reinstated at the head of the roster. A reserve is designated supersub
//! along the way or, failing that, from the pool in its original order.
//! Finally the weakest starters are dropped until the spend fits the budget.
//!
//! Infeasible pools never fail: the result is simply a shorter roster or a
//! missing role.

pub mod ledger;
pub mod roles;
pub mod rules;

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::scoring::ScoringWeights;
use crate::types::{Country, Player};
use ledger::BudgetLedger;
use roles::{strongest, weakest, RoleMultipliers};
use rules::{SquadRules, SquadTally};

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A player taken into the squad, with the points it was ranked on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPlayer {
    /// Position of the player in the input pool.
    pub pool_index: usize,
    pub player: Player,
    pub points: i64,
}

/// Outcome of one selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Final roster, captain first. May also contain the supersub when it
    /// was won during backfill.
    pub roster: Vec<SelectedPlayer>,
    pub captain: Option<SelectedPlayer>,
    pub supersub: Option<SelectedPlayer>,
    pub budget: Decimal,
    pub total_spent: Decimal,
    /// Start slots per country.
    pub country_tally: BTreeMap<Country, usize>,
}

impl Selection {
    pub fn remaining(&self) -> Decimal {
        self.budget - self.total_spent
    }

    pub fn is_captain(&self, pool_index: usize) -> bool {
        self.captain.as_ref().is_some_and(|c| c.pool_index == pool_index)
    }

    pub fn is_supersub(&self, pool_index: usize) -> bool {
        self.supersub.as_ref().is_some_and(|s| s.pool_index == pool_index)
    }

    /// Whether the supersub also holds a roster line.
    pub fn supersub_in_roster(&self) -> bool {
        self.roster.iter().any(|s| self.is_supersub(s.pool_index))
    }

    /// Roster members holding start slots (everyone but an in-roster
    /// supersub).
    pub fn starters(&self) -> impl Iterator<Item = &SelectedPlayer> {
        self.roster.iter().filter(|s| !self.is_supersub(s.pool_index))
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// A pool entry with its precomputed points.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    index: usize,
    player: &'a Player,
    points: i64,
}

impl Candidate<'_> {
    fn to_selected(self) -> SelectedPlayer {
        SelectedPlayer {
            pool_index: self.index,
            player: self.player.clone(),
            points: self.points,
        }
    }
}

/// Which slot a backfill pick fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Start,
    Supersub,
}

/// Greedy squad selector. Stateless between runs.
#[derive(Debug, Clone, Default)]
pub struct SquadSelector {
    rules: SquadRules,
    weights: ScoringWeights,
    roles: RoleMultipliers,
}

impl SquadSelector {
    pub fn new(rules: SquadRules, weights: ScoringWeights, roles: RoleMultipliers) -> Self {
        Self {
            rules,
            weights,
            roles,
        }
    }

    pub fn rules(&self) -> &SquadRules {
        &self.rules
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn roles(&self) -> &RoleMultipliers {
        &self.roles
    }

    /// Select a squad from `pool` within `budget`. The pool is not modified.
    pub fn select(&self, pool: &[Player], budget: Decimal) -> Selection {
        let in_pool_order: Vec<Candidate<'_>> = pool
            .iter()
            .enumerate()
            .map(|(index, player)| Candidate {
                index,
                player,
                points: self.weights.score_player(player),
            })
            .collect();

        // Stable: equal points keep pool order.
        let mut ranked = in_pool_order.clone();
        ranked.sort_by(|a, b| b.points.cmp(&a.points));

        let mut pass = SelectionPass::new(&self.rules, &self.roles, budget);
        pass.primary(&ranked);
        pass.hold_out_captain();
        pass.backfill(&ranked);
        pass.reinstate_captain();
        pass.fallback_supersub(&in_pool_order);
        pass.repair();
        let selection = pass.finish();

        info!(
            pool = pool.len(),
            roster = selection.roster.len(),
            captain = selection.captain.as_ref().map(|c| c.player.name.as_str()),
            supersub = selection.supersub.as_ref().map(|s| s.player.name.as_str()),
            spent = %selection.total_spent,
            budget = %budget,
            "Squad selected"
        );

        selection
    }
}

// ---------------------------------------------------------------------------
// Selection pass
// ---------------------------------------------------------------------------

/// Mutable state of a single run. A player is selected iff it is charged.
struct SelectionPass<'a> {
    rules: &'a SquadRules,
    roles: &'a RoleMultipliers,
    ledger: BudgetLedger,
    tally: SquadTally,
    roster: Vec<Candidate<'a>>,
    captain: Option<Candidate<'a>>,
    supersub: Option<Candidate<'a>>,
}

impl<'a> SelectionPass<'a> {
    fn new(rules: &'a SquadRules, roles: &'a RoleMultipliers, budget: Decimal) -> Self {
        Self {
            rules,
            roles,
            ledger: BudgetLedger::new(budget),
            tally: SquadTally::new(),
            roster: Vec::new(),
            captain: None,
            supersub: None,
        }
    }

    fn is_supersub(&self, index: usize) -> bool {
        self.supersub.is_some_and(|s| s.index == index)
    }

    /// Start slots taken, counting a held-out captain.
    fn starters_taken(&self) -> usize {
        let in_roster = self.roster.iter().filter(|c| !self.is_supersub(c.index)).count();
        in_roster + usize::from(self.captain.is_some())
    }

    fn add_starter(&mut self, c: Candidate<'a>) {
        let charged = self.ledger.charge(c.index, c.player.value);
        debug_assert!(charged, "{} charged twice", c.player.name);
        self.tally.record(c.player);
        self.roster.push(c);
        debug!(
            player = %c.player.name,
            position = %c.player.position,
            points = c.points,
            remaining = %self.ledger.remaining(),
            "Starter selected"
        );
    }

    fn set_supersub(&mut self, c: Candidate<'a>) {
        let charged = self.ledger.charge(c.index, c.player.value);
        debug_assert!(charged, "{} charged twice", c.player.name);
        self.supersub = Some(c);
        debug!(
            player = %c.player.name,
            points = c.points,
            remaining = %self.ledger.remaining(),
            "Supersub designated"
        );
    }

    /// One pass in rank order: fill start slots, and take the first
    /// affordable reserve as supersub.
    fn primary(&mut self, ranked: &[Candidate<'a>]) {
        for &c in ranked {
            if self.roster.len() >= self.rules.roster_size {
                break;
            }
            if !self.ledger.can_afford(c.player.value) {
                continue;
            }
            if c.player.is_starter() && self.tally.has_room(c.player, self.rules) {
                self.add_starter(c);
            } else if c.player.is_reserve() && self.supersub.is_none() {
                self.set_supersub(c);
            }
        }
        info!(
            starters = self.roster.len(),
            supersub = self.supersub.is_some(),
            remaining = %self.ledger.remaining(),
            "Primary pass complete"
        );
    }

    /// Lift the strongest starter out of the roster. It stays charged and
    /// keeps its quota slot.
    fn hold_out_captain(&mut self) {
        if let Some(i) = strongest(self.roster.iter().map(|c| c.points)) {
            let captain = self.roster.remove(i);
            debug!(player = %captain.player.name, points = captain.points, "Captain chosen");
            self.captain = Some(captain);
        }
    }

    /// Fill the roster back up, best eligible candidate first. Start picks
    /// stop once the start slots (held-out captain included) are full. A
    /// reserve can win the pick if no supersub is set yet and its
    /// multiplied points fit what is left of the budget.
    fn backfill(&mut self, ranked: &[Candidate<'a>]) {
        while self.roster.len() < self.rules.roster_size {
            let remaining = self.ledger.remaining();
            let start_open = self.starters_taken() < self.rules.roster_size;
            let mut best: Option<(Candidate<'a>, Slot)> = None;

            for &c in ranked {
                if self.ledger.is_charged(c.index) || c.player.value > remaining {
                    continue;
                }
                let slot = if start_open
                    && c.player.is_starter()
                    && self.tally.has_room(c.player, self.rules)
                {
                    Slot::Start
                } else if c.player.is_reserve()
                    && self.supersub.is_none()
                    && self.roles.supersub_fits(c.points, remaining)
                {
                    Slot::Supersub
                } else {
                    continue;
                };
                if best.map_or(true, |(b, _)| c.points > b.points) {
                    best = Some((c, slot));
                }
            }

            match best {
                Some((c, Slot::Start)) => self.add_starter(c),
                Some((c, Slot::Supersub)) => {
                    self.set_supersub(c);
                    self.roster.push(c);
                }
                None => {
                    debug!(roster = self.roster.len(), "No eligible backfill candidate");
                    break;
                }
            }
        }
    }

    fn reinstate_captain(&mut self) {
        if let Some(captain) = self.captain {
            self.roster.insert(0, captain);
        }
    }

    /// No supersub yet: take the first affordable unselected reserve in
    /// pool order.
    fn fallback_supersub(&mut self, in_pool_order: &[Candidate<'a>]) {
        if self.supersub.is_some() {
            return;
        }
        let pick = in_pool_order.iter().copied().find(|c| {
            c.player.is_reserve()
                && !self.ledger.is_charged(c.index)
                && self.ledger.can_afford(c.player.value)
        });
        match pick {
            Some(c) => self.set_supersub(c),
            None => debug!("No affordable reserve for supersub"),
        }
    }

    /// Drop the weakest roster members until the spend fits.
    fn repair(&mut self) {
        while self.ledger.remaining() < Decimal::ZERO {
            let Some(i) = weakest(self.roster.iter().map(|c| c.points)) else {
                break;
            };
            let dropped = self.roster.remove(i);
            self.ledger.refund(dropped.index);

            if self.is_supersub(dropped.index) {
                self.supersub = None;
            } else {
                self.tally.release(dropped.player);
            }
            if self.captain.is_some_and(|c| c.index == dropped.index) {
                self.captain = None;
            }
            warn!(
                player = %dropped.player.name,
                points = dropped.points,
                remaining = %self.ledger.remaining(),
                "Dropped to fit budget"
            );
        }
    }

    fn finish(self) -> Selection {
        let mut selected: BTreeSet<usize> = self.roster.iter().map(|c| c.index).collect();
        selected.extend(self.captain.map(|c| c.index));
        selected.extend(self.supersub.map(|s| s.index));
        // A negative budget is overspent from the start; anything else
        // out of balance is a bookkeeping bug.
        let balanced = self.ledger.reconcile(&selected);
        debug_assert!(balanced || self.ledger.budget() < Decimal::ZERO);

        Selection {
            roster: self.roster.iter().map(|c| c.to_selected()).collect(),
            captain: self.captain.map(Candidate::to_selected),
            supersub: self.supersub.map(Candidate::to_selected),
            budget: self.ledger.budget(),
            total_spent: self.ledger.spent(),
            country_tally: self.tally.countries(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

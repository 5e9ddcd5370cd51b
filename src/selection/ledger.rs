//! Budget ledger.
//!
//! Records one charge per selected pool entry. Moving a player around the
//! roster never touches the ledger, so every player is charged exactly once
//! no matter how often the selector reshuffles roles.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::warn;

/// Charges against a fixed budget, keyed by pool index.
#[derive(Debug, Clone)]
pub struct BudgetLedger {
    budget: Decimal,
    charges: BTreeMap<usize, Decimal>,
}

impl BudgetLedger {
    pub fn new(budget: Decimal) -> Self {
        Self {
            budget,
            charges: BTreeMap::new(),
        }
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    /// Total charged so far.
    pub fn spent(&self) -> Decimal {
        self.charges.values().copied().sum()
    }

    /// Budget left. Negative only if a caller charged past it.
    pub fn remaining(&self) -> Decimal {
        self.budget - self.spent()
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        amount <= self.remaining()
    }

    pub fn is_charged(&self, key: usize) -> bool {
        self.charges.contains_key(&key)
    }

    /// Charge `key`. Returns false, leaving the ledger unchanged, if `key`
    /// was already charged.
    pub fn charge(&mut self, key: usize, amount: Decimal) -> bool {
        if self.charges.contains_key(&key) {
            return false;
        }
        self.charges.insert(key, amount);
        true
    }

    /// Refund `key`, returning what it had been charged.
    pub fn refund(&mut self, key: usize) -> Option<Decimal> {
        self.charges.remove(&key)
    }

    /// Check that the charged set is exactly `selected` and the spend is
    /// within budget.
    pub fn reconcile(&self, selected: &BTreeSet<usize>) -> bool {
        let charged: BTreeSet<usize> = self.charges.keys().copied().collect();
        let mut ok = true;

        if &charged != selected {
            warn!(
                charged = ?charged,
                selected = ?selected,
                "Ledger charges do not match the selected players"
            );
            ok = false;
        }
        if self.spent() > self.budget {
            warn!(
                spent = %self.spent(),
                budget = %self.budget,
                "Ledger spend exceeds budget"
            );
            ok = false;
        }
        ok
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

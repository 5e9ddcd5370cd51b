//! Property checks on the selector over seeded random pools.

use std::collections::{HashMap, HashSet};

use fantasy_xv::scoring::ScoringWeights;
use fantasy_xv::selection::roles::RoleMultipliers;
use fantasy_xv::selection::rules::SquadRules;
use fantasy_xv::selection::{Selection, SquadSelector};
use fantasy_xv::types::{CallUp, Country, Player, Position, Stats};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SEEDS: u64 = 200;

fn random_stats(rng: &mut SmallRng) -> Stats {
    Stats {
        tackles: rng.gen_range(0..25),
        conceded_penalties: rng.gen_range(0..4),
        defenders_beaten: rng.gen_range(0..6),
        metres_carried: rng.gen_range(0..150),
        tries: rng.gen_range(0..3),
        assists: rng.gen_range(0..3),
        conversions: rng.gen_range(0..5),
        penalty_kicks: rng.gen_range(0..4),
        yellow_cards: rng.gen_range(0..2),
        ..Default::default()
    }
}

fn random_pool(rng: &mut SmallRng) -> Vec<Player> {
    let positions = Position::rugby_union();
    let countries = Country::six_nations();
    let size = rng.gen_range(0..60);

    (0..size)
        .map(|i| {
            let position = positions[rng.gen_range(0..positions.len())].clone();
            let country = countries[rng.gen_range(0..countries.len())].clone();
            let call_up = if rng.gen_bool(0.25) { CallUp::Sub } else { CallUp::Start };
            let value = Decimal::new(rng.gen_range(0..300), 1);
            Player::new(format!("p{i}"), country, value, position, call_up)
                .with_stats(random_stats(rng))
        })
        .collect()
}

fn random_budget(rng: &mut SmallRng) -> Decimal {
    Decimal::new(rng.gen_range(0..3000), 1)
}

/// Everything that must hold for any pool and non-negative budget.
fn check_selection(selector: &SquadSelector, pool: &[Player], budget: Decimal, sel: &Selection) {
    let rules = selector.rules();

    // Start slots and quotas.
    let starters: Vec<_> = sel.starters().collect();
    assert!(starters.len() <= rules.roster_size);
    let mut per_position: HashMap<&Position, usize> = HashMap::new();
    for s in &starters {
        assert_eq!(s.player.call_up, CallUp::Start);
        *per_position.entry(&s.player.position).or_default() += 1;
    }
    for (position, count) in per_position {
        assert!(count <= rules.quota_for(position), "{position} over quota");
    }

    // Nobody appears twice.
    let mut seen = HashSet::new();
    for s in &sel.roster {
        assert!(seen.insert(s.pool_index), "duplicate roster entry {}", s.player.name);
    }

    // Spend equals the value of everyone selected, and fits the budget.
    let mut selected = seen.clone();
    if let Some(sub) = &sel.supersub {
        assert_eq!(sub.player.call_up, CallUp::Sub);
        selected.insert(sub.pool_index);
    }
    let charged: Decimal = selected.iter().map(|&i| pool[i].value).sum();
    assert_eq!(sel.total_spent, charged);
    assert!(sel.total_spent <= budget);

    // Captain leads the roster and outscores every starter.
    match &sel.captain {
        Some(captain) => {
            assert_eq!(sel.roster[0].pool_index, captain.pool_index);
            assert!(starters.iter().all(|s| s.points <= captain.points));
        }
        None => assert!(starters.is_empty()),
    }

    // Points are the scoring of the untouched pool record.
    for s in &sel.roster {
        assert_eq!(s.player, pool[s.pool_index]);
        assert_eq!(s.points, selector.weights().score_player(&pool[s.pool_index]));
    }
}

#[test]
fn test_random_pools_respect_invariants() {
    let selector = SquadSelector::default();
    for seed in 0..SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let pool = random_pool(&mut rng);
        let budget = random_budget(&mut rng);
        let before = pool.clone();

        let sel = selector.select(&pool, budget);

        assert_eq!(pool, before, "seed {seed}: pool modified");
        check_selection(&selector, &pool, budget, &sel);
    }
}

#[test]
fn test_short_roster_with_loose_quotas() {
    // Quotas total fifteen, but only ten start slots exist.
    let rules = SquadRules { roster_size: 10, ..SquadRules::default() };
    let selector = SquadSelector::new(rules, ScoringWeights::default(), RoleMultipliers::default());
    for seed in 0..SEEDS {
        let mut rng = SmallRng::seed_from_u64(seed);
        let pool = random_pool(&mut rng);
        let budget = random_budget(&mut rng);

        let sel = selector.select(&pool, budget);
        check_selection(&selector, &pool, budget, &sel);
        assert!(sel.roster.len() <= 11);
    }
}

#[test]
fn test_selection_is_deterministic() {
    let selector = SquadSelector::default();
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let pool = random_pool(&mut rng);
        let budget = random_budget(&mut rng);
        assert_eq!(selector.select(&pool, budget), selector.select(&pool, budget));
    }
}

#[test]
fn test_uniformly_overpriced_pool_stays_within_budget() {
    // Every player costs just over budget / 15, so a full XV is never
    // affordable.
    let budget = dec!(239.8);
    let price = dec!(16.1);
    let selector = SquadSelector::default();

    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let pool: Vec<Player> = random_pool(&mut rng)
            .into_iter()
            .map(|mut p| {
                p.value = price;
                p
            })
            .collect();

        let sel = selector.select(&pool, budget);
        check_selection(&selector, &pool, budget, &sel);
        assert!(sel.roster.len() + usize::from(sel.supersub.is_some() && !sel.supersub_in_roster()) <= 14);
    }
}

#[test]
fn test_every_player_above_budget_selects_nobody() {
    let mut rng = SmallRng::seed_from_u64(7);
    let pool: Vec<Player> = random_pool(&mut rng)
        .into_iter()
        .map(|mut p| {
            p.value = dec!(50);
            p
        })
        .collect();

    let sel = SquadSelector::default().select(&pool, dec!(49.9));
    assert!(sel.roster.is_empty());
    assert!(sel.captain.is_none());
    assert!(sel.supersub.is_none());
    assert_eq!(sel.total_spent, Decimal::ZERO);
}

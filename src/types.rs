//! Shared types for the Fantasy XV selector.
//!
//! These types form the data model used across all modules: the candidate
//! player record as loaded from the store, its performance counters, and
//! the small closed vocabularies (country, position, call-up) that the
//! selection rules key on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A candidate player. `name` is the unique key in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub country: Country,
    /// Cost against the squad budget (never negative).
    pub value: Decimal,
    pub position: Position,
    pub call_up: CallUp,
    /// The store's `supersub` column ("yes"/"no"). Carried through the
    /// round trip untouched; selection never reads it.
    #[serde(default)]
    pub supersub_tag: bool,
    #[serde(default)]
    pub stats: Stats,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} [{}] value={}",
            self.name, self.country, self.position, self.call_up, self.value,
        )
    }
}

impl Player {
    /// Build a player with zeroed counters.
    pub fn new(
        name: impl Into<String>,
        country: Country,
        value: Decimal,
        position: Position,
        call_up: CallUp,
    ) -> Self {
        Player {
            name: name.into(),
            country,
            value,
            position,
            call_up,
            supersub_tag: false,
            stats: Stats::default(),
        }
    }

    /// Replace the performance counters.
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    /// Eligible for a main-roster (start) slot.
    pub fn is_starter(&self) -> bool {
        self.call_up == CallUp::Start
    }

    /// Eligible for the reserve (supersub) slot.
    pub fn is_reserve(&self) -> bool {
        self.call_up == CallUp::Sub
    }
}

/// Raw performance counters. Missing values are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub tackles: i64,
    pub conceded_penalties: i64,
    pub defenders_beaten: i64,
    pub metres_carried: i64,
    pub kicks_50_22: i64,
    pub lineout_steals: i64,
    pub breakdown_steals: i64,
    pub tries: i64,
    pub assists: i64,
    pub conversions: i64,
    pub penalty_kicks: i64,
    pub drop_goals: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Main-roster vs reserve eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallUp {
    Start,
    Sub,
}

impl CallUp {
    /// Store representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallUp::Start => "start",
            CallUp::Sub => "sub",
        }
    }
}

impl fmt::Display for CallUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallUp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "starter" => Ok(CallUp::Start),
            "sub" | "bench" | "reserve" => Ok(CallUp::Sub),
            _ => Err(anyhow::anyhow!("Unknown call-up status: {s}")),
        }
    }
}

/// Playing position. The eight rugby union positions are named; anything
/// else the store holds is kept verbatim as `Other` and gets whatever quota
/// the rules assign it (zero unless configured).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    BackThree,
    Centre,
    FlyHalf,
    ScrumHalf,
    BackRow,
    SecondRow,
    Prop,
    Hooker,
    Other(String),
}

impl Position {
    /// The eight named positions, backs first.
    pub fn rugby_union() -> [Position; 8] {
        [
            Position::BackThree,
            Position::Centre,
            Position::FlyHalf,
            Position::ScrumHalf,
            Position::BackRow,
            Position::SecondRow,
            Position::Prop,
            Position::Hooker,
        ]
    }

    /// Store representation (snake_case).
    pub fn as_str(&self) -> &str {
        match self {
            Position::BackThree => "back_three",
            Position::Centre => "centre",
            Position::FlyHalf => "fly_half",
            Position::ScrumHalf => "scrum_half",
            Position::BackRow => "back_row",
            Position::SecondRow => "second_row",
            Position::Prop => "prop",
            Position::Hooker => "hooker",
            Position::Other(s) => s,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Position {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "back_three" => Position::BackThree,
            "centre" | "center" => Position::Centre,
            "fly_half" => Position::FlyHalf,
            "scrum_half" => Position::ScrumHalf,
            "back_row" => Position::BackRow,
            "second_row" => Position::SecondRow,
            "prop" => Position::Prop,
            "hooker" => Position::Hooker,
            _ => Position::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for Position {
    fn from(s: String) -> Self {
        Position::from(s.as_str())
    }
}

impl From<Position> for String {
    fn from(p: Position) -> Self {
        p.as_str().to_string()
    }
}

/// Nationality, used for the country tally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Country {
    Ireland,
    France,
    Wales,
    Scotland,
    England,
    Italy,
    Other(String),
}

impl Country {
    /// The six named nations.
    pub fn six_nations() -> [Country; 6] {
        [
            Country::Ireland,
            Country::France,
            Country::Wales,
            Country::Scotland,
            Country::England,
            Country::Italy,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Country::Ireland => "Ireland",
            Country::France => "France",
            Country::Wales => "Wales",
            Country::Scotland => "Scotland",
            Country::England => "England",
            Country::Italy => "Italy",
            Country::Other(s) => s,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Country {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ireland" => Country::Ireland,
            "france" => Country::France,
            "wales" => Country::Wales,
            "scotland" => Country::Scotland,
            "england" => Country::England,
            "italy" => Country::Italy,
            _ => Country::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for Country {
    fn from(s: String) -> Self {
        Country::from(s.as_str())
    }
}

impl From<Country> for String {
    fn from(c: Country) -> Self {
        c.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum FantasyError {
    #[error("Invalid player record ({name}): {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section has defaults, so a partial file (or none at all) still yields
//! the standard XV rules with the round-two budget.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::scoring::ScoringWeights;
use crate::selection::roles::RoleMultipliers;
use crate::selection::rules::SquadRules;
use crate::selection::SquadSelector;
use crate::types::{FantasyError, Position};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub selection: SelectionConfig,
    pub store: StoreConfig,
    pub rules: RulesConfig,
    pub roles: RoleMultipliers,
    pub scoring: ScoringWeights,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SelectionConfig {
    pub budget: Decimal,
    pub report_path: String,
    /// Where to save the JSON snapshot of the run, if anywhere.
    pub snapshot_path: Option<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            budget: dec!(239.8),
            report_path: "selected_team.txt".to_string(),
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://players.db".to_string(),
            create_if_missing: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RulesConfig {
    pub roster_size: usize,
    pub max_per_country: Option<usize>,
    /// Position name (store text) → start slots.
    pub quotas: HashMap<String, usize>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            roster_size: 15,
            max_per_country: None,
            quotas: SquadRules::rugby_union_quotas()
                .into_iter()
                .map(|(p, n)| (p.to_string(), n))
                .collect(),
        }
    }
}

impl RulesConfig {
    pub fn to_rules(&self) -> SquadRules {
        SquadRules {
            roster_size: self.roster_size,
            quotas: self
                .quotas
                .iter()
                .map(|(p, n)| (Position::from(p.as_str()), *n))
                .collect(),
            max_per_country: self.max_per_country,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject values the selector cannot work with.
    pub fn validate(&self) -> Result<(), FantasyError> {
        if self.selection.budget < Decimal::ZERO {
            return Err(FantasyError::Config(format!(
                "budget must not be negative (got {})",
                self.selection.budget
            )));
        }
        if self.rules.roster_size == 0 {
            return Err(FantasyError::Config("roster_size must be at least 1".into()));
        }
        if self.scoring.metres_per_point < 0 {
            return Err(FantasyError::Config("metres_per_point must not be negative".into()));
        }
        Ok(())
    }

    /// Build the selector these settings describe.
    pub fn selector(&self) -> SquadSelector {
        SquadSelector::new(self.rules.to_rules(), self.scoring.clone(), self.roles)
    }
}

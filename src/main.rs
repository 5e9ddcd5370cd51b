//! Fantasy XV: budget-constrained rugby fantasy squad selector
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the player store and runs one selection, writing the team
//! sheet to the configured report path.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

use fantasy_xv::config::AppConfig;
use fantasy_xv::runner::run_selection;
use fantasy_xv::storage::sqlite::SqlitePlayerStore;

const BANNER: &str = r#"
 _____           _                   __  ____     __
|  ___|_ _ _ __ | |_ __ _ ___ _   _  \ \/ /\ \   / /
| |_ / _` | '_ \| __/ _` / __| | | |  \  /  \ \ / /
|  _| (_| | | | | || (_| \__ \ |_| |  /  \   \ V /
|_|  \__,_|_| |_|\__\__,_|___/\__, | /_/\_\   \_/
                              |___/
  Budget-constrained rugby squad selector
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = std::env::var("FANTASY_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let mut cfg = AppConfig::load_or_default(&config_path)?;

    init_logging();
    println!("{BANNER}");

    // First positional argument overrides the configured budget.
    if let Some(arg) = std::env::args().nth(1) {
        cfg.selection.budget = Decimal::from_str(arg.trim())
            .with_context(|| format!("Invalid budget argument: {arg}"))?;
    }
    cfg.validate()?;

    info!(
        config = %config_path,
        budget = %cfg.selection.budget,
        roster_size = cfg.rules.roster_size,
        database_url = %cfg.store.database_url,
        "Fantasy XV starting up"
    );

    let store = SqlitePlayerStore::connect(&cfg.store.database_url, cfg.store.create_if_missing).await?;
    let summary = run_selection(&store, &cfg).await?;

    println!("Selection written to file {}", summary.report_path);
    Ok(())
}

/// Initialise the tracing subscriber with env-filter and optional JSON output.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fantasy_xv=info"));

    let json_logging = std::env::var("FANTASY_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

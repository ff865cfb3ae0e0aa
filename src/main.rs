//! bossfight - run party-versus-boss battles headlessly

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use bossfight::autopilot::run_battle;
use bossfight::combat::{Battle, Outcome};
use bossfight::config::Config;
use bossfight::db::Database;
use bossfight::records::ResultStore;
use bossfight::roles::build_roster;
use bossfight::{append_event_log, entropy_seed};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turn-based party-versus-boss battles
#[derive(Parser, Debug)]
#[command(name = "bossfight", version, about = "Run party-versus-boss battles")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// SQLite database for results (in-memory when omitted)
    #[arg(short, long)]
    database: Option<String>,

    /// Stop a battle after this many rounds
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Append the battle log as JSON lines to this file
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Number of battles to run
    #[arg(short = 'n', long, default_value_t = 1)]
    battles: u32,

    /// Log as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bossfight=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    // File and environment first, then command-line overrides
    let mut config = Config::load(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.database.is_some() {
        config.database = args.database;
    }
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }
    if args.event_log.is_some() {
        config.event_log = args.event_log;
    }
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    let db = Database::new(config.database.as_deref()).await?;
    let store = ResultStore::new(db.pool().clone());

    let base_seed = config.seed.unwrap_or_else(entropy_seed);
    info!(seed = base_seed, battles = args.battles, "Starting");

    for n in 0..args.battles {
        let seed = base_seed.wrapping_add(n as u64);
        let roster = build_roster(&config.party, &config.boss_name);
        let mut battle = Battle::new(roster, config.rules.clone(), seed);

        let outcome = run_battle(&mut battle, config.max_rounds)?;

        println!("Battle {} (seed {}): {} after {} rounds", n + 1, seed, outcome, battle.round());
        for unit in battle.roster().party() {
            println!("  {}", unit);
        }
        println!(
            "  {} ({:.0}% HP)",
            battle.roster().adversary(),
            battle.adversary_hp_percent()
        );

        if let Some(path) = &config.event_log {
            if let Err(e) = append_event_log(path, battle.events()) {
                warn!("Failed to write battle log to {}: {}", path.display(), e);
            }
        }

        if outcome == Outcome::Undecided {
            warn!(seed, "Battle hit the round cap, result not saved");
            continue;
        }
        if let Some(report) = battle.take_report() {
            if let Err(e) = store.save(&report).await {
                warn!("Failed to save battle result: {}", e);
            }
        }
    }

    let recent = store.recent(5).await?;
    if !recent.is_empty() {
        println!("Recent results:");
        for record in recent {
            println!(
                "  {} {} vs {} in {} rounds",
                record.created_at.format("%Y-%m-%d %H:%M:%S"),
                record.outcome,
                record.boss_name,
                record.rounds
            );
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rondo::api::state::AppState;
use rondo::config::{default_config_toml, AppConfig};
use rondo::export;
use rondo::models::{ParticipantId, Phase, ScoringMode, Tournament};
use rondo::parse_score;
use rondo::standings::is_confirmed;
use rondo::storage::SnapshotStore;

#[derive(Parser)]
#[command(name = "rondo")]
#[command(about = "Local round-robin tournament manager")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.toml
    Init,

    /// Register a participant
    Add {
        /// Display name (duplicates allowed, flagged)
        name: String,
    },

    /// Remove a participant and their results
    Remove {
        /// Name or id
        player: String,
    },

    /// List the roster
    Players,

    /// Record a result between two participants
    Record {
        player_a: String,
        player_b: String,

        /// First participant's score (or w/d/l in win-loss mode)
        score_a: String,

        /// Second participant's score (or w/d/l in win-loss mode)
        score_b: String,
    },

    /// Clear a recorded result
    Clear { player_a: String, player_b: String },

    /// Print the standings table
    Standings,

    /// Print the round-by-round schedule
    Schedule,

    /// Print the full text export
    Export,

    /// Update tournament settings
    Set {
        #[arg(long)]
        title: Option<String>,

        /// "score" or "win-loss"
        #[arg(long)]
        mode: Option<String>,

        #[arg(long)]
        allow_draw: Option<bool>,

        #[arg(long)]
        show_schedule: Option<bool>,

        /// "settings", "register" or "match"
        #[arg(long)]
        phase: Option<String>,
    },

    /// Start the API server
    Serve {
        /// Bind address (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (default from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    let store = SnapshotStore::new(PathBuf::from(&cli.data_dir));
    let defaults = config.default_tournament();

    match cli.command {
        Commands::Init => {
            let path = PathBuf::from(&cli.config);
            if path.exists() {
                bail!("{} already exists, not overwriting", path.display());
            }
            std::fs::write(&path, default_config_toml())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }

        Commands::Add { name } => {
            let mut tournament = store.load(&defaults);
            let registration = tournament.register(&name)?;
            store.save(&tournament)?;
            println!(
                "Registered {} ({})",
                registration.participant.name, registration.participant.id
            );
            if registration.duplicate_name {
                println!("Warning: another participant already uses this name.");
            }
        }

        Commands::Remove { player } => {
            let mut tournament = store.load(&defaults);
            let id = resolve(&tournament, &player)?;
            let removed = tournament.remove(&id)?;
            store.save(&tournament)?;
            println!("Removed {} and their results.", removed.name);
        }

        Commands::Players => {
            let tournament = store.load(&defaults);
            if tournament.players.is_empty() {
                println!("No participants registered yet. Use `rondo add <name>`.");
            } else {
                println!("=== Roster ({}) ===", tournament.players.len());
                for p in &tournament.players {
                    println!("  {:<20} {}", p.name, p.id);
                }
            }
        }

        Commands::Record { player_a, player_b, score_a, score_b } => {
            let mut tournament = store.load(&defaults);
            let p1 = resolve(&tournament, &player_a)?;
            let p2 = resolve(&tournament, &player_b)?;
            let s1 = parse_entry(tournament.mode, &score_a);
            let s2 = parse_entry(tournament.mode, &score_b);
            tournament.record_result(&p1, &p2, s1, s2)?;
            store.save(&tournament)?;

            let confirmed = tournament
                .results
                .view(&p1, &p2)
                .map(|v| is_confirmed(&v, tournament.mode, tournament.allow_draw))
                .unwrap_or(false);
            println!(
                "Recorded {} vs {}: {} - {} ({})",
                player_a,
                player_b,
                fmt_entry(s1),
                fmt_entry(s2),
                if confirmed { "confirmed" } else { "unconfirmed" }
            );
        }

        Commands::Clear { player_a, player_b } => {
            let mut tournament = store.load(&defaults);
            let p1 = resolve(&tournament, &player_a)?;
            let p2 = resolve(&tournament, &player_b)?;
            tournament.clear_result(&p1, &p2)?;
            store.save(&tournament)?;
            println!("Cleared {} vs {}.", player_a, player_b);
        }

        Commands::Standings => {
            let tournament = store.load(&defaults);
            print!("{}", export::standings_text(&tournament, &config.points));
        }

        Commands::Schedule => {
            let tournament = store.load(&defaults);
            print!("{}", export::schedule_text(&tournament));
        }

        Commands::Export => {
            let tournament = store.load(&defaults);
            print!("{}", export::standings_text(&tournament, &config.points));
            if tournament.show_schedule {
                println!();
                print!("{}", export::schedule_text(&tournament));
            }
        }

        Commands::Set { title, mode, allow_draw, show_schedule, phase } => {
            let mut tournament = store.load(&defaults);
            if let Some(title) = title {
                tournament.title = title;
            }
            if let Some(mode) = mode {
                tournament.mode = mode.parse::<ScoringMode>().map_err(anyhow::Error::msg)?;
            }
            if let Some(allow_draw) = allow_draw {
                tournament.allow_draw = allow_draw;
            }
            if let Some(show_schedule) = show_schedule {
                tournament.show_schedule = show_schedule;
            }
            if let Some(phase) = phase {
                tournament.phase = phase.parse::<Phase>().map_err(anyhow::Error::msg)?;
            }
            store.save(&tournament)?;
            println!(
                "Settings: \"{}\", mode {}, draws {}, schedule {}, phase {}",
                tournament.title,
                tournament.mode.label(),
                if tournament.allow_draw { "allowed" } else { "decided" },
                if tournament.show_schedule { "shown" } else { "hidden" },
                tournament.phase.label(),
            );
        }

        Commands::Serve { host, port } => {
            let tournament = store.load(&defaults);
            let state = AppState::new(tournament, store, config.points);
            let app = rondo::api::build_router(state);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("rondo v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);
            println!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Resolve a CLI participant argument: exact id first, then unique
/// case-insensitive name.
fn resolve(tournament: &Tournament, query: &str) -> Result<ParticipantId> {
    if let Some(p) = tournament.players.iter().find(|p| p.id.as_str() == query) {
        return Ok(p.id.clone());
    }
    if let Some(p) = tournament.find_by_name(query) {
        return Ok(p.id.clone());
    }
    let ambiguous = tournament
        .players
        .iter()
        .filter(|p| p.name.eq_ignore_ascii_case(query.trim()))
        .count();
    if ambiguous > 1 {
        bail!("name '{}' is ambiguous, use the participant id instead", query);
    }
    bail!("no participant matches '{}'", query);
}

/// Score entry: numbers in score mode; numbers or w/d/l shorthands in
/// win-loss mode. Anything else reads as "not entered".
fn parse_entry(mode: ScoringMode, raw: &str) -> Option<f64> {
    if mode == ScoringMode::WinLoss {
        match raw.trim().to_lowercase().as_str() {
            "w" | "win" => return Some(1.0),
            "d" | "draw" => return Some(0.5),
            "l" | "loss" => return Some(0.0),
            _ => {}
        }
    }
    parse_score(raw)
}

fn fmt_entry(score: Option<f64>) -> String {
    match score {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
        None => "?".to_string(),
    }
}

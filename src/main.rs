use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_tournament::config::AppConfig;
use swiss_tournament::pairing::{pair_next_round, PairingPolicy};
use swiss_tournament::storage::{JsonlStore, StorageConfig, TournamentStore};
use swiss_tournament::PlayerId;

#[derive(Parser)]
#[command(name = "swiss-tournament")]
#[command(about = "Swiss-system tournament registry and round pairing")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new player
    Register {
        /// Player's full name (need not be unique)
        name: String,
    },

    /// Record the result of a match
    Report {
        /// Id of the player who won
        #[arg(long)]
        winner: u32,

        /// Id of the player who lost
        #[arg(long)]
        loser: u32,
    },

    /// Print the number of registered players
    Count,

    /// Print players ranked by wins
    Standings,

    /// Print the pairings for the next round
    Pairings {
        /// Never pair players who have already met
        #[arg(long)]
        avoid_rematches: bool,
    },

    /// Print the match log
    Matches,

    /// Delete recorded data (both tables when no flag is given)
    Reset {
        /// Delete all match records
        #[arg(long)]
        matches: bool,

        /// Delete all players
        #[arg(long)]
        players: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?
        .with_overrides(cli.data_dir, cli.log_level)
        .context("Invalid command-line options")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Using data directory {:?}", config.data_dir);
    let store = JsonlStore::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Register { name } => {
            let id = store
                .register_player(&name)
                .context("Failed to register player")?;
            println!("Registered {} with id {}", name, id);
        }
        Commands::Report { winner, loser } => {
            let record = store
                .report_match(PlayerId::from(winner), PlayerId::from(loser))
                .context("Failed to report match")?;
            println!(
                "Recorded match {}: {} beat {}",
                record.id,
                record.winner,
                record.loser()
            );
        }
        Commands::Count => {
            println!("{}", store.count_players()?);
        }
        Commands::Standings => {
            let standings = store.player_standings()?;
            println!(
                "{:>4}  {:<24} {:>4} {:>6} {:>7}",
                "ID", "NAME", "WINS", "LOSSES", "MATCHES"
            );
            for s in &standings {
                println!(
                    "{:>4}  {:<24} {:>4} {:>6} {:>7}",
                    s.id,
                    s.name,
                    s.wins,
                    s.losses(),
                    s.matches
                );
            }
        }
        Commands::Pairings { avoid_rematches } => {
            let policy = if avoid_rematches {
                PairingPolicy::AvoidRematches
            } else {
                config.pairing.policy()
            };
            let pairings =
                pair_next_round(&store, policy).context("Failed to pair the next round")?;
            for (i, p) in pairings.iter().enumerate() {
                println!(
                    "Table {:>2}: {} ({}) vs {} ({})",
                    i + 1,
                    p.name1,
                    p.id1,
                    p.name2,
                    p.id2
                );
            }
        }
        Commands::Matches => {
            for m in store.match_history()? {
                println!(
                    "{}  {}  {} vs {}  winner {}",
                    m.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    m.id,
                    m.player1,
                    m.player2,
                    m.winner
                );
            }
        }
        Commands::Reset { matches, players } => {
            let both = !matches && !players;
            if matches || both {
                store.reset_matches()?;
                println!("Deleted all matches");
            }
            if players || both {
                store.reset_players()?;
                println!("Deleted all players");
            }
        }
    }

    Ok(())
}

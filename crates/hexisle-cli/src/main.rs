//! Hexisle map tool: load a map file, check it and shuffle its terrain.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hexisle_core::{Board, Rules};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

use report::BoardSummary;

#[derive(Parser)]
#[command(name = "hexisle")]
#[command(about = "Check and shuffle Hexisle board maps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a map, lay out its rolls and print a summary as JSON
    Check {
        #[command(flatten)]
        board: BoardArgs,
    },
    /// Shuffle terrain and ports, then print the new map text
    Shuffle {
        #[command(flatten)]
        board: BoardArgs,

        /// Seed for the shuffle; random if omitted
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct BoardArgs {
    /// Map file, or "standard" for the bundled island
    map: String,

    /// JSON rules document; flags below override it
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Allow bridges
    #[arg(long)]
    bridges: bool,

    /// Board has a pirate
    #[arg(long)]
    pirate: bool,

    /// Roll sequence, e.g. 5,2,6,3
    #[arg(long, value_delimiter = ',')]
    chits: Option<Vec<u8>>,
}

impl BoardArgs {
    fn rules(&self) -> anyhow::Result<Rules> {
        let mut rules = match &self.rules {
            Some(path) => {
                let json = read(path)?;
                Rules::from_json(&json)
                    .with_context(|| format!("invalid rules in {}", path.display()))?
            }
            None => Rules::default(),
        };
        rules.bridges |= self.bridges;
        rules.pirate |= self.pirate;
        if let Some(chits) = &self.chits {
            rules.chits = chits.clone();
        }
        Ok(rules)
    }

    fn load(&self) -> anyhow::Result<(Board, Vec<hexisle_core::ParseWarning>)> {
        let text = if self.map == "standard" {
            hexisle_core::STANDARD_MAP.to_string()
        } else {
            read(Path::new(&self.map))?
        };
        let (board, warnings) = Board::load_with_warnings(&text, self.rules()?)
            .with_context(|| format!("failed to load {}", self.map))?;
        for warning in &warnings {
            warn!("{}: {}", self.map, warning);
        }
        Ok((board, warnings))
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Check { board } => {
            let (loaded, warnings) = board.load()?;
            info!(
                hexes = loaded.hexes().count(),
                nodes = loaded.node_count(),
                edges = loaded.edge_count(),
                "loaded {}",
                board.map
            );
            let summary = BoardSummary::new(&loaded, &warnings);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Shuffle { board, seed } => {
            let (mut loaded, _) = board.load()?;
            let seed = seed.unwrap_or_else(rand::random);
            info!(seed, "shuffling {}", board.map);
            let mut rng = StdRng::seed_from_u64(seed);
            loaded.shuffle_terrain(&mut rng)?;
            if loaded.has_adjacent_red_rolls() {
                warn!("no arrangement kept 6s and 8s apart");
            }
            print!("{}", loaded.to_text());
        }
    }

    Ok(())
}

//! BJJ Engine - Main Binary
//!
//! Turn-based grappling match engine with a text UI and simulation modes

use anyhow::{bail, Context};
use bjj_engine::{
    catalog::Catalog,
    core::Difficulty,
    game::{
        rng, FixedScriptController, HeuristicController, InteractiveController, MatchController,
        MatchLogger, MatchResult, MatchRunner, MatchState, PlayerController, RandomController,
        VerbosityLevel,
    },
    tournament::{self, TourneyConfig},
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Controller type for the player seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ControllerType {
    /// Text UI controller for human play via stdin
    Tui,
    /// Heuristic controller driven by the AI scoring rules
    Heuristic,
    /// Makes random choices
    Random,
    /// Fixed script controller with predetermined choices (requires --script)
    Fixed,
}

/// Controller types usable in tournaments (no human input)
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TourneyPlayer {
    Heuristic,
    Random,
}

impl From<TourneyPlayer> for tournament::ControllerType {
    fn from(player: TourneyPlayer) -> Self {
        match player {
            TourneyPlayer::Heuristic => tournament::ControllerType::Heuristic,
            TourneyPlayer::Random => tournament::ControllerType::Random,
        }
    }
}

/// Verbosity level for match output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "bjj")]
#[command(about = "BJJ Engine - Turn-Based Grappling Match Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the single-match commands
#[derive(clap::Args)]
struct MatchArgs {
    /// Opponent difficulty (easy, medium, hard)
    #[arg(long, short = 'd', default_value = "medium")]
    difficulty: Difficulty,

    /// Difficulty used by the heuristic player controller
    #[arg(long, default_value = "medium")]
    player_difficulty: Difficulty,

    /// Set random seed for deterministic matches
    #[arg(long)]
    seed: Option<u64>,

    /// Fixed script for the player (space or comma separated option indices, e.g. "0 2 1")
    #[arg(long, value_name = "CHOICES")]
    script: Option<String>,

    /// Load the position/technique catalog from a JSON file instead of the built-in one
    #[arg(long, value_name = "CATALOG_JSON")]
    catalog: Option<PathBuf>,

    /// Verbosity level for match output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, default_value = "normal", short = 'v')]
    verbosity: VerbosityArg,

    /// Print the final result and match state as JSON (silences the match log)
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match against the AI
    Play {
        /// Player controller type
        #[arg(long, value_enum, default_value = "tui")]
        player: ControllerType,

        #[command(flatten)]
        args: MatchArgs,
    },

    /// Simulate one match with an automated player
    Sim {
        /// Player controller type
        #[arg(long, value_enum, default_value = "heuristic")]
        player: ControllerType,

        #[command(flatten)]
        args: MatchArgs,
    },

    /// Run many AI-vs-AI matches in parallel and print statistics
    Tourney {
        /// Number of matches to run
        #[arg(long, short = 'g', default_value = "1000")]
        games: usize,

        /// Base seed; match i uses seed + i
        #[arg(long)]
        seed: Option<u64>,

        /// Player seat controller type
        #[arg(long, value_enum, default_value = "heuristic")]
        player: TourneyPlayer,

        /// Difficulty of the heuristic player seat
        #[arg(long, default_value = "medium")]
        player_difficulty: Difficulty,

        /// Difficulty of the opponent
        #[arg(long, default_value = "medium")]
        ai_difficulty: Difficulty,

        /// Load the catalog from a JSON file
        #[arg(long, value_name = "CATALOG_JSON")]
        catalog: Option<PathBuf>,
    },

    /// Print the built-in catalog as JSON
    Catalog,
}

/// Final report printed with --json
#[derive(Serialize)]
struct JsonReport<'a> {
    seed: Option<u64>,
    result: &'a MatchResult,
    state: &'a MatchState,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { player, args } | Commands::Sim { player, args } => {
            run_single(player, args).await
        }
        Commands::Tourney {
            games,
            seed,
            player,
            player_difficulty,
            ai_difficulty,
            catalog,
        } => {
            let config = TourneyConfig {
                games,
                seed: seed.unwrap_or_else(rand::random),
                player_type: player.into(),
                player_difficulty,
                ai_difficulty,
                catalog: Arc::new(load_catalog(catalog.as_deref()).await?),
            };
            tournament::run_and_report(&config)?;
            Ok(())
        }
        Commands::Catalog => {
            let json = serde_json::to_string_pretty(&Catalog::builtin().to_file_data())?;
            println!("{json}");
            Ok(())
        }
    }
}

async fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => Catalog::load_from_file(path)
            .await
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

/// Parse fixed script input (space or comma separated indices)
fn parse_script(input: &str) -> std::result::Result<Vec<usize>, String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("invalid choice index: '{s}'"))
        })
        .collect()
}

fn build_player(
    kind: ControllerType,
    args: &MatchArgs,
) -> anyhow::Result<Box<dyn PlayerController>> {
    Ok(match kind {
        ControllerType::Tui => Box::new(InteractiveController::new()),
        ControllerType::Heuristic => Box::new(HeuristicController::new(args.player_difficulty)),
        ControllerType::Random => Box::new(match args.seed {
            Some(seed) => RandomController::with_seed(seed.wrapping_add(1)),
            None => RandomController::new(),
        }),
        ControllerType::Fixed => {
            let Some(script) = &args.script else {
                bail!("--player fixed requires --script");
            };
            let choices = parse_script(script).map_err(anyhow::Error::msg)?;
            Box::new(FixedScriptController::new(choices))
        }
    })
}

async fn run_single(kind: ControllerType, args: MatchArgs) -> anyhow::Result<()> {
    let catalog = Arc::new(load_catalog(args.catalog.as_deref()).await?);
    let random = match args.seed {
        Some(seed) => rng::seeded(seed),
        None => rng::from_entropy(),
    };

    let verbosity = if args.json {
        VerbosityLevel::Silent
    } else {
        args.verbosity.into()
    };

    let mut controller = MatchController::new(catalog, args.difficulty, random)
        .with_logger(MatchLogger::with_verbosity(verbosity));
    let mut player = build_player(kind, &args)?;

    if kind == ControllerType::Tui {
        println!("=== BJJ Engine ===");
        println!("Opponent difficulty: {}", args.difficulty);
        println!("First to 12 points or a submission wins. Type ? for help.");
    }

    let result = MatchRunner::new(&mut controller)
        .run_match(&mut *player)
        .context("match aborted")?;

    if args.json {
        let report = JsonReport {
            seed: args.seed,
            result: &result,
            state: controller.state(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        assert_eq!(parse_script("0 2,1").unwrap(), vec![0, 2, 1]);
        assert_eq!(parse_script("  ").unwrap(), Vec::<usize>::new());
        assert!(parse_script("1 x").is_err());
    }

    #[test]
    fn test_verbosity_names_and_numbers() {
        let level: VerbosityLevel = "3".parse::<VerbosityArg>().unwrap().into();
        assert_eq!(level, VerbosityLevel::Verbose);
        let level: VerbosityLevel = "Minimal".parse::<VerbosityArg>().unwrap().into();
        assert_eq!(level, VerbosityLevel::Minimal);
        assert!("loud".parse::<VerbosityArg>().is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["bjj", "sim", "--seed", "5", "-v", "0", "--json"]).unwrap();
        match cli.command {
            Commands::Sim { player, args } => {
                assert_eq!(player, ControllerType::Heuristic);
                assert_eq!(args.seed, Some(5));
                assert!(args.json);
            }
            _ => panic!("expected sim"),
        }

        let cli = Cli::try_parse_from(["bjj", "tourney", "--games", "10", "--ai-difficulty", "hard"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Tourney { games: 10, .. }));
    }
}

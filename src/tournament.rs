//! Tournament mode for running many matches in parallel and collecting statistics
//!
//! Every match is independent: it owns its state, its seeded random source
//! and its player controller. Only the statistics accumulator is shared.

use crate::catalog::Catalog;
use crate::core::{Difficulty, Side};
use crate::game::{
    HeuristicController, MatchController, MatchLogger, MatchRunner, PlayerController,
    RandomController, VerbosityLevel,
};
use crate::{BjjError, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Controller type for the player seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    Random,
    Heuristic,
}

/// Tournament settings
#[derive(Debug, Clone)]
pub struct TourneyConfig {
    pub games: usize,
    /// Match `i` is seeded with `seed + i`
    pub seed: u64,
    pub player_type: ControllerType,
    pub player_difficulty: Difficulty,
    pub ai_difficulty: Difficulty,
    pub catalog: Arc<Catalog>,
}

/// Aggregated results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourneyStats {
    pub player_wins: usize,
    pub ai_wins: usize,
    pub failures: usize,
    pub total_turns: u64,
    pub end_reasons: FxHashMap<&'static str, usize>,
}

impl TourneyStats {
    pub fn completed(&self) -> usize {
        self.player_wins + self.ai_wins
    }

    pub fn average_turns(&self) -> f64 {
        match self.completed() {
            0 => 0.0,
            n => self.total_turns as f64 / n as f64,
        }
    }
}

fn lock(stats: &Mutex<TourneyStats>) -> MutexGuard<'_, TourneyStats> {
    // A panicked worker leaves the counters usable
    stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Play one silent match with a fixed seed
pub fn play_one(config: &TourneyConfig, seed: u64) -> Result<crate::game::MatchResult> {
    let mut controller =
        MatchController::with_seed(Arc::clone(&config.catalog), config.ai_difficulty, seed)
            .with_logger(MatchLogger::with_verbosity(VerbosityLevel::Silent));

    let mut player: Box<dyn PlayerController> = match config.player_type {
        ControllerType::Random => {
            Box::new(RandomController::with_seed(seed.wrapping_add(0x1234_5678_9ABC_DEF0)))
        }
        ControllerType::Heuristic => Box::new(HeuristicController::new(config.player_difficulty)),
    };

    MatchRunner::new(&mut controller).run_match(&mut *player)
}

/// Run the tournament and return the aggregated statistics
pub fn run_tourney(config: &TourneyConfig) -> Result<TourneyStats> {
    if config.games == 0 {
        return Err(BjjError::InvalidInput(
            "tournament needs at least one game".to_string(),
        ));
    }

    let stats = Arc::new(Mutex::new(TourneyStats::default()));

    (0..config.games).into_par_iter().for_each(|index| {
        let seed = config.seed.wrapping_add(index as u64);
        let outcome = play_one(config, seed);

        let mut stats = lock(&stats);
        match outcome {
            Ok(result) => {
                match result.winner {
                    Some(Side::Player) => stats.player_wins += 1,
                    Some(Side::Ai) => stats.ai_wins += 1,
                    None => {}
                }
                stats.total_turns += u64::from(result.turns_played);
                if let Some(reason) = &result.end_reason {
                    *stats.end_reasons.entry(reason.label()).or_insert(0) += 1;
                }
            }
            Err(e) => {
                eprintln!("Warning: match {index} (seed {seed}) failed: {e}");
                stats.failures += 1;
            }
        }
    });

    let stats = lock(&stats).clone();
    Ok(stats)
}

/// Run and print a summary
pub fn run_and_report(config: &TourneyConfig) -> Result<TourneyStats> {
    println!("=== BJJ Engine - Tournament Mode ===\n");
    println!(
        "Running {} matches · player {:?} ({}) vs opponent ({}) · seed {}\n",
        config.games, config.player_type, config.player_difficulty, config.ai_difficulty, config.seed
    );

    let start = Instant::now();
    let stats = run_tourney(config)?;
    let elapsed = start.elapsed();

    print_summary(&stats);
    println!(
        "\nElapsed: {:.2}s ({:.1} matches/s)",
        elapsed.as_secs_f64(),
        stats.completed() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(stats)
}

pub fn print_summary(stats: &TourneyStats) {
    let total = stats.completed();
    println!("=== Tournament Complete ===");
    println!("Matches completed: {total}");
    if stats.failures > 0 {
        println!("Matches failed: {}", stats.failures);
    }
    if total == 0 {
        return;
    }

    let pct = |n: usize| 100.0 * n as f64 / total as f64;
    println!("Player wins: {} ({:.1}%)", stats.player_wins, pct(stats.player_wins));
    println!("Opponent wins: {} ({:.1}%)", stats.ai_wins, pct(stats.ai_wins));
    println!("Average turns: {:.1}", stats.average_turns());

    println!("\n=== End Reasons ===");
    let mut reasons: Vec<_> = stats.end_reasons.iter().collect();
    reasons.sort_by_key(|&(name, _)| *name);
    for (reason, count) in reasons {
        println!("  {reason}: {count} ({:.1}%)", pct(*count));
    }
}

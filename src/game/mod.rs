//! Match state machine, resolution, AI and controllers

/// Normal-level logging that compiles away without the `verbose-logging` feature
///
/// With the feature disabled the `format!` is never built, which keeps
/// benchmark runs free of narrative allocations.
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.normal(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

pub mod ai;
pub mod controller;
pub mod fixed_script_controller;
pub mod heuristic_controller;
pub mod interactive_controller;
pub mod logger;
pub mod match_controller;
pub mod match_loop;
pub mod phase;
pub mod random_controller;
pub mod resolution;
pub mod rng;
pub mod state;

pub use ai::{select_action, ScoredOption};
pub use controller::{ActionOption, ButtonState, CategoryOption, MatchStateView, PlayerController};
pub use fixed_script_controller::FixedScriptController;
pub use heuristic_controller::HeuristicController;
pub use interactive_controller::InteractiveController;
pub use logger::{LogEntry, MatchLogger, OutputFormat, OutputMode};
pub use match_controller::{MatchController, POINTS_TO_WIN, TURN_CAP};
pub use match_loop::{MatchResult, MatchRunner, VerbosityLevel};
pub use phase::MatchPhase;
pub use random_controller::RandomController;
pub use resolution::{
    calculate_score, classify_tier, resolve, ControlShift, ControlShiftKind, OutcomeTier,
    PositionChange, Resolution, ScoreBreakdown,
};
pub use rng::{RandomSource, ScriptedRandom};
pub use state::{Action, MatchEndReason, MatchState, MAX_CONTROL};

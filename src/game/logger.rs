//! Match logger with in-memory capture
//!
//! Every line the engine narrates goes through [`MatchLogger`]. Output can go
//! to stdout, to an in-memory buffer (tests and the tournament runner), or
//! both. Entries keep their verbosity level so a captured buffer can be
//! flushed later at any verbosity.

use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log line
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional tag, e.g. "controller_choice", "resolution"
    pub category: Option<String>,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized match logger
///
/// Logging takes `&self` so the engine can narrate while it holds other
/// borrows of the controller; the capture buffer lives in a `RefCell`.
pub struct MatchLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl MatchLogger {
    /// Logger at the default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        MatchLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Logger that only captures, for tests and parallel runs
    pub fn capturing(verbosity: VerbosityLevel) -> Self {
        let mut logger = Self::with_verbosity(verbosity);
        logger.output_mode = OutputMode::Memory;
        logger
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory and suppress stdout
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Print buffered entries the current verbosity allows, then clear
    pub fn flush_buffer(&mut self) {
        let buffer = self.log_buffer.borrow();
        for entry in buffer.iter() {
            if entry.level <= self.verbosity {
                self.write_stdout(entry.level, &entry.message, entry.category.as_deref());
            }
        }
        drop(buffer);
        self.clear_logs();
    }

    /// Captured entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    /// Captured messages at or below `level`, in order
    pub fn messages_at(&self, level: VerbosityLevel) -> Vec<String> {
        self.log_buffer
            .borrow()
            .iter()
            .filter(|e| e.level <= level)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    #[inline]
    fn write_stdout(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        match self.output_format {
            OutputFormat::Text => {
                if level == VerbosityLevel::Minimal {
                    println!("{message}");
                } else {
                    println!("  {message}");
                }
            }
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "level": level,
                    "category": category,
                    "message": message,
                });
                println!("{line}");
            }
        }
    }

    /// Shared path for every level
    #[inline]
    pub fn log(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        if level == VerbosityLevel::Silent {
            return;
        }
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        if level > self.verbosity && !should_capture {
            return;
        }

        if should_capture {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }

        if should_output && level <= self.verbosity {
            self.write_stdout(level, message, category);
        }
    }

    /// Match outcome lines
    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    /// Turn headers, selections, narratives
    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    /// Score breakdowns and AI option scores
    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// A controller's locked selection, at Normal level
    #[inline]
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        self.log(
            VerbosityLevel::Normal,
            Some("controller_choice"),
            &format!("{controller_name} chose {message}"),
        );
    }

    /// A resolution narrative line, at Normal level
    #[inline]
    pub fn narrative(&self, message: &str) {
        self.log(VerbosityLevel::Normal, Some("resolution"), message);
    }
}

impl Default for MatchLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MatchLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for MatchLogger {
    /// Clones the settings, not the captured entries
    fn clone(&self) -> Self {
        MatchLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

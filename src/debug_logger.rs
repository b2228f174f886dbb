// Debug logging of turn decisions
//
// Each turn's host input and chosen action is appended to a JSONL file so the
// replay tool can re-run the engine on it later. Write failures are logged and
// never interrupt the game loop.

use chrono::Utc;
use log::error;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

use crate::protocol::{Setup, TurnState};

/// Represents a single debug log entry
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: u32,
    pub setup: Setup,
    pub state: TurnState,
    pub chosen_move: String,
    pub timestamp: String,
}

pub struct DebugLogger {
    file: Option<BufWriter<File>>,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Some(BufWriter::new(file)),
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Appends one turn to the log and flushes it
    pub fn log_move(&mut self, turn: u32, setup: &Setup, state: &TurnState, chosen_move: &str) {
        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return,
        };

        let entry = LogEntry {
            turn,
            setup: setup.clone(),
            state: state.clone(),
            chosen_move: chosen_move.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };

        match serde_json::to_string(&entry) {
            Ok(json_line) => {
                if let Err(e) = writeln!(file, "{}", json_line) {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush() {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
            }
        }
    }
}

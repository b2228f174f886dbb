// Replay module for analyzing logged turns and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the engine on each logged turn
// 3. Compare logged vs replayed actions
// 4. Print a summary report

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bot::Bot;
use crate::config::Config;
pub use crate::debug_logger::LogEntry;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub original_move: String,
    pub replayed_move: String,
    pub matches: bool,
    pub replayed_score: i32,
    pub evaluated: usize,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::new(config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;
        Self::parse_log(BufReader::new(file))
    }

    /// Parses JSONL log content, skipping blank lines
    pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<LogEntry>, String> {
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> ReplayResult {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let decision = self.bot.get_move(&entry.setup, &entry.state, entry.turn);
        let matches = decision.action == entry.chosen_move;

        let result = ReplayResult {
            turn: entry.turn,
            original_move: entry.chosen_move.clone(),
            replayed_move: decision.action,
            matches,
            replayed_score: decision.score.map_or(0, |s| s.value),
            evaluated: decision.evaluated,
            computation_time_us: decision.elapsed_us,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (score: {}, evaluated: {}, time: {}us)",
                    result.turn,
                    result.replayed_move,
                    result.replayed_score,
                    result.evaluated,
                    result.computation_time_us
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} (score: {}, evaluated: {}, time: {}us)",
                    result.turn,
                    result.original_move,
                    result.replayed_move,
                    result.replayed_score,
                    result.evaluated,
                    result.computation_time_us
                );
            }
        }

        result
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries.iter().map(|entry| self.replay_entry(entry)).collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        turn_numbers
            .iter()
            .map(|turn_num| {
                entries
                    .iter()
                    .find(|e| e.turn == *turn_num)
                    .map(|entry| self.replay_entry(entry))
                    .ok_or_else(|| format!("Turn {} not found in log file", turn_num))
            })
            .collect()
    }

    /// Generates statistics from replay results
    pub fn generate_stats(results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = Self::generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let n = results.len() as f64;
            let avg_time = results.iter().map(|r| r.computation_time_us as f64).sum::<f64>() / n;
            let avg_evaluated = results.iter().map(|r| r.evaluated as f64).sum::<f64>() / n;

            println!("Average Candidates Evaluated: {:.1}", avg_evaluated);
            println!("Average Computation Time:     {:.0}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {} (score: {}, evaluated: {}, time: {}us)",
                    result.turn,
                    result.original_move,
                    result.replayed_move,
                    result.replayed_score,
                    result.evaluated,
                    result.computation_time_us
                );
            }
            println!();
        }
    }

    /// Validates that specific expected actions were logged
    pub fn validate_expected_moves(
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<String>)], // (turn, acceptable_actions)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            if !acceptable.iter().any(|a| a.eq_ignore_ascii_case(&entry.chosen_move)) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn, acceptable, entry.chosen_move
                ));
            }
        }

        Ok(())
    }
}

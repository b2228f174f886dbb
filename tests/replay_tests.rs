// Integration tests for the replay engine
//
// Tests the replay engine against a recorded log fixture:
// - Loading JSONL log files
// - Replaying individual turns
// - Validating expected moves
// - Generating statistics

use great_escape_bot::config::Config;
use great_escape_bot::replay::ReplayEngine;
use great_escape_bot::types::{Coord, Wall};
use std::path::PathBuf;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn engine() -> ReplayEngine {
    ReplayEngine::new(Config::default_hardcoded(), false)
}

#[test]
fn test_load_log_file() {
    let entries = engine()
        .load_log_file(fixture_path("duel_basic.jsonl"))
        .expect("Failed to load duel_basic.jsonl");

    assert_eq!(entries.len(), 3, "Blank lines are skipped");
    assert_eq!(entries[0].turn, 0);
    assert_eq!(entries[0].state.players[0].pos, Coord::new(7, 2));
    assert_eq!(entries[1].chosen_move, "3 4 H");
    assert_eq!(entries[2].state.walls[1], Wall::horizontal(3, 4));
}

#[test]
fn test_missing_file_is_an_error() {
    let result = engine().load_log_file(fixture_path("does_not_exist.jsonl"));
    assert!(result.is_err());
}

#[test]
fn test_replay_reproduces_finishing_steps() {
    let engine = engine();
    let entries = engine.load_log_file(fixture_path("duel_basic.jsonl")).unwrap();

    let results = engine.replay_turns(&entries, &[0, 2]).unwrap();
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(
            result.matches,
            "Turn {}: logged {}, replayed {}",
            result.turn, result.original_move, result.replayed_move
        );
        assert_eq!(result.replayed_move, "RIGHT");
    }
}

#[test]
fn test_replay_unknown_turn_fails() {
    let engine = engine();
    let entries = engine.load_log_file(fixture_path("duel_basic.jsonl")).unwrap();
    assert!(engine.replay_turns(&entries, &[0, 42]).is_err());
}

#[test]
fn test_replay_all_generates_stats() {
    let engine = engine();
    let entries = engine.load_log_file(fixture_path("duel_basic.jsonl")).unwrap();

    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), 3);

    let stats = ReplayEngine::generate_stats(&results);
    assert_eq!(stats.total_turns, 3);
    assert!(stats.matches >= 2, "Both finishing steps should match");
    assert_eq!(stats.matches + stats.mismatches, 3);
}

#[test]
fn test_validate_expected_moves() {
    let entries = engine().load_log_file(fixture_path("duel_basic.jsonl")).unwrap();

    let expected = vec![
        (0, vec!["RIGHT".to_string()]),
        (1, vec!["UP".to_string(), "3 4 H".to_string()]),
    ];
    assert!(ReplayEngine::validate_expected_moves(&entries, &expected).is_ok());

    let wrong = vec![(2, vec!["LEFT".to_string()])];
    assert!(ReplayEngine::validate_expected_moves(&entries, &wrong).is_err());
}

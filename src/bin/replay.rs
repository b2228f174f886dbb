// Standalone replay tool for analyzing Great Escape debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate             Check logged actions against expected ones
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Engine.toml (default: Engine.toml)

use std::env;
use std::process;

use great_escape_bot::config::Config;
use great_escape_bot::replay::ReplayEngine;
use great_escape_bot::types::{Direction, Orientation};

fn print_usage() {
    eprintln!("Great Escape Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:A,...>    Validate expected actions (format: turn:action,...)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Engine.toml (default: Engine.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all turns");
    eprintln!("  replay great_escape_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific turns");
    eprintln!("  replay great_escape_debug.jsonl --turns 5,10,15");
    eprintln!();
    eprintln!("  # Validate expected actions, alternatives separated by '|'");
    eprintln!("  replay great_escape_debug.jsonl --validate \"5:up,10:right|3 4 H\"");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

/// Normalizes a step (`up`) or wall (`3 4 h`) into the host's action form
fn parse_action(s: &str) -> Result<String, String> {
    let step = Direction::all()
        .into_iter()
        .find(|d| d.as_str().eq_ignore_ascii_case(s));
    if let Some(dir) = step {
        return Ok(dir.as_str().to_string());
    }

    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() == 3 {
        let x = parts[0].parse::<i32>();
        let y = parts[1].parse::<i32>();
        let orientation = Orientation::parse(&parts[2].to_uppercase());
        if let (Ok(x), Ok(y), Some(o)) = (x, y, orientation) {
            return Ok(format!("{} {} {}", x, y, o.as_str()));
        }
    }

    Err(format!("Invalid action: {}", s))
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<String>)>, String> {
    s.split(',')
        .map(|pair| {
            let (turn, actions) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'turn:action'", pair))?;

            let turn = turn
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;

            let actions: Result<Vec<String>, String> =
                actions.split('|').map(|a| parse_action(a.trim())).collect();

            Ok((turn, actions?))
        })
        .collect()
}

fn require_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

enum Mode {
    All,
    Turns(String),
    Validate(String),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(if args.iter().any(|a| a == "--help") { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Engine.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => {
                mode = Some(Mode::Turns(require_value(&args, i, "--turns")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(require_value(&args, i, "--validate")));
                i += 1;
            }
            "--config" => {
                config_path = require_value(&args, i, "--config");
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --turns, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    match mode {
        Mode::All => {
            println!("Replaying all {} turns...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(arg) => {
            let turns = parse_turns(&arg).unwrap_or_else(|e| {
                eprintln!("Error parsing turns: {}", e);
                process::exit(1);
            });

            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&entries, &turns) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = parse_expected_moves(&arg).unwrap_or_else(|e| {
                eprintln!("Error parsing expected actions: {}", e);
                process::exit(1);
            });

            println!("Validating {} expected action(s)...\n", expected_moves.len());
            match ReplayEngine::validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected actions validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

// Configuration module for reading Engine.toml
// Every tunable the engine uses lives here so offline tuners can inject their own values.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub weights: Weights,
    pub debug: DebugConfig,
}

/// Per-turn time budget
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    pub turn_budget_us: u64,
}

/// Search shape constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    pub depth_two_player: u32,
    pub depth_three_player: u32,
    /// Candidates kept per ply below the root
    pub breadth: usize,
    /// Candidates kept at the root
    pub root_breadth: usize,
    /// Manhattan radius around alive players for wall candidates
    pub wall_radius: i32,
    /// Walls in flight beyond which walls stop being generated and depth is extended
    pub quiet_wall_threshold: u32,
    /// Depth extensions stop once this many plies are applied
    pub max_ply: u32,
}

impl SearchConfig {
    pub fn depth_for(&self, alive_players: usize) -> u32 {
        if alive_players <= 2 {
            self.depth_two_player
        } else {
            self.depth_three_player
        }
    }
}

/// Distance and wall-count weights for one game phase
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PhaseWeights {
    pub distance: i32,
    pub walls: i32,
}

/// Weights that switch as the game advances
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PhasedWeights {
    pub opening: PhaseWeights,
    pub midgame: PhaseWeights,
    pub endgame: PhaseWeights,
    pub midgame_after: u32,
    pub endgame_after: u32,
}

impl PhasedWeights {
    pub fn constant(distance: i32, walls: i32) -> Self {
        let w = PhaseWeights { distance, walls };
        PhasedWeights {
            opening: w,
            midgame: w,
            endgame: w,
            midgame_after: u32::MAX,
            endgame_after: u32::MAX,
        }
    }

    /// Weights in effect at the given ply clock
    pub fn at(&self, ply: u32) -> PhaseWeights {
        if ply > self.endgame_after {
            self.endgame
        } else if ply > self.midgame_after {
            self.midgame
        } else {
            self.opening
        }
    }

    /// Seven integers: three (distance, walls) pairs then the two thresholds
    fn from_slice(v: &[i32]) -> Self {
        let pair = |i: usize| PhaseWeights {
            distance: v[i],
            walls: v[i + 1],
        };
        let midgame_after = v[6].max(1) as u32;
        PhasedWeights {
            opening: pair(0),
            midgame: pair(2),
            endgame: pair(4),
            midgame_after,
            endgame_after: (v[7].max(0) as u32).max(midgame_after + 1),
        }
    }
}

/// Scorer weight vector
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub two_player: PhasedWeights,
    pub three_player: PhasedWeights,
    /// Added to the two player scalar when the evaluated side has no walls left
    pub out_of_walls_penalty: i32,
}

impl Weights {
    /// Length of the flat vector accepted by `from_vector`
    pub const VECTOR_LEN: usize = 17;

    /// Builds weights from a flat integer vector, as produced by offline tuners
    ///
    /// Layout: two player block (8 values), three player block (8 values),
    /// out-of-walls penalty. Each block is opening, midgame and endgame
    /// (distance, walls) pairs followed by the midgame and endgame thresholds.
    pub fn from_vector(v: &[i32]) -> Result<Self, String> {
        if v.len() != Self::VECTOR_LEN {
            return Err(format!(
                "Expected {} weights, got {}",
                Self::VECTOR_LEN,
                v.len()
            ));
        }
        Ok(Weights {
            two_player: PhasedWeights::from_slice(&v[0..8]),
            three_player: PhasedWeights::from_slice(&v[8..16]),
            out_of_walls_penalty: v[16],
        })
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            two_player: PhasedWeights::constant(1, 1),
            three_player: PhasedWeights::constant(3, 4),
            out_of_walls_penalty: -2,
        }
    }
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Engine.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Engine.toml in the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Engine.toml")
    }

    /// Hardcoded defaults, kept in sync with Engine.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                turn_budget_us: 90_000,
            },
            search: SearchConfig {
                depth_two_player: 8,
                depth_three_player: 6,
                breadth: 2,
                root_breadth: 20,
                wall_radius: 3,
                quiet_wall_threshold: 4,
                max_ply: 64,
            },
            weights: Weights::default(),
            debug: DebugConfig {
                enabled: false,
                log_file_path: "great_escape_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Engine.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

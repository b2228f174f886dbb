// Library exports for the Great Escape bot
// This allows the replay tool and the integration tests to use the core engine

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod grid;
pub mod legality;
pub mod moves;
pub mod protocol;
pub mod replay;
pub mod score;
pub mod scorer;
pub mod search;
pub mod types;

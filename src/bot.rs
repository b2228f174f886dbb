// Per-turn orchestration: host state in, one action out
//
// The bot owns the static configuration and the searcher. Each turn builds a
// fresh board from the host state, runs the time-boxed search and always
// produces an action, even when the search has nothing to offer.

use log::info;

use crate::config::Config;
use crate::protocol::{Setup, TurnState};
use crate::score::Score;
use crate::search::Searcher;

/// The chosen action and how it was reached
#[derive(Debug, Clone)]
pub struct Decision {
    pub action: String,
    pub score: Option<Score>,
    pub candidates: usize,
    pub evaluated: usize,
    pub nodes: u64,
    pub timed_out: bool,
    pub elapsed_us: u128,
}

/// Great Escape bot
/// Takes static configuration and answers one turn at a time
pub struct Bot {
    config: Config,
    searcher: Searcher,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let searcher = Searcher::new(&config);
        Bot { config, searcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Computes the action for one turn
    ///
    /// # Arguments
    /// * `setup` - Game parameters from the first input line
    /// * `state` - Player and wall state for this turn
    /// * `turn` - Zero-based count of our own turns so far
    pub fn get_move(&self, setup: &Setup, state: &TurnState, turn: u32) -> Decision {
        let ply = turn * setup.player_count as u32 + setup.my_id as u32;
        let mut board = state.to_board(setup, ply);
        let me = setup.my_id.min(board.player_count() - 1);

        let outcome = self.searcher.select_best_move(&mut board, me);

        let action = match outcome.best {
            Some(mv) => mv.to_action(),
            // nothing to search: head for our edge anyway
            None => board.player(me).target.as_str().to_string(),
        };

        let score = outcome.best.map(|mv| mv.score);
        match &score {
            Some(s) => info!(
                "Turn {}: Chose {} ({} / {}, score: {}, candidates: {}/{}, nodes: {}, time: {}us)",
                turn,
                action,
                s.first.as_str(),
                s.second.as_str(),
                s.value,
                outcome.evaluated,
                outcome.candidates,
                outcome.nodes,
                outcome.elapsed.as_micros()
            ),
            None => info!("Turn {}: No candidate, falling back to {}", turn, action),
        }

        Decision {
            action,
            score,
            candidates: outcome.candidates,
            evaluated: outcome.evaluated,
            nodes: outcome.nodes,
            timed_out: outcome.timed_out,
            elapsed_us: outcome.elapsed.as_micros(),
        }
    }
}

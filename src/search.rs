// Alpha-beta search over tiered scores
//
// Single threaded and synchronous. The board is mutated in place: every frame
// applies exactly one move on entry and undoes it before returning. The only
// time check happens at the root, between complete candidate evaluations, so
// depth and breadth must keep a single candidate well inside the budget.

use log::{debug, info};
use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::config::{Config, SearchConfig};
use crate::moves::{best_step, candidates, Goal, Move};
use crate::score::Score;
use crate::scorer::Scorer;

/// Result of a root search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best move found; `None` only when the player has no move at all
    pub best: Option<Move>,
    /// Root candidates after pruning
    pub candidates: usize,
    /// Root candidates fully evaluated
    pub evaluated: usize,
    /// Search nodes visited
    pub nodes: u64,
    pub timed_out: bool,
    pub elapsed: Duration,
}

pub struct Searcher {
    config: SearchConfig,
    scorer: Scorer,
    budget: Duration,
    nodes: Cell<u64>,
}

impl Searcher {
    pub fn new(config: &Config) -> Self {
        Searcher {
            config: config.search.clone(),
            scorer: Scorer::new(config.weights),
            budget: Duration::from_micros(config.timing.turn_budget_us),
            nodes: Cell::new(0),
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Value of `mv` for `perspective` after searching `depth` more plies.
    ///
    /// Moves already scored as won, or lost with second place settled, are
    /// returned as is without touching the board.
    #[allow(clippy::too_many_arguments)]
    pub fn search(
        &self,
        board: &mut Board,
        depth: u32,
        breadth: usize,
        mut alpha: Score,
        mut beta: Score,
        perspective: usize,
        mv: &Move,
    ) -> Score {
        self.nodes.set(self.nodes.get() + 1);

        // let wall-heavy lines play out one ply further
        let depth = if board.walls_in_flight() > self.config.quiet_wall_threshold
            && board.moves_applied() < self.config.max_ply
        {
            depth + 1
        } else {
            depth
        };

        if depth == 0 || mv.score.is_won() || mv.score.is_settled_loss() {
            return mv.score;
        }

        board.apply(mv);

        let next = match board.next_player(mv.player) {
            Some(next) => next,
            None => {
                board.undo(mv);
                return mv.score;
            }
        };

        let use_walls = board.walls_in_flight() <= self.config.quiet_wall_threshold;
        let goal = if next == perspective {
            Goal::Maximize
        } else {
            Goal::Minimize
        };

        let mut pool = candidates(
            board,
            &self.scorer,
            &self.config,
            perspective,
            next,
            goal,
            breadth,
            use_walls,
        );
        if pool.is_empty() {
            board.undo(mv);
            return mv.score;
        }
        pool.sort();

        let best = match goal {
            Goal::Maximize => {
                let mut best = Score::floor();
                for child in pool.iter() {
                    let score =
                        self.search(board, depth - 1, breadth, alpha, beta, perspective, child);
                    if score.is_better_than(&best) {
                        best = score;
                        alpha = alpha.max(best);
                        if !beta.is_better_than(&alpha) || best.is_won() {
                            break;
                        }
                    }
                }
                best
            }
            Goal::Minimize => {
                let mut best = Score::ceiling();
                for child in pool.iter() {
                    let score =
                        self.search(board, depth - 1, breadth, alpha, beta, perspective, child);
                    if score.is_worse_than(&best) {
                        best = score;
                        beta = beta.min(best);
                        if !beta.is_better_than(&alpha) || best.is_decisive_loss() {
                            break;
                        }
                    }
                }
                best
            }
        };

        board.undo(mv);
        best
    }

    /// Picks the move for `perspective` on the current board.
    ///
    /// Root candidates are evaluated best-first until one is an outright win
    /// or the remaining budget is smaller than the time the last candidate
    /// took; the best fully evaluated one is returned.
    pub fn select_best_move(&self, board: &mut Board, perspective: usize) -> SearchOutcome {
        let start = Instant::now();
        board.reset_search();
        self.nodes.set(0);

        let depth = self.config.depth_for(board.alive_count());
        let mut pool = candidates(
            board,
            &self.scorer,
            &self.config,
            perspective,
            perspective,
            Goal::Maximize,
            self.config.root_breadth,
            true,
        );
        pool.sort();

        let total = pool.len();
        let mut best: Option<Move> = None;
        let mut best_score = Score::floor();
        let mut alpha = Score::floor();
        let mut evaluated = 0;
        let mut timed_out = false;

        let mut last_candidate = Duration::ZERO;

        for mv in pool {
            if mv.score.is_won() {
                best = Some(mv);
                evaluated += 1;
                break;
            }

            let candidate_start = Instant::now();
            let score = self.search(
                board,
                depth,
                self.config.breadth,
                alpha,
                Score::ceiling(),
                perspective,
                &mv,
            );
            last_candidate = candidate_start.elapsed();
            evaluated += 1;
            debug!(
                "Candidate {}: {} / {} ({})",
                mv.to_action(),
                score.first.as_str(),
                score.second.as_str(),
                score.value
            );

            if best.is_none() || score.is_better_than(&best_score) {
                best_score = score;
                best = Some(mv.with_score(score));
            }

            alpha = alpha.max(best_score);
            if alpha.is_won() {
                break;
            }

            // stop unless another candidate like the last one still fits
            if start.elapsed() + last_candidate > self.budget && evaluated < total {
                timed_out = true;
                info!(
                    "Time out after {}us (last candidate {}us), checked {} of {} candidates",
                    start.elapsed().as_micros(),
                    last_candidate.as_micros(),
                    evaluated,
                    total
                );
                break;
            }
        }

        if best.is_none() {
            best = best_step(board, perspective);
        }

        SearchOutcome {
            best,
            candidates: total,
            evaluated,
            nodes: self.nodes.get(),
            timed_out,
            elapsed: start.elapsed(),
        }
    }
}

// Moves, bounded candidate pools and candidate generation
//
// A node never looks at every legal move. The mover's best step is always a
// candidate; walls near the action are scored and only the top `breadth` of
// them survive in a fixed-capacity pool.

use crate::board::Board;
use crate::config::SearchConfig;
use crate::score::Score;
use crate::scorer::Scorer;
use crate::types::{Direction, Orientation, Wall};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Step(Direction),
    Wall(Wall),
}

/// A step or wall by one player, with its score once evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub player: usize,
    pub kind: MoveKind,
    pub score: Score,
}

impl Move {
    pub fn step(player: usize, dir: Direction) -> Self {
        Move {
            player,
            kind: MoveKind::Step(dir),
            score: Score::default(),
        }
    }

    pub fn wall(player: usize, wall: Wall) -> Self {
        Move {
            player,
            kind: MoveKind::Wall(wall),
            score: Score::default(),
        }
    }

    pub fn with_score(mut self, score: Score) -> Self {
        self.score = score;
        self
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.kind, MoveKind::Wall(_))
    }

    /// Host action token for this move
    pub fn to_action(&self) -> String {
        match self.kind {
            MoveKind::Step(dir) => dir.as_str().to_string(),
            MoveKind::Wall(wall) => wall.to_action(),
        }
    }
}

/// Which end of the score order a pool keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Node where the perspective player moves
    Maximize,
    /// Node where an opponent moves
    Minimize,
}

impl Goal {
    fn prefers(self, a: &Score, b: &Score) -> bool {
        match self {
            Goal::Maximize => a.is_better_than(b),
            Goal::Minimize => a.is_worse_than(b),
        }
    }

    /// A score no later candidate can beat for this goal
    fn is_decisive(self, score: &Score) -> bool {
        match self {
            Goal::Maximize => score.is_decisive_win(),
            Goal::Minimize => score.is_decisive_loss(),
        }
    }
}

/// Keeps the best `capacity` moves for its goal
///
/// Inserting into a full pool replaces the current worst element and rescans
/// for the new worst in O(capacity); order is only established by `sort`.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    goal: Goal,
    capacity: usize,
    moves: Vec<Move>,
    worst: usize,
    closed: bool,
}

impl CandidatePool {
    pub fn new(goal: Goal, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        CandidatePool {
            goal,
            capacity,
            moves: Vec::with_capacity(capacity),
            worst: 0,
            closed: false,
        }
    }

    pub fn max_pool(capacity: usize) -> Self {
        Self::new(Goal::Maximize, capacity)
    }

    pub fn min_pool(capacity: usize) -> Self {
        Self::new(Goal::Minimize, capacity)
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Set once a decisive candidate collapsed the pool
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Offers a scored move. Returns `true` when the move was decisive and the
    /// pool collapsed to it; callers should stop enumerating.
    pub fn push(&mut self, mv: Move) -> bool {
        if self.closed {
            return true;
        }
        if mv.score.is_illegal() {
            return false;
        }

        if self.goal.is_decisive(&mv.score) {
            self.moves.clear();
            self.moves.push(mv);
            self.worst = 0;
            self.closed = true;
            return true;
        }

        if self.moves.len() < self.capacity {
            self.moves.push(mv);
            let last = self.moves.len() - 1;
            if last == 0 || self.goal.prefers(&self.moves[self.worst].score, &mv.score) {
                self.worst = last;
            }
            return false;
        }

        if self.goal.prefers(&mv.score, &self.moves[self.worst].score) {
            self.moves[self.worst] = mv;
            self.update_worst();
        }
        false
    }

    fn update_worst(&mut self) {
        self.worst = 0;
        for i in 1..self.moves.len() {
            if self.goal.prefers(&self.moves[self.worst].score, &self.moves[i].score) {
                self.worst = i;
            }
        }
    }

    /// Orders the pool best-first for its goal
    pub fn sort(&mut self) {
        let goal = self.goal;
        self.moves.sort_by(|a, b| match goal {
            Goal::Maximize => b.score.compare(&a.score),
            Goal::Minimize => a.score.compare(&b.score),
        });
        self.worst = self.moves.len().saturating_sub(1);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn into_vec(self) -> Vec<Move> {
        self.moves
    }
}

impl IntoIterator for CandidatePool {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

/// Every on-board wall anchor, horizontal walls first
pub fn all_walls(width: i32, height: i32) -> impl Iterator<Item = Wall> {
    let horizontal = (1..height)
        .flat_map(move |y| (0..width - 1).map(move |x| Wall::new(x, y, Orientation::Horizontal)));
    let vertical = (0..height - 1)
        .flat_map(move |y| (1..width).map(move |x| Wall::new(x, y, Orientation::Vertical)));
    horizontal.chain(vertical)
}

/// Wall anchor within `radius` steps of some alive player
pub fn is_near_players(board: &Board, wall: &Wall, radius: i32) -> bool {
    board.alive_positions().any(|pos| wall.pos.manhattan(pos) <= radius)
}

/// The first step of `player`'s shortest path, unscored
pub fn best_step(board: &mut Board, player: usize) -> Option<Move> {
    board
        .path(player)
        .direction
        .map(|dir| Move::step(player, dir))
}

/// Scored candidates for `mover`, seen from `perspective`
///
/// The best step always enters the pool. Walls are only considered when
/// `use_walls` is set and the mover still has some; each wall must be near an
/// alive player and pass `can_place` before it is scored.
#[allow(clippy::too_many_arguments)]
pub fn candidates(
    board: &mut Board,
    scorer: &Scorer,
    search: &SearchConfig,
    perspective: usize,
    mover: usize,
    goal: Goal,
    breadth: usize,
    use_walls: bool,
) -> CandidatePool {
    let mut pool = CandidatePool::new(goal, breadth);

    let step = best_step(board, mover).map(|mv| {
        let score = scorer.score(board, perspective, &mv);
        mv.with_score(score)
    });

    // an opponent one step from home just walks
    let about_to_finish = goal == Goal::Minimize && board.distance(mover).map_or(false, |d| d <= 1);

    if let Some(step) = step {
        if pool.push(step) || !use_walls || about_to_finish {
            return pool;
        }
    }

    if !use_walls || board.player(mover).walls_left == 0 {
        return pool;
    }

    for wall in all_walls(board.width(), board.height()) {
        if !is_near_players(board, &wall, search.wall_radius) || !board.can_place(&wall) {
            continue;
        }
        let mv = Move::wall(mover, wall);
        let score = scorer.score(board, perspective, &mv);
        if pool.push(mv.with_score(score)) {
            break;
        }
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Outcome;

    fn scored(value: i32) -> Move {
        Move::step(0, Direction::Up).with_score(Score::uniform(value, Outcome::Undecided))
    }

    fn values(pool: &CandidatePool) -> Vec<i32> {
        pool.iter().map(|m| m.score.value).collect()
    }

    #[test]
    fn test_max_pool_keeps_top_k() {
        let mut pool = CandidatePool::max_pool(3);
        for v in [5, 1, 9, 3, 7, 2, 8] {
            pool.push(scored(v));
        }
        pool.sort();
        assert_eq!(values(&pool), vec![9, 8, 7]);
    }

    #[test]
    fn test_min_pool_keeps_bottom_k() {
        let mut pool = CandidatePool::min_pool(2);
        for v in [5, 1, 9, 3, 7, 2, 8] {
            pool.push(scored(v));
        }
        pool.sort();
        assert_eq!(values(&pool), vec![1, 2]);
    }

    #[test]
    fn test_illegal_is_rejected() {
        let mut pool = CandidatePool::max_pool(2);
        let illegal = Score::new(10, Outcome::Undecided, Outcome::Illegal);
        let mv = Move::step(0, Direction::Up).with_score(illegal);
        assert!(!pool.push(mv));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_decisive_win_collapses_max_pool() {
        let mut pool = CandidatePool::max_pool(4);
        pool.push(scored(1));
        pool.push(scored(2));
        let win = Move::step(0, Direction::Down).with_score(Score::uniform(0, Outcome::Won));
        assert!(pool.push(win));
        assert!(pool.is_closed());
        assert_eq!(pool.len(), 1);
        // later candidates are ignored
        assert!(pool.push(scored(100)));
        assert_eq!(pool.into_vec(), vec![win]);
    }

    #[test]
    fn test_decisive_loss_collapses_min_pool_only() {
        let loss = Move::step(0, Direction::Left).with_score(Score::uniform(0, Outcome::Lost));

        let mut min_pool = CandidatePool::min_pool(3);
        min_pool.push(scored(4));
        assert!(min_pool.push(loss));
        assert_eq!(min_pool.len(), 1);

        let mut max_pool = CandidatePool::max_pool(3);
        max_pool.push(scored(4));
        assert!(!max_pool.push(loss));
        assert_eq!(max_pool.len(), 2);
    }

    #[test]
    fn test_all_walls_count() {
        // 8 * 8 of each orientation on a 9x9 board
        assert_eq!(all_walls(9, 9).count(), 128);
        assert!(all_walls(9, 9).all(|w| w.is_on_board(9, 9)));
    }
}

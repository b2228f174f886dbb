// Board state threaded through the whole search
//
// The board owns every player and the path grid. Search mutates it in place with
// `apply` and restores it with `undo`; applying then undoing the same move leaves
// the board equal to what it was.

use crate::grid::{PathData, PathGrid};
use crate::moves::{Move, MoveKind};
use crate::types::{Coord, Direction, Wall};

/// Target edge for each player id
const TARGET_EDGES: [Direction; 3] = [Direction::Right, Direction::Left, Direction::Down];

/// Position host sends for a player no longer on the board
pub const ELIMINATED: Coord = Coord { x: -1, y: -1 };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub pos: Coord,
    pub walls_left: u32,
    pub target: Direction,
    /// Still in the race (false once eliminated or reported done by the host)
    pub is_alive: bool,
    /// Reached the target edge during search
    pub is_finished: bool,
}

impl Player {
    fn new(target: Direction) -> Self {
        Player {
            pos: Coord::new(0, 0),
            walls_left: 0,
            target,
            is_alive: true,
            is_finished: false,
        }
    }

    /// Takes a turn in the ring
    pub fn is_playing(&self) -> bool {
        self.is_alive && !self.is_finished
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    players: Vec<Player>,
    grid: PathGrid,
    wall_count: u16,
    /// Game turn reported by the caller, used for weight phases
    turn: u32,
    moves_applied: u32,
    walls_in_flight: u32,
}

impl Board {
    /// Creates an empty board; player count is clamped to 2..=3
    pub fn new(width: i32, height: i32, player_count: usize) -> Self {
        let player_count = player_count.clamp(2, 3);
        Board {
            width,
            height,
            players: TARGET_EDGES[..player_count]
                .iter()
                .map(|&edge| Player::new(edge))
                .collect(),
            grid: PathGrid::new(width, height),
            wall_count: 0,
            turn: 0,
            moves_applied: 0,
            walls_in_flight: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn grid(&self) -> &PathGrid {
        &self.grid
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: usize) -> &Player {
        &self.players[id]
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn wall_count(&self) -> u16 {
        self.wall_count
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Plies applied since the last `reset_search`
    pub fn moves_applied(&self) -> u32 {
        self.moves_applied
    }

    /// Walls applied since the last `reset_search`
    pub fn walls_in_flight(&self) -> u32 {
        self.walls_in_flight
    }

    /// Game phase clock: turn plus plies applied in search
    pub fn ply_clock(&self) -> u32 {
        self.turn + self.moves_applied
    }

    pub fn reset_search(&mut self) {
        self.moves_applied = 0;
        self.walls_in_flight = 0;
    }

    /// Sets a player's state from host input
    ///
    /// The `-1 -1` sentinel position, or a position already on the target
    /// edge, takes the player out of the race.
    pub fn update_player(&mut self, id: usize, pos: Coord, walls_left: u32) {
        if id >= self.players.len() {
            return;
        }

        let target = self.players[id].target;
        let on_target = self.grid.contains(pos) && self.grid.is_on_edge(pos, target);
        let player = &mut self.players[id];
        player.pos = pos;
        player.walls_left = walls_left;
        player.is_finished = false;
        player.is_alive = pos != ELIMINATED && !on_target;
    }

    pub(crate) fn set_alive(&mut self, id: usize, alive: bool) {
        self.players[id].is_alive = alive;
    }

    /// Places a wall reported by the host; overlapping or off-board walls are ignored
    pub fn add_wall(&mut self, wall: &Wall) -> bool {
        if !wall.is_on_board(self.width, self.height) || self.overlaps(wall) {
            return false;
        }
        self.place_wall_unchecked(wall);
        true
    }

    pub(crate) fn place_wall_unchecked(&mut self, wall: &Wall) {
        self.wall_count += 1;
        self.grid.place(wall, self.wall_count);
    }

    /// Removes `wall`, which must be the most recently placed one
    pub(crate) fn remove_last_wall(&mut self, wall: &Wall) {
        self.grid.remove(wall);
        self.wall_count -= 1;
    }

    pub fn is_at_target(&self, id: usize) -> bool {
        let player = &self.players[id];
        self.grid.contains(player.pos) && self.grid.is_on_edge(player.pos, player.target)
    }

    pub fn path(&mut self, id: usize) -> PathData {
        let player = &self.players[id];
        let (pos, target) = (player.pos, player.target);
        self.grid.distance_and_direction(pos, target)
    }

    pub fn distance(&mut self, id: usize) -> Option<u32> {
        self.path(id).distance
    }

    pub fn apply(&mut self, mv: &Move) {
        match mv.kind {
            MoveKind::Step(dir) => self.step(mv.player, dir),
            MoveKind::Wall(wall) => {
                debug_assert!(!self.overlaps(&wall));
                self.players[mv.player].walls_left -= 1;
                self.walls_in_flight += 1;
                self.place_wall_unchecked(&wall);
            }
        }
        self.moves_applied += 1;
    }

    pub fn undo(&mut self, mv: &Move) {
        match mv.kind {
            MoveKind::Step(dir) => self.step(mv.player, dir.opposite()),
            MoveKind::Wall(wall) => {
                self.remove_last_wall(&wall);
                self.walls_in_flight -= 1;
                self.players[mv.player].walls_left += 1;
            }
        }
        self.moves_applied -= 1;
    }

    fn step(&mut self, id: usize, dir: Direction) {
        let pos = dir.apply(&self.players[id].pos);
        self.players[id].pos = pos;
        self.players[id].is_finished = self.is_at_target(id);
    }

    /// Next player after `id` in ring order that is alive and not finished.
    ///
    /// Visits at most `player_count` seats; `None` when nobody is eligible.
    pub fn next_player(&self, id: usize) -> Option<usize> {
        let count = self.players.len();
        (1..=count)
            .map(|offset| (id + offset) % count)
            .find(|&next| self.players[next].is_playing())
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive).count()
    }

    /// An alive player that has already reached its target during search
    pub fn finished_player(&self) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.is_alive && p.is_finished)
    }

    /// Alive players' positions, for wall locality filtering
    pub fn alive_positions(&self) -> impl Iterator<Item = Coord> + '_ {
        self.players.iter().filter(|p| p.is_alive).map(|p| p.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;

    fn board() -> Board {
        let mut board = Board::new(9, 9, 3);
        board.update_player(0, Coord::new(0, 4), 6);
        board.update_player(1, Coord::new(8, 2), 6);
        board.update_player(2, Coord::new(4, 0), 6);
        board
    }

    #[test]
    fn test_target_edges_by_id() {
        let board = board();
        assert_eq!(board.player(0).target, Direction::Right);
        assert_eq!(board.player(1).target, Direction::Left);
        assert_eq!(board.player(2).target, Direction::Down);
    }

    #[test]
    fn test_player_count_is_clamped() {
        assert_eq!(Board::new(9, 9, 1).player_count(), 2);
        assert_eq!(Board::new(9, 9, 7).player_count(), 3);
    }

    #[test]
    fn test_eliminated_sentinel_marks_player_dead() {
        let mut board = board();
        board.update_player(1, ELIMINATED, 0);
        assert!(!board.player(1).is_alive);
        assert_eq!(board.alive_count(), 2);
    }

    #[test]
    fn test_player_reported_on_target_is_out_of_race() {
        let mut board = board();
        board.update_player(0, Coord::new(8, 4), 3);
        assert!(!board.player(0).is_alive);
    }

    #[test]
    fn test_next_player_skips_dead_and_finished() {
        let mut board = board();
        assert_eq!(board.next_player(0), Some(1));
        assert_eq!(board.next_player(2), Some(0));

        board.update_player(1, ELIMINATED, 0);
        assert_eq!(board.next_player(0), Some(2));

        board.update_player(2, ELIMINATED, 0);
        assert_eq!(board.next_player(0), Some(0));

        board.update_player(0, ELIMINATED, 0);
        assert_eq!(board.next_player(0), None);
    }

    #[test]
    fn test_step_apply_undo_restores_board() {
        let mut board = board();
        let before = board.clone();
        let mv = Move::step(0, Direction::Right);
        board.apply(&mv);
        assert_eq!(board.player(0).pos, Coord::new(1, 4));
        assert_eq!(board.moves_applied(), 1);
        board.undo(&mv);
        assert_eq!(board, before);
    }

    #[test]
    fn test_wall_apply_undo_restores_board() {
        let mut board = board();
        assert!(board.add_wall(&Wall::horizontal(0, 1)));
        let before = board.clone();
        let mv = Move::wall(2, Wall::vertical(5, 5));
        board.apply(&mv);
        assert_eq!(board.player(2).walls_left, 5);
        assert_eq!(board.walls_in_flight(), 1);
        assert_eq!(board.wall_count(), 2);
        board.undo(&mv);
        assert_eq!(board, before);
    }

    #[test]
    fn test_stepping_onto_target_finishes_player() {
        let mut board = board();
        board.update_player(2, Coord::new(4, 7), 0);
        let mv = Move::step(2, Direction::Down).with_score(Score::default());
        board.apply(&mv);
        assert!(board.player(2).is_finished);
        assert_eq!(board.finished_player(), Some(2));
        assert_eq!(board.next_player(1), Some(0));
        board.undo(&mv);
        assert!(!board.player(2).is_finished);
    }
}

// Move scoring
//
// A move is scored by applying it, reading every racer's path, and undoing it.
// Scores are always relative to a perspective player. Tiers capture certain
// outcomes; the scalar ranks everything still undecided.
//
// Turn order matters for every race comparison: the player to move next wins
// ties against players seated after it.

use crate::board::Board;
use crate::config::Weights;
use crate::moves::Move;
use crate::score::{Outcome, Score};

/// One player's race state after the scored move
#[derive(Debug, Clone, Copy)]
struct Racer {
    id: usize,
    distance: i32,
    walls: i32,
    unblockable: bool,
}

impl Racer {
    /// Orders arrival: lower key reaches the target first
    fn race_key(&self, seat: usize) -> i32 {
        self.distance * 3 + seat as i32
    }
}

pub struct Scorer {
    weights: Weights,
}

impl Scorer {
    pub fn new(weights: Weights) -> Self {
        Scorer { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Scores `mv` from `perspective`'s point of view; the board is left unchanged
    pub fn score(&self, board: &mut Board, perspective: usize, mv: &Move) -> Score {
        if board.alive_count() <= 2 {
            return self.score_two_player(board, perspective, mv);
        }

        // someone already took first place: the rest race for second
        if let Some(done) = board.finished_player() {
            if done == perspective {
                return Score::uniform(0, Outcome::Won);
            }
            let score = self.score_two_player(board, perspective, mv);
            if score.is_illegal() {
                return score;
            }
            return Score::new(score.value, Outcome::Lost, score.first);
        }

        self.score_three_player(board, perspective, mv)
    }

    fn score_two_player(&self, board: &mut Board, perspective: usize, mv: &Move) -> Score {
        let seats = board
            .next_player(mv.player)
            .and_then(|first| board.next_player(first).map(|second| (first, second)));

        let (to_move, waiting) = match seats {
            Some((a, b)) if a != b => (a, b),
            _ => return self.score_alone(board, perspective, mv),
        };

        board.apply(mv);
        let to_move_racer = Self::racer(board, to_move);
        let waiting_racer = Self::racer(board, waiting);
        let weights = self.weights.two_player.at(board.ply_clock());
        board.undo(mv);

        let (first, second) = match (to_move_racer, waiting_racer) {
            (Some(a), Some(b)) => (a, b),
            _ => return Score::illegal(),
        };

        let (me, them, my_turn) = if perspective == to_move {
            (first, second, true)
        } else if perspective == waiting {
            (second, first, false)
        } else {
            return Score::uniform(0, Outcome::Undecided);
        };

        let state = if my_turn {
            if them.distance == 0 {
                Outcome::Lost
            } else if me.distance <= 1 {
                Outcome::Won
            } else if them.walls == 0 && me.distance <= them.distance {
                Outcome::Won
            } else if me.walls == 0 && me.distance > them.distance {
                Outcome::Lost
            } else {
                Outcome::Undecided
            }
        } else if me.distance == 0 {
            Outcome::Won
        } else if them.walls == 0 && me.distance < them.distance {
            Outcome::Won
        } else if me.walls == 0 && me.distance >= them.distance {
            Outcome::Lost
        } else if them.distance <= 1 {
            Outcome::Lost
        } else {
            Outcome::Undecided
        };

        let penalty = if me.walls == 0 {
            self.weights.out_of_walls_penalty
        } else {
            0
        };
        let value = weights.distance * (them.distance - me.distance)
            + weights.walls * (me.walls - them.walls)
            + penalty;

        Score::uniform(value, state)
    }

    /// Only the perspective player is still racing
    fn score_alone(&self, board: &mut Board, perspective: usize, mv: &Move) -> Score {
        board.apply(mv);
        let distance = board.distance(perspective);
        board.undo(mv);

        match distance {
            None => Score::illegal(),
            Some(0) => Score::uniform(0, Outcome::Won),
            Some(d) => Score::uniform(-(d as i32), Outcome::Undecided),
        }
    }

    fn score_three_player(&self, board: &mut Board, perspective: usize, mv: &Move) -> Score {
        let first = board.next_player(mv.player);
        let second = first.and_then(|id| board.next_player(id));
        let third = second.and_then(|id| board.next_player(id));
        let seats = match (first, second, third) {
            (Some(a), Some(b), Some(c)) if a != b && b != c && a != c => [a, b, c],
            _ => return self.score_two_player(board, perspective, mv),
        };

        board.apply(mv);
        let racers = seats.map(|id| Self::racer(board, id));
        let weights = self.weights.three_player.at(board.ply_clock());
        board.undo(mv);

        let racers = match racers {
            [Some(a), Some(b), Some(c)] => [a, b, c],
            _ => return Score::illegal(),
        };

        let my_seat = match racers.iter().position(|r| r.id == perspective) {
            Some(seat) => seat,
            None => return Score::uniform(0, Outcome::Undecided),
        };

        let me = racers[my_seat];
        let (opp_distance, opp_walls) = racers
            .iter()
            .filter(|r| r.id != perspective)
            .fold((0, 0), |(d, w), r| (d + r.distance, w + r.walls));
        let value = weights.distance * (opp_distance - 2 * me.distance)
            + weights.walls * (2 * me.walls - opp_walls);

        match Self::certain_winner(&racers) {
            Some(seat) if seat == my_seat => Score::uniform(value, Outcome::Won),
            Some(seat) => {
                // first place is gone; rescore as a duel for second
                let winner = racers[seat].id;
                board.set_alive(winner, false);
                let duel = self.score_two_player(board, perspective, mv);
                board.set_alive(winner, true);
                if duel.is_illegal() {
                    return duel;
                }
                Score::new(duel.value, Outcome::Lost, duel.first)
            }
            None => Score::uniform(value, Outcome::Undecided),
        }
    }

    /// Seat of a player certain to finish first, checked in priority order:
    /// already home or home next turn with nobody able to interfere, unopposed
    /// and strictly ahead, then an unblockable path strictly ahead.
    fn certain_winner(racers: &[Racer; 3]) -> Option<usize> {
        if let Some(seat) = racers.iter().position(|r| r.distance == 0) {
            return Some(seat);
        }

        let finishes_next = (0..3).find(|&seat| {
            racers[seat].distance == 1
                && racers[..seat]
                    .iter()
                    .all(|r| r.distance >= 2 && r.walls == 0)
        });
        if finishes_next.is_some() {
            return finishes_next;
        }

        let strictly_ahead = |seat: usize| {
            let key = racers[seat].race_key(seat);
            (0..3)
                .filter(|&other| other != seat)
                .all(|other| key < racers[other].race_key(other))
        };

        let unopposed = (0..3).find(|&seat| {
            strictly_ahead(seat)
                && (0..3)
                    .filter(|&other| other != seat)
                    .all(|other| racers[other].walls == 0)
        });
        if unopposed.is_some() {
            return unopposed;
        }

        (0..3).find(|&seat| racers[seat].unblockable && strictly_ahead(seat))
    }

    fn racer(board: &mut Board, id: usize) -> Option<Racer> {
        let path = board.path(id);
        path.distance.map(|distance| Racer {
            id,
            distance: distance as i32,
            walls: board.player(id).walls_left as i32,
            unblockable: path.unblockable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhasedWeights;
    use crate::types::{Coord, Direction, Wall};

    fn two_player(p0: Coord, w0: u32, p1: Coord, w1: u32) -> Board {
        let mut board = Board::new(9, 9, 2);
        board.update_player(0, p0, w0);
        board.update_player(1, p1, w1);
        board
    }

    fn scorer() -> Scorer {
        Scorer::new(Weights::default())
    }

    #[test]
    fn test_step_home_is_won() {
        let mut board = two_player(Coord::new(7, 4), 0, Coord::new(8, 0), 5);
        let mv = Move::step(0, Direction::Right);
        let score = scorer().score(&mut board, 0, &mv);
        assert!(score.is_decisive_win());
    }

    #[test]
    fn test_step_home_is_lost_for_opponent() {
        let mut board = two_player(Coord::new(7, 4), 0, Coord::new(8, 0), 5);
        let mv = Move::step(0, Direction::Right);
        let score = scorer().score(&mut board, 1, &mv);
        assert!(score.is_decisive_loss());
    }

    #[test]
    fn test_unopposed_lead_is_won() {
        // player 1 moves next but has no walls; player 0 is closer
        let mut board = two_player(Coord::new(4, 4), 3, Coord::new(7, 0), 0);
        let mv = Move::step(0, Direction::Right);
        let score = scorer().score(&mut board, 0, &mv);
        assert_eq!(score.first, Outcome::Won);
    }

    #[test]
    fn test_out_of_walls_and_behind_is_lost() {
        let mut board = two_player(Coord::new(1, 4), 0, Coord::new(4, 4), 2);
        let mv = Move::step(0, Direction::Right);
        let score = scorer().score(&mut board, 0, &mv);
        assert_eq!(score.first, Outcome::Lost);
    }

    #[test]
    fn test_undecided_scalar() {
        // after the step: me 5 away with 4 walls, them 4 away with 6 walls
        let mut board = two_player(Coord::new(2, 4), 4, Coord::new(4, 0), 6);
        let mv = Move::step(0, Direction::Right);
        let score = scorer().score(&mut board, 0, &mv);
        assert_eq!(score.first, Outcome::Undecided);
        assert_eq!(score.value, (4 - 5) + (4 - 6));
    }

    #[test]
    fn test_weights_scale_scalar() {
        let weights = Weights {
            two_player: PhasedWeights::constant(10, 0),
            ..Weights::default()
        };
        let mut board = two_player(Coord::new(2, 4), 4, Coord::new(4, 0), 6);
        let mv = Move::step(0, Direction::Right);
        let score = Scorer::new(weights).score(&mut board, 0, &mv);
        assert_eq!(score.value, -10);
    }

    #[test]
    fn test_scoring_leaves_board_untouched() {
        let mut board = two_player(Coord::new(2, 4), 4, Coord::new(4, 0), 6);
        let before = board.clone();
        let mv = Move::wall(0, Wall::vertical(4, 0));
        scorer().score(&mut board, 0, &mv);
        assert_eq!(board, before);
    }

    #[test]
    fn test_sealing_wall_is_illegal() {
        let mut board = Board::new(3, 3, 2);
        board.update_player(0, Coord::new(0, 0), 5);
        board.update_player(1, Coord::new(2, 2), 5);
        assert!(board.add_wall(&Wall::vertical(1, 0)));
        let mv = Move::wall(1, Wall::horizontal(0, 2));
        assert!(scorer().score(&mut board, 1, &mv).is_illegal());
    }

    fn three_player(p: [(Coord, u32); 3]) -> Board {
        let mut board = Board::new(9, 9, 3);
        for (id, (pos, walls)) in p.iter().enumerate() {
            board.update_player(id, *pos, *walls);
        }
        board
    }

    #[test]
    fn test_three_player_step_home_is_won() {
        let mut board = three_player([
            (Coord::new(7, 4), 2),
            (Coord::new(4, 4), 2),
            (Coord::new(2, 2), 2),
        ]);
        let mv = Move::step(0, Direction::Right);
        assert!(scorer().score(&mut board, 0, &mv).is_decisive_win());
    }

    #[test]
    fn test_three_player_other_winner_scores_duel_for_second() {
        // player 1 is one step from home and moves right after player 0
        let mut board = three_player([
            (Coord::new(2, 4), 0),
            (Coord::new(1, 6), 2),
            (Coord::new(5, 1), 2),
        ]);
        let mv = Move::step(0, Direction::Right);
        let score = scorer().score(&mut board, 0, &mv);
        assert_eq!(score.first, Outcome::Lost);
        // the duel with player 2 is still open
        assert_eq!(score.second, Outcome::Undecided);
        assert!(!score.is_settled_loss());
    }

    #[test]
    fn test_three_player_undecided_scalar() {
        let mut board = three_player([
            (Coord::new(0, 4), 5),
            (Coord::new(8, 4), 5),
            (Coord::new(4, 0), 5),
        ]);
        let mv = Move::step(0, Direction::Right);
        let score = scorer().score(&mut board, 0, &mv);
        assert_eq!(score.first, Outcome::Undecided);
        // me 7 away, opponents 8 and 8, everyone on 5 walls
        assert_eq!(score.value, 3 * (16 - 14) + 4 * (10 - 10));
    }

    #[test]
    fn test_three_player_unopposed_leader_wins() {
        // player 0 is 3 away with walls, both rivals are 5 away with none
        let mut board = three_player([
            (Coord::new(5, 4), 3),
            (Coord::new(5, 7), 0),
            (Coord::new(2, 2), 0),
        ]);
        let mv = Move::step(2, Direction::Down);

        assert!(scorer().score(&mut board, 0, &mv).is_decisive_win());

        // player 1 moves before player 2 and wins the duel for second
        let second = scorer().score(&mut board, 1, &mv);
        assert_eq!((second.first, second.second), (Outcome::Lost, Outcome::Won));

        let third = scorer().score(&mut board, 2, &mv);
        assert!(third.is_decisive_loss());
    }

    #[test]
    fn test_three_player_unblockable_leader_wins() {
        let mut board = three_player([
            (Coord::new(7, 1), 3),
            (Coord::new(4, 4), 3),
            (Coord::new(2, 5), 3),
        ]);
        let mv = Move::wall(0, Wall::horizontal(5, 8));

        // everyone still has walls, so player 0's single step is only safe
        // while nothing can be placed across it
        let open = scorer().score(&mut board, 0, &mv);
        assert_eq!(open.first, Outcome::Undecided);

        assert!(board.add_wall(&Wall::horizontal(7, 1)));
        assert!(board.add_wall(&Wall::horizontal(7, 2)));
        assert!(board.path(0).unblockable);

        assert!(scorer().score(&mut board, 0, &mv).is_decisive_win());
        assert_eq!(scorer().score(&mut board, 1, &mv).first, Outcome::Lost);
    }

    #[test]
    fn test_finished_player_takes_first_place() {
        let mut board = three_player([
            (Coord::new(6, 4), 0),
            (Coord::new(5, 2), 0),
            (Coord::new(4, 7), 2),
        ]);
        let home = Move::step(2, Direction::Down);
        board.apply(&home);
        assert_eq!(board.finished_player(), Some(2));

        let mv = Move::step(0, Direction::Right);
        assert_eq!(scorer().score(&mut board, 2, &mv), Score::uniform(0, Outcome::Won));

        // the rest race for second: player 0 is one step away and unopposed
        let p0 = scorer().score(&mut board, 0, &mv);
        assert_eq!((p0.first, p0.second), (Outcome::Lost, Outcome::Won));
        assert!(p0.is_settled_loss());

        let p1 = scorer().score(&mut board, 1, &mv);
        assert!(p1.is_decisive_loss());

        board.undo(&home);
        assert_eq!(board.finished_player(), None);
    }
}

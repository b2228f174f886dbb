// Host line protocol
//
// Setup:   `width height playerCount myId`
// Turn:    one `x y wallsLeft` line per player, a wall count line, then one
//          `x y H|V` line per placed wall
// Answer:  `UP`, `DOWN`, `LEFT`, `RIGHT` or `x y H|V`

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use thiserror::Error;

use crate::board::Board;
use crate::types::{Coord, Orientation, Wall};

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("line {line}: invalid wall orientation '{token}'")]
    Orientation { line: usize, token: String },
}

/// Game parameters sent once before the first turn
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    pub width: i32,
    pub height: i32,
    pub player_count: usize,
    pub my_id: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub pos: Coord,
    pub walls_left: u32,
}

/// Everything the host sends for one turn
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    pub players: Vec<PlayerState>,
    pub walls: Vec<Wall>,
}

impl TurnState {
    /// Builds a fresh board for this turn
    ///
    /// `ply` is the number of plies played before this one and drives the
    /// weight phases.
    pub fn to_board(&self, setup: &Setup, ply: u32) -> Board {
        let mut board = Board::new(setup.width, setup.height, setup.player_count);
        board.set_turn(ply);
        for (id, player) in self.players.iter().enumerate() {
            board.update_player(id, player.pos, player.walls_left);
        }
        for wall in &self.walls {
            board.add_wall(wall);
        }
        board
    }
}

/// Reads setup and turns from any buffered source
pub struct ProtocolReader<R: BufRead> {
    input: R,
    line_no: usize,
    buffer: String,
}

impl<R: BufRead> ProtocolReader<R> {
    pub fn new(input: R) -> Self {
        ProtocolReader {
            input,
            line_no: 0,
            buffer: String::new(),
        }
    }

    /// Next non-empty line split into tokens; `None` at end of input
    fn next_tokens(&mut self) -> Result<Option<Vec<String>>, ProtocolError> {
        loop {
            self.buffer.clear();
            if self.input.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let tokens: Vec<String> = self.buffer.split_whitespace().map(str::to_string).collect();
            if !tokens.is_empty() {
                return Ok(Some(tokens));
            }
        }
    }

    fn expect_tokens(
        &mut self,
        what: &'static str,
        count: usize,
    ) -> Result<Vec<String>, ProtocolError> {
        let tokens = self.next_tokens()?.ok_or(ProtocolError::UnexpectedEof(what))?;
        if tokens.len() < count {
            return Err(ProtocolError::Malformed {
                line: self.line_no,
                message: format!("expected {} values for {}, got {}", count, what, tokens.len()),
            });
        }
        Ok(tokens)
    }

    fn number<T: std::str::FromStr>(&self, token: &str) -> Result<T, ProtocolError> {
        token.parse().map_err(|_| ProtocolError::Malformed {
            line: self.line_no,
            message: format!("'{}' is not a number", token),
        })
    }

    pub fn read_setup(&mut self) -> Result<Setup, ProtocolError> {
        let t = self.expect_tokens("setup", 4)?;
        Ok(Setup {
            width: self.number(&t[0])?,
            height: self.number(&t[1])?,
            player_count: self.number(&t[2])?,
            my_id: self.number(&t[3])?,
        })
    }

    /// Reads one turn; `Ok(None)` when the host closed the input between turns
    pub fn read_turn(&mut self, player_count: usize) -> Result<Option<TurnState>, ProtocolError> {
        let mut players = Vec::with_capacity(player_count);
        for i in 0..player_count {
            let t = if i == 0 {
                match self.next_tokens()? {
                    Some(t) if t.len() >= 3 => t,
                    Some(t) => {
                        return Err(ProtocolError::Malformed {
                            line: self.line_no,
                            message: format!("expected 3 values for player, got {}", t.len()),
                        })
                    }
                    None => return Ok(None),
                }
            } else {
                self.expect_tokens("player", 3)?
            };
            players.push(PlayerState {
                pos: Coord::new(self.number(&t[0])?, self.number(&t[1])?),
                walls_left: self.number(&t[2])?,
            });
        }

        let count: usize = {
            let t = self.expect_tokens("wall count", 1)?;
            self.number(&t[0])?
        };

        let mut walls = Vec::with_capacity(count);
        for _ in 0..count {
            let t = self.expect_tokens("wall", 3)?;
            let orientation = Orientation::parse(&t[2]).ok_or_else(|| ProtocolError::Orientation {
                line: self.line_no,
                token: t[2].clone(),
            })?;
            walls.push(Wall::new(self.number(&t[0])?, self.number(&t[1])?, orientation));
        }

        Ok(Some(TurnState { players, walls }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const INPUT: &str = "9 9 2 0\n\
                         0 4 10\n\
                         8 4 9\n\
                         1\n\
                         3 0 V\n";

    #[test]
    fn test_reads_setup_and_turn() {
        let mut reader = ProtocolReader::new(Cursor::new(INPUT));
        let setup = reader.read_setup().unwrap();
        assert_eq!(
            setup,
            Setup {
                width: 9,
                height: 9,
                player_count: 2,
                my_id: 0
            }
        );

        let turn = reader.read_turn(setup.player_count).unwrap().unwrap();
        assert_eq!(turn.players[1].pos, Coord::new(8, 4));
        assert_eq!(turn.players[1].walls_left, 9);
        assert_eq!(turn.walls, vec![Wall::vertical(3, 0)]);

        assert!(reader.read_turn(setup.player_count).unwrap().is_none());
    }

    #[test]
    fn test_turn_builds_board() {
        let mut reader = ProtocolReader::new(Cursor::new(INPUT));
        let setup = reader.read_setup().unwrap();
        let turn = reader.read_turn(2).unwrap().unwrap();
        let board = turn.to_board(&setup, 0);
        assert_eq!(board.wall_count(), 1);
        assert_eq!(board.player(0).walls_left, 10);
        assert!(board.grid().is_blocked(Coord::new(3, 0), Coord::new(2, 0)));
    }

    #[test]
    fn test_bad_orientation_is_reported() {
        let input = "0 4 10\n8 4 9\n1\n3 0 Q\n";
        let mut reader = ProtocolReader::new(Cursor::new(input));
        match reader.read_turn(2) {
            Err(ProtocolError::Orientation { line, token }) => {
                assert_eq!(line, 4);
                assert_eq!(token, "Q");
            }
            other => panic!("expected orientation error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_turn_is_an_error() {
        let input = "0 4 10\n8 4 9\n";
        let mut reader = ProtocolReader::new(Cursor::new(input));
        assert!(matches!(
            reader.read_turn(2),
            Err(ProtocolError::UnexpectedEof("wall count"))
        ));
    }

    #[test]
    fn test_non_numeric_is_malformed() {
        let mut reader = ProtocolReader::new(Cursor::new("9 nine 2 0\n"));
        assert!(matches!(
            reader.read_setup(),
            Err(ProtocolError::Malformed { line: 1, .. })
        ));
    }
}

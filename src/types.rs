// Great Escape board primitives
// Coordinates follow the host convention: x grows to the right, y grows downward.

use serde::{Deserialize, Serialize};

/// 2D cell coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    fn offset(&self, dx: i32, dy: i32) -> Coord {
        Coord { x: self.x + dx, y: self.y + dy }
    }
}

/// The four step directions, also used to name the target edge of a player
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in tie-breaking order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to the token the host expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => coord.offset(0, -1),
            Direction::Down => coord.offset(0, 1),
            Direction::Left => coord.offset(-1, 0),
            Direction::Right => coord.offset(1, 0),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "H",
            Orientation::Vertical => "V",
        }
    }

    pub fn parse(token: &str) -> Option<Orientation> {
        match token {
            "H" => Some(Orientation::Horizontal),
            "V" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

/// A wall two cells long, anchored at `pos`
///
/// Horizontal walls sit on the top side of `pos` and of the cell to its right.
/// Vertical walls sit on the left side of `pos` and of the cell below it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wall {
    pub pos: Coord,
    pub orientation: Orientation,
}

impl Wall {
    pub fn new(x: i32, y: i32, orientation: Orientation) -> Self {
        Wall { pos: Coord::new(x, y), orientation }
    }

    pub fn horizontal(x: i32, y: i32) -> Self {
        Self::new(x, y, Orientation::Horizontal)
    }

    pub fn vertical(x: i32, y: i32) -> Self {
        Self::new(x, y, Orientation::Vertical)
    }

    /// The two cell pairs this wall separates
    pub fn edges(&self) -> [(Coord, Coord); 2] {
        let p = self.pos;
        match self.orientation {
            Orientation::Horizontal => [
                (p, p.offset(0, -1)),
                (p.offset(1, 0), p.offset(1, -1)),
            ],
            Orientation::Vertical => [
                (p, p.offset(-1, 0)),
                (p.offset(0, 1), p.offset(-1, 1)),
            ],
        }
    }

    /// The cell pairs spanned by a perpendicular wall crossing this one at its midpoint
    pub fn crossing_edges(&self) -> [(Coord, Coord); 2] {
        let p = self.pos;
        match self.orientation {
            Orientation::Horizontal => [
                (p, p.offset(1, 0)),
                (p.offset(0, -1), p.offset(1, -1)),
            ],
            Orientation::Vertical => [
                (p, p.offset(0, 1)),
                (p.offset(-1, 0), p.offset(-1, 1)),
            ],
        }
    }

    /// Whether the anchor is a valid placement on a board of this size
    pub fn is_on_board(&self, width: i32, height: i32) -> bool {
        let p = self.pos;
        match self.orientation {
            Orientation::Horizontal => p.x >= 0 && p.x < width - 1 && p.y >= 1 && p.y < height,
            Orientation::Vertical => p.x >= 1 && p.x < width && p.y >= 0 && p.y < height - 1,
        }
    }

    /// The (up to two) walls that would block the step between adjacent cells `a` and `b`
    pub fn covering(a: Coord, b: Coord) -> [Wall; 2] {
        if a.x == b.x {
            // vertical step, blocked by a horizontal wall on the lower cell's top side
            let y = a.y.max(b.y);
            [Wall::horizontal(a.x, y), Wall::horizontal(a.x - 1, y)]
        } else {
            let x = a.x.max(b.x);
            [Wall::vertical(x, a.y), Wall::vertical(x, a.y - 1)]
        }
    }

    /// Formats the wall as the host action `x y H|V`
    pub fn to_action(&self) -> String {
        format!("{} {} {}", self.pos.x, self.pos.y, self.orientation.as_str())
    }
}

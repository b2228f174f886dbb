// Path grid: dense edge-blocking matrix plus breadth-first shortest path queries
//
// The matrix has one entry per ordered cell pair, so memory is O(cells^2).
// That is only reasonable because boards stay around 9x9; in exchange every
// blocked-edge query is a single array read.

use crate::legality;
use crate::types::{Coord, Direction, Wall};

const UNVISITED: i32 = -1;

/// Result of a shortest path query towards a target edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathData {
    /// Steps to the nearest target cell, `None` when no path exists
    pub distance: Option<u32>,
    /// First step of a shortest path, `None` when already on target or unreachable
    pub direction: Option<Direction>,
    /// No legal wall can ever cut the found path
    pub unblockable: bool,
}

impl PathData {
    pub fn unreachable() -> Self {
        PathData {
            distance: None,
            direction: None,
            unblockable: false,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_some()
    }
}

/// Symmetric edge-blocking store with reusable BFS buffers
#[derive(Debug, Clone)]
pub struct PathGrid {
    width: i32,
    height: i32,
    cells: usize,
    /// Placement index of the wall blocking each ordered pair, 0 when open
    blocked: Vec<u16>,
    distances: Vec<i32>,
    parents: Vec<usize>,
    first_steps: Vec<Option<Direction>>,
    queue: Vec<usize>,
}

impl PartialEq for PathGrid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.blocked == other.blocked
    }
}

impl Eq for PathGrid {}

impl PathGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width.max(0) * height.max(0)) as usize;
        PathGrid {
            width,
            height,
            cells,
            blocked: vec![0; cells * cells],
            distances: vec![UNVISITED; cells],
            parents: vec![0; cells],
            first_steps: vec![None; cells],
            queue: Vec::with_capacity(cells),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Coord) -> usize {
        (pos.x + pos.y * self.width) as usize
    }

    fn coord(&self, index: usize) -> Coord {
        let index = index as i32;
        Coord::new(index % self.width, index / self.width)
    }

    fn pair_index(&self, a: Coord, b: Coord) -> Option<usize> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        Some(self.index(a) * self.cells + self.index(b))
    }

    /// Placement index of the wall between `a` and `b`, 0 when open or off-board
    pub fn placement(&self, a: Coord, b: Coord) -> u16 {
        self.pair_index(a, b).map_or(0, |i| self.blocked[i])
    }

    pub fn is_blocked(&self, a: Coord, b: Coord) -> bool {
        self.placement(a, b) != 0
    }

    fn set_pair(&mut self, a: Coord, b: Coord, value: u16) {
        if let (Some(ab), Some(ba)) = (self.pair_index(a, b), self.pair_index(b, a)) {
            self.blocked[ab] = value;
            self.blocked[ba] = value;
        }
    }

    /// Blocks both edges of `wall`, tagging them with `index` (must be non-zero)
    pub fn place(&mut self, wall: &Wall, index: u16) {
        debug_assert!(index != 0);
        for (a, b) in wall.edges() {
            self.set_pair(a, b, index);
        }
    }

    /// Reopens both edges of `wall`
    pub fn remove(&mut self, wall: &Wall) {
        for (a, b) in wall.edges() {
            self.set_pair(a, b, 0);
        }
    }

    /// Whether `pos` lies on the given board edge
    pub fn is_on_edge(&self, pos: Coord, edge: Direction) -> bool {
        match edge {
            Direction::Up => pos.y == 0,
            Direction::Down => pos.y == self.height - 1,
            Direction::Left => pos.x == 0,
            Direction::Right => pos.x == self.width - 1,
        }
    }

    /// Shortest distance from `from` to any cell of `target`, with the first step
    /// of that path and whether the path is unblockable.
    ///
    /// Neighbours are expanded in `Direction::all()` order, so among equally
    /// short paths the first step prefers up, down, left, right in that order.
    pub fn distance_and_direction(&mut self, from: Coord, target: Direction) -> PathData {
        if !self.contains(from) {
            return PathData::unreachable();
        }

        self.distances.fill(UNVISITED);
        self.queue.clear();

        let start = self.index(from);
        self.distances[start] = 0;
        self.parents[start] = start;
        self.first_steps[start] = None;
        self.queue.push(start);

        let mut read = 0;
        while read < self.queue.len() {
            let current = self.queue[read];
            read += 1;

            let pos = self.coord(current);
            if self.is_on_edge(pos, target) {
                return PathData {
                    distance: Some(self.distances[current] as u32),
                    direction: self.first_steps[current],
                    unblockable: self.path_is_unblockable(start, current),
                };
            }

            for dir in Direction::all() {
                let next_pos = dir.apply(&pos);
                if !self.contains(next_pos) || self.is_blocked(pos, next_pos) {
                    continue;
                }
                let next = self.index(next_pos);
                if self.distances[next] != UNVISITED {
                    continue;
                }
                self.distances[next] = self.distances[current] + 1;
                self.parents[next] = current;
                self.first_steps[next] = if current == start {
                    Some(dir)
                } else {
                    self.first_steps[current]
                };
                self.queue.push(next);
            }
        }

        PathData::unreachable()
    }

    /// Shortest distance only
    pub fn distance(&mut self, from: Coord, target: Direction) -> Option<u32> {
        self.distance_and_direction(from, target).distance
    }

    /// Walks the parent chain back from `end`; every step must be impossible to wall off
    fn path_is_unblockable(&self, start: usize, end: usize) -> bool {
        let mut cell = end;
        while cell != start {
            let parent = self.parents[cell];
            let (a, b) = (self.coord(parent), self.coord(cell));
            let can_be_cut = Wall::covering(a, b).iter().any(|wall| {
                wall.is_on_board(self.width, self.height) && !legality::overlaps(self, wall)
            });
            if can_be_cut {
                return false;
            }
            cell = parent;
        }
        true
    }
}

// Wall legality: overlap/crossing detection and the "everyone can still finish" rule

use crate::board::Board;
use crate::grid::PathGrid;
use crate::types::Wall;

/// True if `wall` shares an edge with an existing wall or crosses one at its midpoint.
///
/// A crossing is detected when the two edges a perpendicular wall would occupy
/// carry the same non-zero placement index, i.e. one wall blocks both.
pub fn overlaps(grid: &PathGrid, wall: &Wall) -> bool {
    if wall.edges().iter().any(|&(a, b)| grid.is_blocked(a, b)) {
        return true;
    }

    let [(a1, b1), (a2, b2)] = wall.crossing_edges();
    let first = grid.placement(a1, b1);
    first != 0 && first == grid.placement(a2, b2)
}

impl Board {
    pub fn overlaps(&self, wall: &Wall) -> bool {
        overlaps(self.grid(), wall)
    }

    /// Every alive, unfinished player still has a finite path to its target edge
    pub fn everyone_can_finish(&mut self) -> bool {
        (0..self.player_count()).all(|id| {
            let player = self.player(id);
            !player.is_alive || player.is_finished || self.distance(id).is_some()
        })
    }

    /// Whether `wall` may be placed on the current board
    ///
    /// The first wall of a game can never disconnect an open grid, so the
    /// hypothetical placement is skipped while no wall is on the board.
    pub fn can_place(&mut self, wall: &Wall) -> bool {
        if !wall.is_on_board(self.width(), self.height()) || self.overlaps(wall) {
            return false;
        }

        if self.wall_count() == 0 {
            return true;
        }

        self.place_wall_unchecked(wall);
        let allowed = self.everyone_can_finish();
        self.remove_last_wall(wall);
        allowed
    }
}

//! Dodo board topology.
//!
//! Enumerates the cells of a size-`N` hexagonal board, assigns each cell a
//! dense index, and precomputes the per-player forward-neighbor tables.
//! Everything here is immutable after construction and shared by reference
//! between game states, so a whole search tree reuses one `Board`.

use std::collections::HashMap;

use crate::constants::{BLUE_DIRECTIONS, RED_DIRECTIONS};
use crate::hex::{Cell, neighbor};
use crate::state::Player;

/// Enumerate the cells of a size-`size` board in canonical order.
///
/// The board is the hexagon `max(|q|, |r|, |q - r|) <= size - 1`, walked
/// row by row from `r = size - 1` down to `r = -(size - 1)`. The order is
/// fixed so that legal-action lists, and therefore search traces, are
/// reproducible.
pub fn generate_cells(size: i32) -> Vec<Cell> {
    let n = size - 1;
    let mut cells = Vec::new();
    for r in (-n..=n).rev() {
        let q1 = (-n).max(r - n);
        let q2 = n.min(r + n);
        for q in q1..=q2 {
            cells.push(Cell::new(q, r));
        }
    }
    cells
}

/// Per-cell forward neighbors for one direction set, restricted to the
/// board and expressed as dense indices.
pub fn generate_neighbors(
    cells: &[Cell],
    index: &HashMap<Cell, usize>,
    directions: &[usize],
) -> Vec<Vec<usize>> {
    cells
        .iter()
        .map(|&cell| {
            directions
                .iter()
                .filter_map(|&dir| index.get(&neighbor(cell, dir)).copied())
                .collect()
        })
        .collect()
}

/// Immutable topology of a size-`size` Dodo board.
pub struct Board {
    size: i32,
    cells: Vec<Cell>,
    index: HashMap<Cell, usize>,
    red_neighbors: Vec<Vec<usize>>,
    blue_neighbors: Vec<Vec<usize>>,
}

impl Board {
    /// Build the cell enumeration and both neighbor tables.
    pub fn new(size: i32) -> Board {
        assert!(size >= 2, "board size must be at least 2");
        let cells = generate_cells(size);
        let index: HashMap<Cell, usize> =
            cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        let red_neighbors = generate_neighbors(&cells, &index, &RED_DIRECTIONS);
        let blue_neighbors = generate_neighbors(&cells, &index, &BLUE_DIRECTIONS);
        Board { size, cells, index, red_neighbors, blue_neighbors }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Number of cells, `3N^2 - 3N + 1`.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All on-board cells in canonical order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }

    /// Dense index of `cell`, or `None` when it is off the board.
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.index.get(&cell).copied()
    }

    /// Forward neighbors (dense indices) of the cell at `idx` for `player`.
    #[inline]
    pub fn forward_neighbors(&self, player: Player, idx: usize) -> &[usize] {
        match player {
            Player::Red => &self.red_neighbors[idx],
            Player::Blue => &self.blue_neighbors[idx],
        }
    }

    /// Checkers each side starts with: `N(N+1)/2 + (N-1)`.
    pub fn checkers_per_side(&self) -> usize {
        let n = self.size as usize;
        n * (n + 1) / 2 + (n - 1)
    }

    /// The starting occupancy: Red in its home wedge, Blue in the opposite
    /// one, the band between them empty. Requires `size >= 3`; smaller
    /// boards have no well-formed start.
    pub fn starting_occupancy(&self) -> Vec<Option<Player>> {
        assert!(self.size >= 3, "no starting position for boards smaller than 3");
        self.cells
            .iter()
            .map(|cell| {
                if -cell.q > cell.r + (self.size - 3) {
                    Some(Player::Red)
                } else if cell.r > -cell.q + (self.size - 3) {
                    Some(Player::Blue)
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count_matches_formula() {
        for size in 2..=6 {
            let board = Board::new(size);
            let n = size as usize;
            assert_eq!(board.cell_count(), 3 * n * n - 3 * n + 1);
        }
    }

    #[test]
    fn test_canonical_order_is_stable() {
        let cells = generate_cells(4);
        assert_eq!(cells.len(), 37);
        assert_eq!(cells[0], Cell::new(0, 3));
        assert_eq!(cells[cells.len() - 1], Cell::new(0, -3));
        assert_eq!(cells, generate_cells(4));
    }

    #[test]
    fn test_index_round_trip() {
        let board = Board::new(4);
        for (i, &cell) in board.cells().iter().enumerate() {
            assert_eq!(board.index_of(cell), Some(i));
        }
        assert_eq!(board.index_of(Cell::new(4, 0)), None);
        assert_eq!(board.index_of(Cell::new(2, -2)), None);
    }

    #[test]
    fn test_forward_neighbors_are_on_board_and_forward() {
        let board = Board::new(4);
        let center = board.index_of(Cell::new(0, 0)).unwrap();

        let red: Vec<Cell> = board
            .forward_neighbors(Player::Red, center)
            .iter()
            .map(|&i| board.cells()[i])
            .collect();
        assert_eq!(red, vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(1, 0)]);

        let blue: Vec<Cell> = board
            .forward_neighbors(Player::Blue, center)
            .iter()
            .map(|&i| board.cells()[i])
            .collect();
        assert_eq!(blue, vec![Cell::new(-1, 0), Cell::new(0, -1), Cell::new(-1, -1)]);
    }

    #[test]
    fn test_edge_cells_lose_off_board_neighbors() {
        let board = Board::new(4);
        // Blue's far corner: every Red forward step leaves the board.
        let corner = board.index_of(Cell::new(3, 3)).unwrap();
        assert!(board.forward_neighbors(Player::Red, corner).is_empty());
        // Red's far corner, same thing for Blue.
        let corner = board.index_of(Cell::new(-3, -3)).unwrap();
        assert!(board.forward_neighbors(Player::Blue, corner).is_empty());
    }

    #[test]
    fn test_starting_wedges() {
        let board = Board::new(4);
        let occupancy = board.starting_occupancy();

        let red = occupancy.iter().filter(|o| **o == Some(Player::Red)).count();
        let blue = occupancy.iter().filter(|o| **o == Some(Player::Blue)).count();
        let empty = occupancy.iter().filter(|o| o.is_none()).count();

        assert_eq!(red, board.checkers_per_side());
        assert_eq!(blue, board.checkers_per_side());
        assert_eq!(red, 13);
        assert_eq!(red + blue + empty, board.cell_count());
    }

    #[test]
    fn test_starting_wedges_all_sizes() {
        for size in 3..=6 {
            let board = Board::new(size);
            let occupancy = board.starting_occupancy();
            let red = occupancy.iter().filter(|o| **o == Some(Player::Red)).count();
            let blue = occupancy.iter().filter(|o| **o == Some(Player::Blue)).count();
            assert_eq!(red, board.checkers_per_side(), "size {size}");
            assert_eq!(blue, board.checkers_per_side(), "size {size}");
        }
    }
}

//! Immutable Dodo game state.
//!
//! A [`GameState`] owns a dense occupancy vector over the board's
//! canonical cell order, the side to move, the per-side owned-cell index
//! lists and the precomputed legal-action list. [`GameState::play`]
//! produces a fresh state and never mutates the current one, so states can
//! be shared freely between search-tree nodes.
//!
//! Dodo has no captures: a move empties its source and fills its empty
//! destination, so the checker count per side is constant for a whole
//! game. A player with no legal move *wins* (misère blockade).

use std::fmt;
use std::rc::Rc;

use crate::board::Board;
use crate::hex::Cell;

/// A side. Red always opens the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Blue,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Interface code: R = 1, B = 2 (0 marks an empty cell).
    pub fn code(self) -> u8 {
        match self {
            Player::Red => 1,
            Player::Blue => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Player> {
        match code {
            1 => Some(Player::Red),
            2 => Some(Player::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => write!(f, "R"),
            Player::Blue => write!(f, "B"),
        }
    }
}

/// A Dodo move: source cell, destination cell.
pub type Action = (Cell, Cell);

/// Render an action as `(q, r) -> (q, r)`.
pub fn str_action(action: Action) -> String {
    format!("{} -> {}", action.0, action.1)
}

/// An immutable Dodo position.
#[derive(Clone)]
pub struct GameState {
    board: Rc<Board>,
    occupancy: Vec<Option<Player>>,
    to_move: Player,
    red_cells: Vec<usize>,
    blue_cells: Vec<usize>,
    legals: Vec<Action>,
}

impl GameState {
    /// Build a state from an occupancy vector, computing the owned-cell
    /// indices and the legal-action list up front.
    pub fn new(board: Rc<Board>, occupancy: Vec<Option<Player>>, to_move: Player) -> GameState {
        assert_eq!(
            occupancy.len(),
            board.cell_count(),
            "occupancy must cover every board cell"
        );

        let mut red_cells = Vec::new();
        let mut blue_cells = Vec::new();
        for (idx, owner) in occupancy.iter().enumerate() {
            match owner {
                Some(Player::Red) => red_cells.push(idx),
                Some(Player::Blue) => blue_cells.push(idx),
                None => {}
            }
        }

        let own_cells = match to_move {
            Player::Red => &red_cells,
            Player::Blue => &blue_cells,
        };
        let mut legals = Vec::new();
        for &src in own_cells {
            for &dst in board.forward_neighbors(to_move, src) {
                if occupancy[dst].is_none() {
                    legals.push((board.cells()[src], board.cells()[dst]));
                }
            }
        }

        GameState { board, occupancy, to_move, red_cells, blue_cells, legals }
    }

    /// The starting position on `board`, Red to move.
    pub fn opening(board: Rc<Board>) -> GameState {
        let occupancy = board.starting_occupancy();
        GameState::new(board, occupancy, Player::Red)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Dense occupancy in the board's canonical cell order.
    pub fn occupancy(&self) -> &[Option<Player>] {
        &self.occupancy
    }

    /// Dense indices of Red-owned cells, ascending.
    pub fn red_cells(&self) -> &[usize] {
        &self.red_cells
    }

    /// Dense indices of Blue-owned cells, ascending.
    pub fn blue_cells(&self) -> &[usize] {
        &self.blue_cells
    }

    /// The cached legal actions of the side to move, in canonical order.
    pub fn legal_actions(&self) -> &[Action] {
        &self.legals
    }

    /// A position is terminal exactly when the side to move cannot move.
    pub fn is_terminal(&self) -> bool {
        self.legals.is_empty()
    }

    /// The winner of a terminal position: the side to move. Dodo is a
    /// misère blockade, the blocked player wins.
    pub fn winner(&self) -> Player {
        debug_assert!(self.is_terminal(), "winner() on a non-terminal state");
        self.to_move
    }

    /// Apply a legal action, producing the successor position: the source
    /// cell is emptied, the destination takes the mover's checker, and the
    /// turn passes. Calling this with an action that is not in
    /// [`legal_actions`](GameState::legal_actions) is a programmer error.
    pub fn play(&self, action: Action) -> GameState {
        debug_assert!(
            self.legals.contains(&action),
            "illegal action {}",
            str_action(action)
        );
        let (src, dst) = action;
        let src_idx = self.index(src);
        let dst_idx = self.index(dst);
        let mut occupancy = self.occupancy.clone();
        occupancy[src_idx] = None;
        occupancy[dst_idx] = Some(self.to_move);
        GameState::new(Rc::clone(&self.board), occupancy, self.to_move.opponent())
    }

    fn index(&self, cell: Cell) -> usize {
        self.board
            .index_of(cell)
            .unwrap_or_else(|| panic!("cell {cell} is off the board"))
    }
}

impl fmt::Display for GameState {
    /// Row-per-`r` text rendering, `r` decreasing top to bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.board.size() - 1;
        for r in (-n..=n).rev() {
            let q1 = (-n).max(r - n);
            let q2 = n.min(r + n);
            write!(f, "{}", " ".repeat((q1 + n) as usize))?;
            for q in q1..=q2 {
                let idx = self.index(Cell::new(q, r));
                let glyph = match self.occupancy[idx] {
                    Some(Player::Red) => 'R',
                    Some(Player::Blue) => 'B',
                    None => '.',
                };
                write!(f, "{glyph} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{} to move", self.to_move)
    }
}

//! The four-operation interface driven by match harnesses.
//!
//! Positions cross this boundary as sparse `(cell, owner)` lists with the
//! numeric codes `0` empty, `1` Red, `2` Blue; cells absent from a list
//! are empty, and `0` entries are tolerated. The core projects a list onto
//! the board's dense cell enumeration immediately and never hands the
//! sparse form further down.
//!
//! There is no wire format and no persisted state; the harness calls
//! [`initialize`] once, then alternates [`strategy`] and [`new_state`],
//! and finally [`final_result`].

use std::rc::Rc;

use crate::agent::{Agent, AgentError};
use crate::board::Board;
use crate::hex::Cell;
use crate::state::{Action, Player};

/// A sparse externally-exchanged position.
pub type State = Vec<(Cell, u8)>;

/// Project a sparse state onto the board's dense cell enumeration.
pub fn project_state(
    board: &Board,
    state: &[(Cell, u8)],
) -> Result<Vec<Option<Player>>, AgentError> {
    let mut occupancy = vec![None; board.cell_count()];
    for &(cell, code) in state {
        let idx = board.index_of(cell).ok_or(AgentError::OffBoardCell(cell))?;
        if code == 0 {
            continue;
        }
        let player = Player::from_code(code).ok_or(AgentError::InvalidPlayer(code))?;
        occupancy[idx] = Some(player);
    }
    Ok(occupancy)
}

/// The wedge starting position for a size-`size` board; Red moves first.
pub fn starting_position(size: i32) -> State {
    let board = Board::new(size);
    board
        .cells()
        .iter()
        .zip(board.starting_occupancy())
        .filter_map(|(&cell, owner)| owner.map(|player| (cell, player.code())))
        .collect()
}

/// Build an agent playing `player` ("dodo" only) on a size-`size` board.
///
/// `state` is the opening position as the harness sees it. The game always
/// starts with Red to move, whichever side this agent plays; `total_time`
/// is the agent's whole clock in seconds, and `c`, `p`, `f` are the
/// exploration and time-allocation constants.
pub fn initialize(
    game: &str,
    state: &[(Cell, u8)],
    player: u8,
    size: i32,
    total_time: f64,
    c: f64,
    p: f64,
    f: f64,
) -> Result<Agent, AgentError> {
    if !game.eq_ignore_ascii_case("dodo") {
        return Err(AgentError::UnknownGame(game.to_string()));
    }
    if size < 2 {
        return Err(AgentError::BoardTooSmall(size));
    }
    let player = Player::from_code(player).ok_or(AgentError::InvalidPlayer(player))?;
    let board = Rc::new(Board::new(size));
    let occupancy = project_state(&board, state)?;
    Ok(Agent::new(board, occupancy, player, total_time, c, p, f))
}

/// One move for `player` (the agent's own side): reconcile the observed
/// state with the tree, then search under the remaining clock.
///
/// `Ok(None)` is the game-over sentinel: the position is terminal for the
/// side to move, which under Dodo's misère rule means this agent has won.
pub fn strategy(
    agent: &mut Agent,
    state: &[(Cell, u8)],
    player: u8,
    time_left: f64,
) -> Result<Option<Action>, AgentError> {
    debug_assert_eq!(Player::from_code(player), Some(agent.player()));
    let occupancy = project_state(agent.board(), state)?;
    agent.update_state(&occupancy)?;
    Ok(agent.select_best_move(time_left))
}

/// Apply `action` for `player` to a harness-side state list.
pub fn new_state(state: &mut State, action: Action, player: u8) {
    let (src, dst) = action;
    debug_assert!(
        state.contains(&(src, player)),
        "moving player does not occupy the source cell"
    );
    if let Some(idx) = state.iter().position(|&entry| entry == (src, player)) {
        state.remove(idx);
    }
    state.push((dst, player));
}

/// End-of-game notification from the harness. The engine keeps no state
/// beyond its tree, so there is nothing to record.
pub fn final_result(_state: &[(Cell, u8)], _score: i32, _player: u8) {}

//! The per-player Dodo engine.
//!
//! An [`Agent`] owns one search tree for the whole game. Each turn the
//! harness reports the observed board; [`Agent::update_state`] splices the
//! opponent's move into the tree (promoting the matching child to root),
//! and [`Agent::select_best_move`] searches under an adaptive time slice,
//! then advances the root into the chosen child so the accumulated
//! statistics carry over to the next turn.
//!
//! The time slice is `f * time_left / previous_mean_game_length`. The mean
//! rollout length observed during the last search estimates the plies
//! still to be played, so the quotient is a per-ply budget and `f` tunes
//! how front-loaded the spending is. The estimator starts at the total
//! time budget, which makes the first slice roughly `f` seconds.

use std::rc::Rc;

use thiserror::Error;

use crate::board::Board;
use crate::hex::Cell;
use crate::mcts::{self, TreeNode};
use crate::state::{Action, GameState, Player};

/// Protocol errors surfaced to the harness. The engine never recovers from
/// these on its own; guessing at a mismatched board would desynchronize
/// the whole game.
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    /// The harness asked for a game this engine does not play.
    #[error("game \"{0}\" is not supported")]
    UnknownGame(String),

    /// A player code other than 1 (R) or 2 (B).
    #[error("{0} is not a player code (expected 1 for R or 2 for B)")]
    InvalidPlayer(u8),

    /// Board sizes below 2 have no playable geometry.
    #[error("board size {0} is too small (minimum 2)")]
    BoardTooSmall(i32),

    /// A reported state mentions a cell outside the board.
    #[error("cell {0} is not on the board")]
    OffBoardCell(Cell),

    /// The reported position matches no legal opponent move.
    #[error("reported position matches no legal opponent move")]
    UnknownOpponentMove,
}

/// Statistics of the last completed search, for reporting.
#[derive(Clone, Copy, Debug)]
pub struct SearchStats {
    /// Wall-clock slice handed to the driver, in seconds
    pub time_allocated: f64,
    /// MCTS iterations completed
    pub iterations: usize,
    /// Mean rollout length in plies, if any rollout ran
    pub mean_rollout_length: Option<f64>,
}

/// A Dodo-playing engine for one side.
pub struct Agent {
    player: Player,
    opponent: Player,
    board: Rc<Board>,
    root: TreeNode,
    /// Exploration constant reserved by the interface; the shipped search
    /// uses `p` everywhere, so this is stored but not read.
    #[allow(dead_code)]
    c: f64,
    p: f64,
    f: f64,
    previous_mean_game_length: f64,
    rng: fastrand::Rng,
    last_stats: Option<SearchStats>,
}

impl Agent {
    /// Build an agent for `player` over `occupancy`, with Red to move: the
    /// game always opens with Red, whichever side the agent plays.
    ///
    /// `total_time` seeds the mean-game-length estimator, `c` and `p` are
    /// the exploration constants and `f` the time-allocation factor.
    pub fn new(
        board: Rc<Board>,
        occupancy: Vec<Option<Player>>,
        player: Player,
        total_time: f64,
        c: f64,
        p: f64,
        f: f64,
    ) -> Agent {
        let state = GameState::new(Rc::clone(&board), occupancy, Player::Red);
        Agent {
            player,
            opponent: player.opponent(),
            board,
            root: TreeNode::new(state, player),
            c,
            p,
            f,
            previous_mean_game_length: total_time,
            rng: fastrand::Rng::new(),
            last_stats: None,
        }
    }

    /// Reseed the rollout RNG; a fixed seed makes searches reproducible.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current tree root; its state mirrors the true board.
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// The position at the current tree root.
    pub fn root_state(&self) -> &GameState {
        &self.root.state
    }

    /// What the last `select_best_move` search did, if one has run.
    pub fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    /// Splice an externally observed position into the tree.
    ///
    /// The opponent's move is the legal action of the current root whose
    /// source is now empty and whose destination now holds the opponent.
    /// When that action is still on the untried frontier a fresh child is
    /// materialized for it; otherwise the existing child is promoted. In
    /// both cases the promoted node becomes the root and the rest of the
    /// old tree is dropped, so no back-reference can keep it alive.
    ///
    /// An occupancy identical to the root's is a no-op (there is no
    /// opponent move to splice when this agent opens the game). Any other
    /// unmatched occupancy is a protocol error.
    pub fn update_state(&mut self, occupancy: &[Option<Player>]) -> Result<(), AgentError> {
        debug_assert_eq!(occupancy.len(), self.board.cell_count());

        let opponent = self.opponent;
        let played = self
            .root
            .state
            .legal_actions()
            .iter()
            .copied()
            .find(|&(src, dst)| {
                let src_idx = self.board.index_of(src).expect("legal source on board");
                let dst_idx = self.board.index_of(dst).expect("legal destination on board");
                occupancy[src_idx].is_none() && occupancy[dst_idx] == Some(opponent)
            });

        let Some(action) = played else {
            if occupancy == self.root.state.occupancy() {
                return Ok(());
            }
            return Err(AgentError::UnknownOpponentMove);
        };

        let new_root = if self.root.untried.contains(&action) {
            let next = self.root.state.play(action);
            TreeNode::with_action(next, self.player, Some(action))
        } else if let Some(idx) = self.root.children.iter().position(|c| c.action == Some(action)) {
            self.root.children.swap_remove(idx)
        } else {
            // A legal action is either untried or already a child.
            unreachable!("legal action neither untried nor expanded")
        };
        self.root = new_root;
        Ok(())
    }

    /// Pick this move's time slice, search, advance the root into the
    /// chosen child and return its edge action. `None` means the game is
    /// over at the root (or the clock has run dry, which the harness
    /// treats the same way).
    pub fn select_best_move(&mut self, time_left: f64) -> Option<Action> {
        let time_allocated = self.f * time_left / self.previous_mean_game_length;
        let outcome = mcts::best_action(&mut self.root, time_allocated, self.p, &mut self.rng)?;

        self.last_stats = Some(SearchStats {
            time_allocated,
            iterations: outcome.iterations,
            mean_rollout_length: outcome.mean_rollout_length,
        });
        if let Some(mean) = outcome.mean_rollout_length {
            self.previous_mean_game_length = mean;
        }

        let chosen = self.root.children.swap_remove(outcome.child);
        self.root = chosen;
        self.root.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening_agent(size: i32, player: Player, seed: u64) -> Agent {
        let board = Rc::new(Board::new(size));
        let occupancy = board.starting_occupancy();
        let mut agent = Agent::new(board, occupancy, player, 100.0, 0.1, 0.1, 0.1);
        agent.seed_rng(seed);
        agent
    }

    /// The root occupancy with `action` applied for `player`.
    fn occupancy_after(agent: &Agent, action: Action, player: Player) -> Vec<Option<Player>> {
        let (src, dst) = action;
        let mut occupancy = agent.root_state().occupancy().to_vec();
        occupancy[agent.board().index_of(src).unwrap()] = None;
        occupancy[agent.board().index_of(dst).unwrap()] = Some(player);
        occupancy
    }

    #[test]
    fn test_root_opens_with_red_to_move() {
        let agent = opening_agent(3, Player::Blue, 0);
        assert_eq!(agent.root_state().to_move(), Player::Red);
        assert_eq!(agent.root().player, Player::Blue);
    }

    #[test]
    fn test_update_state_is_noop_on_identical_board() {
        let mut agent = opening_agent(3, Player::Red, 0);
        let occupancy = agent.root_state().occupancy().to_vec();
        agent.update_state(&occupancy).unwrap();
        assert_eq!(agent.root_state().occupancy(), &occupancy[..]);
        assert_eq!(agent.root().n(), 0);
    }

    #[test]
    fn test_update_state_materializes_untried_child() {
        // A fresh Blue agent: nothing searched, every root action untried.
        let mut agent = opening_agent(3, Player::Blue, 0);
        let red_move = agent.root_state().legal_actions()[2];
        let occupancy = occupancy_after(&agent, red_move, Player::Red);

        agent.update_state(&occupancy).unwrap();
        assert_eq!(agent.root().action, Some(red_move));
        assert_eq!(agent.root().n(), 0, "materialized child starts fresh");
        assert_eq!(agent.root_state().to_move(), Player::Blue);
        assert_eq!(agent.root_state().occupancy(), &occupancy[..]);
    }

    #[test]
    fn test_update_state_promotes_existing_child() {
        let mut agent = opening_agent(3, Player::Blue, 5);
        // Search from the shared root so Red's replies get expanded.
        mcts::search_bounded(&mut agent.root, 1e9, 300, 0.1, &mut fastrand::Rng::with_seed(5))
            .unwrap();

        let child = &agent.root().children[0];
        let red_move = child.action.unwrap();
        let child_visits = child.n();
        assert!(child_visits > 0);

        let occupancy = occupancy_after(&agent, red_move, Player::Red);
        agent.update_state(&occupancy).unwrap();

        assert_eq!(agent.root().action, Some(red_move));
        assert_eq!(agent.root().n(), child_visits, "statistics must carry over");
    }

    #[test]
    fn test_update_state_rejects_unknown_move() {
        let mut agent = opening_agent(3, Player::Blue, 0);
        // Teleport a Red checker backwards: matches no legal action.
        let mut occupancy = agent.root_state().occupancy().to_vec();
        let src = agent.root_state().red_cells()[0];
        occupancy[src] = None;
        let center = agent.board().index_of(Cell::new(0, 0)).unwrap();
        occupancy[center] = Some(Player::Red);

        assert_eq!(
            agent.update_state(&occupancy),
            Err(AgentError::UnknownOpponentMove)
        );
    }

    #[test]
    fn test_select_best_move_advances_root() {
        let mut agent = opening_agent(3, Player::Red, 9);
        let action = agent.select_best_move(100.0).expect("opening has moves");

        // The root now sits one ply deeper, on the returned edge.
        assert_eq!(agent.root().action, Some(action));
        assert_eq!(agent.root().player, Player::Red);
        assert_eq!(agent.root_state().to_move(), Player::Blue);

        let stats = agent.last_stats().unwrap();
        assert!(stats.iterations > 0);
        assert!(stats.mean_rollout_length.is_some());
    }

    #[test]
    fn test_tree_survives_a_full_exchange() {
        let mut agent = opening_agent(3, Player::Red, 13);
        let first = agent.select_best_move(100.0).unwrap();
        assert_eq!(agent.root().action, Some(first));

        // Opponent answers with an already-expanded reply when one exists.
        let reply = if agent.root().children.is_empty() {
            agent.root_state().legal_actions()[0]
        } else {
            agent.root().children[0].action.unwrap()
        };
        let expected_visits = agent
            .root()
            .children
            .iter()
            .find(|c| c.action == Some(reply))
            .map(|c| c.n());

        let occupancy = occupancy_after(&agent, reply, Player::Blue);
        agent.update_state(&occupancy).unwrap();
        if let Some(visits) = expected_visits {
            assert_eq!(agent.root().n(), visits, "subtree was rebuilt instead of reused");
        }

        let second = agent.select_best_move(99.0).unwrap();
        assert_eq!(agent.root().action, Some(second));
    }

    #[test]
    fn test_no_time_left_surfaces_game_over() {
        let mut agent = opening_agent(3, Player::Red, 0);
        assert_eq!(agent.select_best_move(0.0), None);
        assert_eq!(agent.select_best_move(-5.0), None);
    }

    #[test]
    fn test_mean_game_length_feeds_the_next_allocation() {
        let mut agent = opening_agent(3, Player::Red, 21);
        assert_eq!(agent.previous_mean_game_length, 100.0);
        agent.select_best_move(100.0).unwrap();
        let mean = agent.last_stats().unwrap().mean_rollout_length.unwrap();

        // The next slice divides by the observed mean, not the initial seed.
        assert!((agent.previous_mean_game_length - mean).abs() < 1e-9);
    }
}

//! Monte Carlo Tree Search over Dodo positions.
//!
//! This module implements plain UCT search:
//! - UCT selection down the tree, expansion at the first non-full node
//! - Uniform-random playouts for leaf evaluation
//! - Path-based backpropagation of a +/-1 result
//! - A wall-clock-bounded outer loop with an iteration ceiling
//!
//! Nodes own their children; the path of child indices recorded during the
//! descent stands in for parent links, so backpropagation needs no upward
//! references and discarding a subtree is a plain drop. The whole tree is
//! scored from one perspective, the side the owning agent plays, which is
//! also what makes the robust-child pick at the root meaningful.

use std::time::Instant;

use crate::constants::MAX_ITERATIONS;
use crate::state::{Action, GameState, Player};

/// A node in the search tree.
pub struct TreeNode {
    /// The position at this node
    pub state: GameState,
    /// The action on the edge from the parent (`None` for a fresh root)
    pub action: Option<Action>,
    /// The side the whole tree is scored for
    pub player: Player,
    /// Number of visits
    pub visits: u32,
    /// Rollouts won, from `player`'s perspective
    pub wins: u32,
    /// Rollouts lost
    pub losses: u32,
    /// Legal actions not yet expanded into children; popped from the back
    pub untried: Vec<Action>,
    /// One child per expanded action
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Wrap a position as a root node scored for `player`.
    pub fn new(state: GameState, player: Player) -> TreeNode {
        TreeNode::with_action(state, player, None)
    }

    pub(crate) fn with_action(state: GameState, player: Player, action: Option<Action>) -> TreeNode {
        let untried = state.legal_actions().to_vec();
        TreeNode {
            state,
            action,
            player,
            visits: 0,
            wins: 0,
            losses: 0,
            untried,
            children: Vec::new(),
        }
    }

    /// Wins minus losses, from the tree owner's perspective.
    #[inline]
    pub fn q(&self) -> i64 {
        i64::from(self.wins) - i64::from(self.losses)
    }

    /// Visit count.
    #[inline]
    pub fn n(&self) -> u32 {
        self.visits
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Materialize the next untried action as a fresh child and return its
    /// index. Must not be called on a fully expanded node.
    pub fn expand(&mut self) -> usize {
        let action = self.untried.pop().expect("expand on a fully expanded node");
        let next = self.state.play(action);
        self.children.push(TreeNode::with_action(next, self.player, Some(action)));
        self.children.len() - 1
    }

    /// Index of the child maximizing the UCT score
    /// `q/n + c * sqrt(2 ln n_self / n_child)`.
    ///
    /// Every child must have been visited: the selection loop guarantees
    /// that, because each expansion is rolled out and backpropagated before
    /// UCT can route through the same node again. Ties go to the first
    /// maximizer.
    pub fn best_child(&self, c_param: f64) -> usize {
        debug_assert!(!self.children.is_empty(), "best_child on a childless node");
        let ln_n = f64::from(self.visits).ln();
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (idx, child) in self.children.iter().enumerate() {
            debug_assert!(child.visits > 0, "UCT score of an unvisited child");
            let n = f64::from(child.visits);
            let score = child.q() as f64 / n + c_param * (2.0 * ln_n / n).sqrt();
            if score > best_score {
                best_score = score;
                best = idx;
            }
        }
        best
    }

    /// Index of the robust child: highest visit count, ties broken by the
    /// larger `q`, then by stable order.
    pub fn robust_child(&self) -> usize {
        debug_assert!(!self.children.is_empty(), "robust_child on a childless node");
        let mut best = 0;
        for idx in 1..self.children.len() {
            let challenger = &self.children[idx];
            let incumbent = &self.children[best];
            if challenger.visits > incumbent.visits
                || (challenger.visits == incumbent.visits && challenger.q() > incumbent.q())
            {
                best = idx;
            }
        }
        best
    }

    fn record(&mut self, reward: i32) {
        self.visits += 1;
        if reward > 0 {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// What a finished search hands back to the agent.
#[derive(Clone, Copy, Debug)]
pub struct SearchOutcome {
    /// Index of the robust child of the root
    pub child: usize,
    /// Mean rollout length in plies, if any rollout ran
    pub mean_rollout_length: Option<f64>,
    /// Iterations completed before the budget or the ceiling hit
    pub iterations: usize,
}

/// Descend from `root` to the node to evaluate, expanding one child at the
/// first non-fully-expanded node, and return the path of child indices.
fn tree_policy(root: &mut TreeNode, c_param: f64) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = root;
    loop {
        if node.is_terminal() {
            break;
        }
        if !node.is_fully_expanded() {
            path.push(node.expand());
            break;
        }
        let idx = node.best_child(c_param);
        path.push(idx);
        node = &mut node.children[idx];
    }
    path
}

/// The state at the end of a descent path.
fn state_at<'a>(root: &'a TreeNode, path: &[usize]) -> &'a GameState {
    &path.iter().fold(root, |node, &idx| &node.children[idx]).state
}

/// Play uniformly random legal actions until the game ends.
///
/// Returns the reward from `player`'s perspective (+1 win, -1 loss; Dodo
/// has no draws) and the number of plies played. A non-terminal state
/// always has at least one legal action, so the loop cannot get stuck.
fn rollout(state: &GameState, player: Player, rng: &mut fastrand::Rng) -> (i32, u32) {
    let mut current = state.clone();
    let mut plies = 0;
    while !current.is_terminal() {
        let legals = current.legal_actions();
        let action = legals[rng.usize(..legals.len())];
        current = current.play(action);
        plies += 1;
    }
    let reward = if current.winner() == player { 1 } else { -1 };
    (reward, plies)
}

/// Credit `reward` to every node along `path`, root included.
fn backpropagate(root: &mut TreeNode, path: &[usize], reward: i32) {
    let mut node = root;
    node.record(reward);
    for &idx in path {
        node = &mut node.children[idx];
        node.record(reward);
    }
}

/// Run MCTS iterations from `root` until `budget_secs` of wall-clock time
/// elapse or `max_iterations` complete, then pick the robust child.
///
/// Returns `None` when no iteration ran, i.e. the root is terminal or the
/// budget is not positive. The clock is polled only between iterations, so
/// a move may overrun its slice by at most one iteration.
pub fn search_bounded(
    root: &mut TreeNode,
    budget_secs: f64,
    max_iterations: usize,
    c_param: f64,
    rng: &mut fastrand::Rng,
) -> Option<SearchOutcome> {
    if root.is_terminal() {
        return None;
    }

    let start = Instant::now();
    let mut iterations = 0;
    let mut total_plies: u64 = 0;
    while iterations < max_iterations && start.elapsed().as_secs_f64() < budget_secs {
        let path = tree_policy(root, c_param);
        let (reward, plies) = rollout(state_at(root, &path), root.player, rng);
        backpropagate(root, &path, reward);
        total_plies += u64::from(plies);
        iterations += 1;
    }

    if iterations == 0 {
        return None;
    }
    Some(SearchOutcome {
        child: root.robust_child(),
        mean_rollout_length: Some(total_plies as f64 / iterations as f64),
        iterations,
    })
}

/// [`search_bounded`] with the crate-wide iteration ceiling.
pub fn best_action(
    root: &mut TreeNode,
    budget_secs: f64,
    c_param: f64,
    rng: &mut fastrand::Rng,
) -> Option<SearchOutcome> {
    search_bounded(root, budget_secs, MAX_ITERATIONS, c_param, rng)
}

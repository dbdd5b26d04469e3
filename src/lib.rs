//! Dodo-Rust: a Monte Carlo Tree Search engine for the game of Dodo.
//!
//! Dodo is a two-player blockade game on a hexagonal board. Each side may
//! only step its checkers toward the opponent's home wedge, and the first
//! player left without a move *wins*. The engine grows a UCT search tree
//! under a wall-clock budget, evaluates leaves with uniform-random
//! playouts, and keeps the tree across moves by splicing the opponent's
//! reply into it.
//!
//! ## Modules
//!
//! - [`constants`] - Direction sets and engine parameters
//! - [`hex`] - Axial hex coordinates and neighbor lookup
//! - [`board`] - Board topology and per-player forward-neighbor tables
//! - [`state`] - Immutable game state (occupancy, legal moves, terminal test)
//! - [`mcts`] - The search tree and the time-bounded driver
//! - [`agent`] - Per-player engine with tree reuse and time allocation
//! - [`api`] - The four-operation interface used by match harnesses
//!
//! ## Example
//!
//! ```
//! use dodo_rust::api;
//!
//! let start = api::starting_position(4);
//! let mut agent = api::initialize("dodo", &start, 1, 4, 10.0, 0.1, 0.1, 1.0).unwrap();
//! agent.seed_rng(42);
//!
//! // Ask for the first move with ten seconds on the clock.
//! let action = api::strategy(&mut agent, &start, 1, 10.0).unwrap();
//! assert!(action.is_some());
//! ```

pub mod agent;
pub mod api;
pub mod board;
pub mod constants;
pub mod hex;
pub mod mcts;
pub mod state;

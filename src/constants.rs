//! Direction sets and engine parameters.
//!
//! Board size is a runtime value (the harness picks it per game), so the
//! constants here are the pieces that never change: which of the six hex
//! directions each side may move along, and the default knobs of the
//! search and of the time-allocation policy.

// =============================================================================
// Movement Rules
// =============================================================================

/// Direction indices (into [`crate::hex::DIRECTIONS`]) a Red checker may
/// move along. They all point from Red's home wedge toward Blue's.
pub const RED_DIRECTIONS: [usize; 3] = [1, 2, 3];

/// Direction indices a Blue checker may move along, the exact opposites
/// of [`RED_DIRECTIONS`].
pub const BLUE_DIRECTIONS: [usize; 3] = [0, 4, 5];

// =============================================================================
// Search Parameters
// =============================================================================

/// Hard ceiling on MCTS iterations per move, whatever the time budget.
pub const MAX_ITERATIONS: usize = 100_000;

/// Default UCT exploration constant used inside the tree policy.
pub const DEFAULT_P: f64 = 0.1;

/// Default exploration constant reserved by the agent interface.
///
/// The shipped search uses the same value for selection and for the final
/// move choice, so this equals [`DEFAULT_P`].
pub const DEFAULT_C: f64 = 0.1;

// =============================================================================
// Time Management
// =============================================================================

/// Default time-allocation factor: how aggressively a move's slice is cut
/// from the remaining clock.
pub const DEFAULT_TIME_FACTOR: f64 = 1.0;

/// Default total wall-clock budget per side, in seconds.
pub const DEFAULT_TOTAL_TIME: f64 = 120.0;

/// Default board size for the CLI.
pub const DEFAULT_BOARD_SIZE: i32 = 4;

//! Dodo-Rust: a time-budgeted MCTS engine for the hex blockade game Dodo.
//!
//! ## Usage
//!
//! - `dodo-rust` - Search the opening once and print the chosen move
//! - `dodo-rust demo` - Same as above
//! - `dodo-rust selfplay` - Play a full engine-vs-engine game under clocks

use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use dodo_rust::agent::Agent;
use dodo_rust::api::{self, State};
use dodo_rust::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_C, DEFAULT_P, DEFAULT_TIME_FACTOR, DEFAULT_TOTAL_TIME,
};
use dodo_rust::state::{Player, str_action};

/// Dodo-Rust: a Monte Carlo Tree Search engine for Dodo
#[derive(Parser)]
#[command(name = "dodo-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one engine-vs-engine game under the full time control
    Selfplay {
        /// Board size (side length of the hexagon)
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: i32,
        /// Total wall-clock budget per side, in seconds
        #[arg(long, default_value_t = DEFAULT_TOTAL_TIME)]
        time: f64,
        /// UCT constant reserved by the agent interface
        #[arg(long, default_value_t = DEFAULT_C)]
        c: f64,
        /// UCT constant used by the tree policy
        #[arg(long, default_value_t = DEFAULT_P)]
        p: f64,
        /// Time-allocation factor
        #[arg(long, default_value_t = DEFAULT_TIME_FACTOR)]
        f: f64,
        /// RNG seed for reproducible rollouts
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Search the opening position once and print the chosen move
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Selfplay { size, time, c, p, f, seed }) => selfplay(size, time, c, p, f, seed),
        Some(Commands::Demo) | None => demo(),
    }
}

fn demo() -> Result<()> {
    println!("dodo-rust: MCTS engine for Dodo\n");

    let size = DEFAULT_BOARD_SIZE;
    let state = api::starting_position(size);
    let mut agent = api::initialize(
        "dodo",
        &state,
        1,
        size,
        DEFAULT_TOTAL_TIME,
        DEFAULT_C,
        DEFAULT_P,
        DEFAULT_TIME_FACTOR,
    )?;
    println!("{}", agent.root_state());

    match api::strategy(&mut agent, &state, 1, DEFAULT_TOTAL_TIME)? {
        Some(action) => {
            println!("chosen move: {}", str_action(action));
            if let Some(stats) = agent.last_stats() {
                println!(
                    "{} iterations in a {:.2}s slice, mean rollout {:.1} plies",
                    stats.iterations,
                    stats.time_allocated,
                    stats.mean_rollout_length.unwrap_or(f64::NAN),
                );
            }
        }
        None => println!("no move available"),
    }
    Ok(())
}

fn selfplay(size: i32, time: f64, c: f64, p: f64, f: f64, seed: Option<u64>) -> Result<()> {
    anyhow::ensure!(size >= 3, "self-play needs a board of size 3 or more");

    let mut state: State = api::starting_position(size);
    let mut red = api::initialize("dodo", &state, 1, size, time, c, p, f)?;
    let mut blue = api::initialize("dodo", &state, 2, size, time, c, p, f)?;
    if let Some(seed) = seed {
        red.seed_rng(seed);
        blue.seed_rng(seed.wrapping_add(1));
    }

    let mut red_clock = time;
    let mut blue_clock = time;
    let mut plies = 0u32;

    let winner = loop {
        if let Some(winner) = half_move(&mut red, &mut state, &mut red_clock, &mut plies)? {
            break winner;
        }
        if let Some(winner) = half_move(&mut blue, &mut state, &mut blue_clock, &mut plies)? {
            break winner;
        }
    };

    api::final_result(&state, 1, winner.code());
    println!("{winner} wins after {plies} plies");
    println!("clocks left: R {red_clock:.2}s, B {blue_clock:.2}s");
    Ok(())
}

/// One turn for `agent`: ask for a move, stamp the clock, push the move
/// into the shared state. Returns the winner once the game is over; under
/// Dodo's misère rule a blocked agent has won.
fn half_move(
    agent: &mut Agent,
    state: &mut State,
    clock: &mut f64,
    plies: &mut u32,
) -> Result<Option<Player>> {
    let start = Instant::now();
    let action = api::strategy(agent, state, agent.player().code(), *clock)?;
    *clock -= start.elapsed().as_secs_f64();

    let Some(action) = action else {
        eprintln!("{}", agent.root_state());
        return Ok(Some(agent.player()));
    };

    if let Some(stats) = agent.last_stats() {
        eprintln!(
            "{}: {:<22} | {:>7.2}s left, {:.2}s slice, {:>6} iterations, mean length {:.1}",
            agent.player(),
            str_action(action),
            *clock,
            stats.time_allocated,
            stats.iterations,
            stats.mean_rollout_length.unwrap_or(f64::NAN),
        );
    }
    api::new_state(state, action, agent.player().code());
    *plies += 1;
    Ok(None)
}

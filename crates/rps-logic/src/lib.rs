//! Game logic for Beefy RPS
//!
//! Repeated Rock-Paper-Scissors with escalating stakes, played between
//! learning agents: fictitious play against tabular Q-learning.
//! This crate is compiled to:
//! - Native (for the command-line runner)
//! - WASM (for browser replay of simulations)

mod agent;
mod environment;
mod error;
mod fictitious;
mod numeric;
mod payoff;
mod qlearning;
mod random;
mod simulation;

#[cfg(feature = "wasm")]
mod wasm;

pub use agent::{Agent, AgentConfig, AgentSummary, Observation, Outcome, Seat};
pub use environment::{
    Environment, Escalation, Frozen, StepOutcome, Transition, TransitionConfig, MAX_STATE_LIMIT,
};
pub use error::{Result, RpsError};
pub use fictitious::{FictitiousPlayAgent, FictitiousPlayConfig};
pub use numeric::{expected_payoffs, normalize, round_to, TieBreak};
pub use payoff::{Move, PayoffMatrix};
pub use qlearning::{QLearningAgent, QLearningConfig};
pub use random::SeededRng;
pub use simulation::{
    run_simulation, run_simulation_with, RoundRecord, Simulation, SimulationConfig,
    SimulationReport,
};

/// Rock-Paper-Scissors payoff at base stakes
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move) -> (i32, i32) {
    let score = PayoffMatrix::rock_paper_scissors().rows()[a.index()][b.index()];
    (score, -score)
}

//! Common agent contract
//!
//! Both learning rules sit behind [`Agent`] so either can take either seat
//! without the simulation loop knowing which one it drives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fictitious::{FictitiousPlayAgent, FictitiousPlayConfig};
use crate::payoff::PayoffMatrix;
use crate::qlearning::{QLearningAgent, QLearningConfig};
use crate::random::SeededRng;

/// Which side of the payoff matrix an agent plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    /// Row player, scored by the environment's matrix
    A,
    /// Column player, scored by the negated transpose
    B,
}

/// Everything an agent may look at before committing to a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub round: u32,
    /// Stakes level before the round is played
    pub state: u32,
    /// Opponent's move in the previous round, `None` on round 0
    pub opponent_last_action: Option<usize>,
}

/// What an agent learns once the round is scored
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    pub state: u32,
    pub action: usize,
    pub opponent_action: usize,
    pub reward: i32,
    pub next_state: u32,
}

/// Final internal state of an agent, for reporting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AgentSummary {
    FictitiousPlay { counts: Vec<u64>, sigma: Vec<f64> },
    QLearning { q_table: BTreeMap<u32, Vec<f64>> },
}

pub trait Agent: Send {
    fn name(&self) -> &'static str;

    /// Commit to a move using only pre-round information
    fn select_action(&mut self, observation: &Observation) -> Result<usize>;

    /// Learn from the scored round
    fn observe_outcome(&mut self, outcome: &Outcome) -> Result<()>;

    fn summary(&self) -> AgentSummary;
}

/// Serializable choice of learning rule for a seat
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AgentConfig {
    FictitiousPlay(FictitiousPlayConfig),
    QLearning(QLearningConfig),
}

impl AgentConfig {
    pub fn fictitious_play() -> Self {
        AgentConfig::FictitiousPlay(FictitiousPlayConfig::default())
    }

    pub fn q_learning() -> Self {
        AgentConfig::QLearning(QLearningConfig::default())
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            AgentConfig::FictitiousPlay(c) => c.validate(),
            AgentConfig::QLearning(c) => c.validate(),
        }
    }

    /// Build the agent for `seat`. Q-learners register every state in
    /// `0..=max_state`.
    pub fn build(
        &self,
        seat: Seat,
        matrix: &PayoffMatrix,
        max_state: u32,
        rng: SeededRng,
    ) -> Result<Box<dyn Agent>> {
        let agent: Box<dyn Agent> = match *self {
            AgentConfig::FictitiousPlay(config) => {
                let own = match seat {
                    Seat::A => matrix.clone(),
                    Seat::B => matrix.column_perspective(),
                };
                Box::new(FictitiousPlayAgent::with_config(own, config, rng)?)
            }
            AgentConfig::QLearning(config) => {
                let states: Vec<u32> = (0..=max_state).collect();
                Box::new(QLearningAgent::with_config(&states, matrix.size(), config, rng)?)
            }
        };
        Ok(agent)
    }
}

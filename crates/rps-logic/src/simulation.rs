//! Simulation engine

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentConfig, AgentSummary, Observation, Outcome, Seat};
use crate::environment::{Environment, TransitionConfig};
use crate::error::{Result, RpsError};
use crate::payoff::PayoffMatrix;
use crate::random::SeededRng;

const ENVIRONMENT_STREAM: u32 = 0;
const SEAT_A_STREAM: u32 = 1;
const SEAT_B_STREAM: u32 = 2;

/// Everything needed to reproduce a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rounds: u32,
    pub seed: u64,
    /// Separates independent runs sharing one seed
    pub run_index: u32,
    pub payoff: PayoffMatrix,
    pub transition: TransitionConfig,
    pub player_a: AgentConfig,
    pub player_b: AgentConfig,
    /// Keep a [`RoundRecord`] for every round in the report
    pub record_rounds: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 1000,
            seed: 42,
            run_index: 0,
            payoff: PayoffMatrix::rock_paper_scissors(),
            transition: TransitionConfig::Frozen,
            player_a: AgentConfig::fictitious_play(),
            player_b: AgentConfig::q_learning(),
            record_rounds: false,
        }
    }
}

impl SimulationConfig {
    pub fn new(rounds: u32) -> Self {
        Self { rounds, ..Default::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(RpsError::BadConfiguration("rounds must be positive".into()));
        }
        self.transition.validate()?;
        self.player_a.validate()?;
        self.player_b.validate()?;
        Ok(())
    }
}

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    /// Stakes the round was played at
    pub state: u32,
    pub next_state: u32,
    pub action_a: usize,
    pub action_b: usize,
    pub reward_a: i32,
    pub reward_b: i32,
    pub cumulative_a: i64,
    pub cumulative_b: i64,
}

/// Result of a complete run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub rounds_played: u32,
    pub total_reward_a: i64,
    pub total_reward_b: i64,
    pub final_state: u32,
    pub player_a: AgentSummary,
    pub player_b: AgentSummary,
    /// Empty unless `record_rounds` was set
    pub rounds: Vec<RoundRecord>,
}

/// One environment, two agents, stepped a round at a time
pub struct Simulation {
    environment: Environment,
    player_a: Box<dyn Agent>,
    player_b: Box<dyn Agent>,
    round: u32,
    last_a: Option<usize>,
    last_b: Option<usize>,
    total_a: i64,
    total_b: i64,
}

impl Simulation {
    /// Validate the config and build every component from its own RNG stream
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let root = SeededRng::from_u64(config.seed, config.run_index);
        let max_state = config.transition.max_state();

        let environment = Environment::with_transition(
            config.payoff.clone(),
            config.transition.build(),
            root.fork(ENVIRONMENT_STREAM),
        );
        let player_a = config
            .player_a
            .build(Seat::A, &config.payoff, max_state, root.fork(SEAT_A_STREAM))?;
        let player_b = config
            .player_b
            .build(Seat::B, &config.payoff, max_state, root.fork(SEAT_B_STREAM))?;

        Ok(Self::from_parts(environment, player_a, player_b))
    }

    /// Assemble from pre-built components, e.g. hand-tuned agents
    pub fn from_parts(
        mut environment: Environment,
        player_a: Box<dyn Agent>,
        player_b: Box<dyn Agent>,
    ) -> Self {
        environment.reset();
        Self {
            environment,
            player_a,
            player_b,
            round: 0,
            last_a: None,
            last_b: None,
            total_a: 0,
            total_b: 0,
        }
    }

    /// Play one round: both choose, the environment scores, both learn
    pub fn step(&mut self) -> Result<RoundRecord> {
        let state = self.environment.state();

        let action_a = self.player_a.select_action(&Observation {
            round: self.round,
            state,
            opponent_last_action: self.last_b,
        })?;
        let action_b = self.player_b.select_action(&Observation {
            round: self.round,
            state,
            opponent_last_action: self.last_a,
        })?;

        let outcome = self.environment.step(action_a, action_b)?;

        self.player_a.observe_outcome(&Outcome {
            state,
            action: action_a,
            opponent_action: action_b,
            reward: outcome.reward1,
            next_state: outcome.state,
        })?;
        self.player_b.observe_outcome(&Outcome {
            state,
            action: action_b,
            opponent_action: action_a,
            reward: outcome.reward2,
            next_state: outcome.state,
        })?;

        self.total_a += outcome.reward1 as i64;
        self.total_b += outcome.reward2 as i64;
        self.last_a = Some(action_a);
        self.last_b = Some(action_b);

        let record = RoundRecord {
            round: self.round,
            state,
            next_state: outcome.state,
            action_a,
            action_b,
            reward_a: outcome.reward1,
            reward_b: outcome.reward2,
            cumulative_a: self.total_a,
            cumulative_b: self.total_b,
        };
        debug!(
            "round {}: {} vs {} at stakes {} -> ({}, {})",
            record.round, action_a, action_b, state, record.reward_a, record.reward_b
        );
        self.round += 1;
        Ok(record)
    }

    pub fn rounds_played(&self) -> u32 {
        self.round
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn report(&self, rounds: Vec<RoundRecord>) -> SimulationReport {
        SimulationReport {
            rounds_played: self.round,
            total_reward_a: self.total_a,
            total_reward_b: self.total_b,
            final_state: self.environment.state(),
            player_a: self.player_a.summary(),
            player_b: self.player_b.summary(),
            rounds,
        }
    }
}

/// Run a complete simulation
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport> {
    run_simulation_with(config, |_| {})
}

/// Run a complete simulation, handing every round to `on_round` as it
/// finishes
pub fn run_simulation_with<F>(
    config: &SimulationConfig,
    mut on_round: F,
) -> Result<SimulationReport>
where
    F: FnMut(&RoundRecord),
{
    let mut simulation = Simulation::new(config)?;
    info!(
        "run {} (seed {}): {} rounds, {} vs {}",
        config.run_index,
        config.seed,
        config.rounds,
        simulation.player_a.name(),
        simulation.player_b.name()
    );

    let capacity = if config.record_rounds { config.rounds as usize } else { 0 };
    let mut rounds = Vec::with_capacity(capacity);
    for _ in 0..config.rounds {
        let record = simulation.step()?;
        on_round(&record);
        if config.record_rounds {
            rounds.push(record);
        }
    }

    let report = simulation.report(rounds);
    info!(
        "run {} finished: totals ({}, {}), final stakes {}",
        config.run_index, report.total_reward_a, report.total_reward_b, report.final_state
    );
    Ok(report)
}

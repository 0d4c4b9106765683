//! Command-line arguments and their translation into a simulation config
//!
//! ```shell
//! # fictitious play (row) against Q-learning (column) for 1000 rounds
//! $ cargo run -p beefy-rps -- --rounds 1000
//!
//! # fictitious play against itself with the escalating stakes switched on
//! $ cargo run -p beefy-rps -- -r 500 --player-b fictitious --escalation
//!
//! # 32 independent seeds in parallel, JSON out
//! $ cargo run -p beefy-rps -- -r 2000 --runs 32 --json
//! ```

use clap::{Parser, ValueEnum};
use rps_logic::{
    AgentConfig, FictitiousPlayConfig, QLearningConfig, SimulationConfig, TransitionConfig,
};

/// Learning rule for one seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    Fictitious,
    QLearning,
}

/// Beefy RPS: fictitious play vs Q-learning on high-stakes Rock-Paper-Scissors.
#[derive(Parser, Debug)]
#[command(name = "beefy-rps", version, about, long_about = None)]
pub struct Args {
    /// Number of rounds to play.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub rounds: u32,

    /// Randomness seed.
    #[arg(short, long, default_value = "42")]
    pub seed: u64,

    /// Independent runs to play in parallel, with run indices 0..runs.
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub runs: u32,

    /// Row player.
    #[arg(long, value_enum, default_value = "fictitious")]
    pub player_a: AgentKind,

    /// Column player.
    #[arg(long, value_enum, default_value = "q-learning")]
    pub player_b: AgentKind,

    /// Q-learning exploration rate.
    #[arg(long, default_value = "0.1")]
    pub epsilon: f64,

    /// Q-learning learning rate.
    #[arg(long, default_value = "0.1")]
    pub alpha: f64,

    /// Q-learning discount factor.
    #[arg(long, default_value = "0.9")]
    pub gamma: f64,

    /// Fictitious-play prior count per opponent move (0 disables smoothing).
    #[arg(long, default_value = "1")]
    pub initial_count: u64,

    /// Round fictitious-play beliefs to this many decimals.
    #[arg(long)]
    pub sigma_decimals: Option<u32>,

    /// Let ties escalate the stakes.
    #[arg(long)]
    pub escalation: bool,

    /// Chance that a tie raises the stakes (with --escalation).
    #[arg(long, default_value = "0.3")]
    pub escalation_probability: f64,

    /// Highest stakes level (with --escalation), at most 1024.
    #[arg(long, default_value = "3")]
    pub max_state: u32,

    /// Print reports as JSON.
    #[arg(long)]
    pub json: bool,

    /// No per-round progress lines.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    fn agent(&self, kind: AgentKind) -> AgentConfig {
        match kind {
            AgentKind::Fictitious => AgentConfig::FictitiousPlay(FictitiousPlayConfig {
                initial_count: self.initial_count,
                sigma_decimals: self.sigma_decimals,
                ..Default::default()
            }),
            AgentKind::QLearning => AgentConfig::QLearning(QLearningConfig {
                epsilon: self.epsilon,
                alpha: self.alpha,
                gamma: self.gamma,
            }),
        }
    }

    /// Config for run `run_index` of this invocation
    pub fn config(&self, run_index: u32) -> SimulationConfig {
        let transition = if self.escalation {
            TransitionConfig::Escalation {
                probability: self.escalation_probability,
                max_state: self.max_state,
            }
        } else {
            TransitionConfig::Frozen
        };
        SimulationConfig {
            rounds: self.rounds,
            seed: self.seed,
            run_index,
            transition,
            player_a: self.agent(self.player_a),
            player_b: self.agent(self.player_b),
            ..Default::default()
        }
    }
}

//! Fictitious play: best-respond to the empirical mix of opponent moves

use log::trace;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentSummary, Observation, Outcome};
use crate::error::{check_action, Result, RpsError};
use crate::numeric::{expected_payoffs, normalize, round_to, TieBreak};
use crate::payoff::PayoffMatrix;
use crate::random::SeededRng;

/// Tuning for [`FictitiousPlayAgent`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FictitiousPlayConfig {
    /// Starting count for every opponent move. 1 is Laplace smoothing,
    /// 0 leaves the belief empty until the first observation.
    pub initial_count: u64,
    /// Round sigma to this many decimals after each update
    pub sigma_decimals: Option<u32>,
    pub tie_break: TieBreak,
}

impl Default for FictitiousPlayConfig {
    fn default() -> Self {
        Self {
            initial_count: 1,
            sigma_decimals: None,
            tie_break: TieBreak::SeededScan,
        }
    }
}

impl FictitiousPlayConfig {
    pub fn validate(&self) -> Result<()> {
        match self.sigma_decimals {
            Some(d) if d > 15 => Err(RpsError::BadConfiguration(format!(
                "sigma_decimals {} exceeds f64 precision",
                d
            ))),
            _ => Ok(()),
        }
    }
}

/// Model-based agent holding a frequency count of opponent moves
#[derive(Clone, Debug)]
pub struct FictitiousPlayAgent {
    payoff_matrix: PayoffMatrix,
    counts: Vec<u64>,
    sigma: Vec<f64>,
    expected: Vec<f64>,
    config: FictitiousPlayConfig,
    rng: SeededRng,
}

impl FictitiousPlayAgent {
    /// Smoothed agent scored by `payoff_matrix` (its own perspective)
    pub fn new(payoff_matrix: PayoffMatrix, rng: SeededRng) -> Self {
        let n = payoff_matrix.size();
        let config = FictitiousPlayConfig::default();
        Self {
            payoff_matrix,
            counts: vec![config.initial_count; n],
            sigma: vec![0.0; n],
            expected: vec![0.0; n],
            config,
            rng,
        }
    }

    pub fn with_config(
        payoff_matrix: PayoffMatrix,
        config: FictitiousPlayConfig,
        rng: SeededRng,
    ) -> Result<Self> {
        config.validate()?;
        let n = payoff_matrix.size();
        Ok(Self {
            payoff_matrix,
            counts: vec![config.initial_count; n],
            sigma: vec![0.0; n],
            expected: vec![0.0; n],
            config,
            rng,
        })
    }

    /// Pick a move given the opponent's previous one.
    ///
    /// With no history the move is uniform. Otherwise the observation is
    /// counted, the belief recomputed and the best response returned.
    pub fn action(&mut self, opponent_last_action: Option<usize>) -> Result<usize> {
        let n = self.payoff_matrix.size();
        let Some(observed) = opponent_last_action else {
            return Ok(self.rng.next_range(n));
        };
        check_action(observed, n)?;

        self.counts[observed] += 1;
        self.update_sigma();
        self.expected = expected_payoffs(&self.payoff_matrix, &self.sigma);
        let best = self.config.tie_break.pick(&self.expected, &mut self.rng);

        trace!(
            "fictitious play saw {}: counts {:?} sigma {:?} expected {:?} -> {}",
            observed,
            self.counts,
            self.sigma,
            self.expected,
            best
        );
        Ok(best)
    }

    fn update_sigma(&mut self) {
        self.sigma = normalize(&self.counts);
        if let Some(decimals) = self.config.sigma_decimals {
            for p in self.sigma.iter_mut() {
                *p = round_to(*p, decimals);
            }
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Belief from the most recent update
    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    /// Expected payoff of each own move under the latest belief
    pub fn expected_payoffs(&self) -> &[f64] {
        &self.expected
    }

    pub fn payoff_matrix(&self) -> &PayoffMatrix {
        &self.payoff_matrix
    }
}

impl Agent for FictitiousPlayAgent {
    fn name(&self) -> &'static str {
        "fictitious-play"
    }

    fn select_action(&mut self, observation: &Observation) -> Result<usize> {
        self.action(observation.opponent_last_action)
    }

    // The belief moves in select_action, from the opponent's last move.
    fn observe_outcome(&mut self, _outcome: &Outcome) -> Result<()> {
        Ok(())
    }

    fn summary(&self) -> AgentSummary {
        AgentSummary::FictitiousPlay {
            counts: self.counts.clone(),
            sigma: self.sigma.clone(),
        }
    }
}

//! Tabular Q-learning with an epsilon-greedy policy

use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentSummary, Observation, Outcome};
use crate::error::{check_action, Result, RpsError};
use crate::numeric::TieBreak;
use crate::random::SeededRng;

/// Learning parameters for [`QLearningAgent`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Exploration rate
    pub epsilon: f64,
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self { epsilon: 0.1, alpha: 0.1, gamma: 0.9 }
    }
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<()> {
        let params = [("epsilon", self.epsilon), ("alpha", self.alpha), ("gamma", self.gamma)];
        for (name, value) in params {
            if !(0.0..=1.0).contains(&value) {
                return Err(RpsError::BadConfiguration(format!(
                    "{} {} outside [0, 1]",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Model-free agent learning one row of action values per state
#[derive(Clone, Debug)]
pub struct QLearningAgent {
    q_table: BTreeMap<u32, Vec<f64>>,
    actions: usize,
    config: QLearningConfig,
    rng: SeededRng,
}

impl QLearningAgent {
    /// Agent with default parameters over the given states
    pub fn new(states: &[u32], actions: usize, rng: SeededRng) -> Result<Self> {
        Self::with_config(states, actions, QLearningConfig::default(), rng)
    }

    pub fn with_config(
        states: &[u32],
        actions: usize,
        config: QLearningConfig,
        rng: SeededRng,
    ) -> Result<Self> {
        config.validate()?;
        if actions == 0 {
            return Err(RpsError::BadConfiguration("action set is empty".into()));
        }
        if states.is_empty() {
            return Err(RpsError::BadConfiguration("state set is empty".into()));
        }
        let q_table = states.iter().map(|&s| (s, vec![0.0; actions])).collect();
        Ok(Self { q_table, actions, config, rng })
    }

    /// Epsilon-greedy move for `state`
    pub fn action(&mut self, state: u32) -> Result<usize> {
        let values = self
            .q_table
            .get(&state)
            .ok_or(RpsError::UnknownState(state))?;

        if self.rng.chance(self.config.epsilon) {
            return Ok(self.rng.next_range(self.actions));
        }
        Ok(TieBreak::UniformAmongMax.pick(values, &mut self.rng))
    }

    /// One-step Bellman update of `Q[state][action]`
    pub fn update_q_value(
        &mut self,
        state: u32,
        action: usize,
        reward: f64,
        next_state: u32,
    ) -> Result<()> {
        check_action(action, self.actions)?;
        let max_next = self
            .q_table
            .get(&next_state)
            .ok_or(RpsError::UnknownState(next_state))?
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let row = self
            .q_table
            .get_mut(&state)
            .ok_or(RpsError::UnknownState(state))?;

        let td_target = reward + self.config.gamma * max_next;
        row[action] += self.config.alpha * (td_target - row[action]);

        trace!(
            "q-learning Q[{}][{}] = {:.4} (reward {}, target {:.4})",
            state,
            action,
            row[action],
            reward,
            td_target
        );
        Ok(())
    }

    pub fn q_table(&self) -> &BTreeMap<u32, Vec<f64>> {
        &self.q_table
    }

    pub fn q_values(&self, state: u32) -> Result<&[f64]> {
        self.q_table
            .get(&state)
            .map(Vec::as_slice)
            .ok_or(RpsError::UnknownState(state))
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }
}

impl Agent for QLearningAgent {
    fn name(&self) -> &'static str {
        "q-learning"
    }

    fn select_action(&mut self, observation: &Observation) -> Result<usize> {
        self.action(observation.state)
    }

    fn observe_outcome(&mut self, outcome: &Outcome) -> Result<()> {
        self.update_q_value(
            outcome.state,
            outcome.action,
            outcome.reward as f64,
            outcome.next_state,
        )
    }

    fn summary(&self) -> AgentSummary {
        AgentSummary::QLearning { q_table: self.q_table.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greedy(states: &[u32]) -> QLearningAgent {
        let config = QLearningConfig { epsilon: 0.0, ..Default::default() };
        QLearningAgent::with_config(states, 3, config, SeededRng::from_u64(42, 0)).unwrap()
    }

    #[test]
    fn test_table_starts_at_zero() {
        let agent = QLearningAgent::new(&[0, 1, 2], 3, SeededRng::from_u64(1, 0)).unwrap();
        assert_eq!(agent.q_table().len(), 3);
        assert!(agent.q_table().values().all(|row| row == &vec![0.0; 3]));
        assert_eq!(*agent.config(), QLearningConfig { epsilon: 0.1, alpha: 0.1, gamma: 0.9 });
    }

    #[test]
    fn test_single_update() {
        let mut agent = greedy(&[0]);
        agent.update_q_value(0, 1, 5.0, 0).unwrap();
        assert_eq!(agent.q_values(0).unwrap(), &[0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_greedy_follows_max() {
        let mut agent = greedy(&[0]);
        agent.update_q_value(0, 2, 1.0, 0).unwrap();
        for _ in 0..50 {
            assert_eq!(agent.action(0).unwrap(), 2);
        }
    }

    #[test]
    fn test_greedy_ties_are_uniform() {
        let mut agent = greedy(&[0]);
        let mut seen = [0u32; 3];
        for _ in 0..300 {
            seen[agent.action(0).unwrap()] += 1;
        }
        assert!(seen.iter().all(|&c| c > 60), "skewed tie-break {:?}", seen);
    }

    #[test]
    fn test_full_exploration_ignores_values() {
        let config = QLearningConfig { epsilon: 1.0, ..Default::default() };
        let mut agent =
            QLearningAgent::with_config(&[0], 3, config, SeededRng::from_u64(3, 0)).unwrap();
        agent.update_q_value(0, 0, 100.0, 0).unwrap();
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[agent.action(0).unwrap()] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_converges_to_fixed_point() {
        let mut agent = greedy(&[0]);
        // stationary reward: only Paper pays
        let reward = [0.0, 1.0, -1.0];
        for _ in 0..3000 {
            let a = agent.action(0).unwrap();
            agent.update_q_value(0, a, reward[a], 0).unwrap();
        }
        let q = agent.q_values(0).unwrap();
        let fixed_point = 1.0 / (1.0 - 0.9);
        assert!((q[1] - fixed_point).abs() < 1e-3, "Q[0][1] = {}", q[1]);
    }

    #[test]
    fn test_bootstraps_from_next_state() {
        let mut agent = greedy(&[0, 1]);
        agent.update_q_value(1, 0, 10.0, 1).unwrap();
        agent.update_q_value(0, 2, 0.0, 1).unwrap();
        // 0.1 * (0 + 0.9 * 1.0)
        assert!((agent.q_values(0).unwrap()[2] - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_state() {
        let mut agent = greedy(&[0]);
        assert_eq!(agent.action(4), Err(RpsError::UnknownState(4)));
        assert_eq!(agent.update_q_value(0, 1, 1.0, 9), Err(RpsError::UnknownState(9)));
        assert_eq!(agent.update_q_value(9, 1, 1.0, 0), Err(RpsError::UnknownState(9)));
        assert_eq!(agent.q_values(0).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_action() {
        let mut agent = greedy(&[0]);
        assert_eq!(
            agent.update_q_value(0, 3, 1.0, 0),
            Err(RpsError::InvalidAction { action: 3, actions: 3 })
        );
    }

    #[test]
    fn test_bad_config() {
        let rng = SeededRng::from_u64(1, 0);
        let bad = QLearningConfig { gamma: 1.5, ..Default::default() };
        assert!(matches!(
            QLearningAgent::with_config(&[0], 3, bad, rng.clone()),
            Err(RpsError::BadConfiguration(_))
        ));
        assert!(QLearningAgent::new(&[], 3, rng.clone()).is_err());
        assert!(QLearningAgent::new(&[0], 0, rng).is_err());
    }

    #[test]
    fn test_agent_contract_learns_from_outcome() {
        let mut agent = greedy(&[0]);
        let obs = Observation { round: 0, state: 0, opponent_last_action: None };
        let action = agent.select_action(&obs).unwrap();
        agent
            .observe_outcome(&Outcome {
                state: 0,
                action,
                opponent_action: 0,
                reward: 5,
                next_state: 0,
            })
            .unwrap();
        assert_eq!(agent.q_values(0).unwrap()[action], 0.5);
    }
}

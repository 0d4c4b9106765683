//! Stateful game environment
//!
//! Scores simultaneous moves against the row player's payoff matrix and
//! scales rewards by the current stakes level. How the stakes move is
//! decided by a pluggable [`Transition`]; the default keeps them frozen.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{check_action, Result, RpsError};
use crate::payoff::PayoffMatrix;
use crate::random::SeededRng;

/// Stakes transition rule: `(state, action1, action2) -> next_state`
pub trait Transition: Send {
    fn next_state(&self, state: u32, action1: usize, action2: usize, rng: &mut SeededRng) -> u32;

    /// Highest state this rule can ever produce
    fn max_state(&self) -> u32;
}

/// Stakes never move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frozen;

impl Transition for Frozen {
    fn next_state(
        &self,
        state: u32,
        _action1: usize,
        _action2: usize,
        _rng: &mut SeededRng,
    ) -> u32 {
        state
    }

    fn max_state(&self) -> u32 {
        0
    }
}

/// Ties may raise the stakes by one level, any mismatch drops them back to 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Escalation {
    /// Chance that a tie raises the stakes
    pub probability: f64,
    pub max_state: u32,
}

impl Default for Escalation {
    fn default() -> Self {
        Self { probability: 0.3, max_state: 3 }
    }
}

impl Transition for Escalation {
    fn next_state(&self, state: u32, action1: usize, action2: usize, rng: &mut SeededRng) -> u32 {
        if action1 != action2 {
            return 0;
        }
        if rng.chance(self.probability) && state < self.max_state {
            state + 1
        } else {
            state
        }
    }

    fn max_state(&self) -> u32 {
        self.max_state
    }
}

/// Highest `max_state` a [`TransitionConfig`] accepts. Q-learners keep one
/// row per state, so the table stays small.
pub const MAX_STATE_LIMIT: u32 = 1024;

/// Serializable choice of transition rule
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TransitionConfig {
    #[default]
    Frozen,
    Escalation { probability: f64, max_state: u32 },
}

impl TransitionConfig {
    /// Escalation with the classic 30% / 3 levels
    pub fn escalation() -> Self {
        let e = Escalation::default();
        TransitionConfig::Escalation { probability: e.probability, max_state: e.max_state }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            TransitionConfig::Frozen => Ok(()),
            TransitionConfig::Escalation { probability, max_state } => {
                if !(0.0..=1.0).contains(&probability) {
                    return Err(RpsError::BadConfiguration(format!(
                        "escalation probability {} outside [0, 1]",
                        probability
                    )));
                }
                if max_state > MAX_STATE_LIMIT {
                    return Err(RpsError::BadConfiguration(format!(
                        "max_state {} above the limit of {}",
                        max_state, MAX_STATE_LIMIT
                    )));
                }
                Ok(())
            }
        }
    }

    pub fn max_state(&self) -> u32 {
        match *self {
            TransitionConfig::Frozen => 0,
            TransitionConfig::Escalation { max_state, .. } => max_state,
        }
    }

    pub fn build(&self) -> Box<dyn Transition> {
        match *self {
            TransitionConfig::Frozen => Box::new(Frozen),
            TransitionConfig::Escalation { probability, max_state } => {
                Box::new(Escalation { probability, max_state })
            }
        }
    }
}

/// `payoff * (state + 1)` for the row player and its negation, or `None`
/// when either does not fit in an `i32`.
fn scale(payoff: i32, state: u32) -> Option<(i32, i32)> {
    let stakes = i32::try_from(state).ok()?.checked_add(1)?;
    let reward1 = payoff.checked_mul(stakes)?;
    Some((reward1, reward1.checked_neg()?))
}

/// What one call to [`Environment::step`] produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// State after the transition
    pub state: u32,
    pub reward1: i32,
    pub reward2: i32,
}

pub struct Environment {
    matrix: PayoffMatrix,
    state: u32,
    transition: Box<dyn Transition>,
    rng: SeededRng,
}

impl Environment {
    /// Environment with frozen stakes. Needs no randomness.
    pub fn new(matrix: PayoffMatrix) -> Self {
        Self::with_transition(matrix, Box::new(Frozen), SeededRng::from_u64(0, 0))
    }

    pub fn with_transition(
        matrix: PayoffMatrix,
        transition: Box<dyn Transition>,
        rng: SeededRng,
    ) -> Self {
        Self { matrix, state: 0, transition, rng }
    }

    /// Score one round and advance the stakes
    pub fn step(&mut self, action1: usize, action2: usize) -> Result<StepOutcome> {
        let n = self.matrix.size();
        check_action(action1, n)?;
        check_action(action2, n)?;

        let payoff = self.matrix.get(action1, action2)?;
        let (reward1, reward2) = scale(payoff, self.state)
            .ok_or(RpsError::RewardOverflow { payoff, state: self.state })?;

        let next = self.transition.next_state(self.state, action1, action2, &mut self.rng);
        if next != self.state {
            debug!("stakes {} -> {} after ({}, {})", self.state, next, action1, action2);
        }
        self.state = next;

        Ok(StepOutcome { state: self.state, reward1, reward2 })
    }

    /// Back to the base stakes level
    pub fn reset(&mut self) {
        self.state = 0;
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn matrix(&self) -> &PayoffMatrix {
        &self.matrix
    }

    pub fn max_state(&self) -> u32 {
        self.transition.max_state()
    }
}

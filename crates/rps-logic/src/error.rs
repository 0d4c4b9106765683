//! Error taxonomy for the game engine
//!
//! Every variant is a caller error. None of them are retried; a run that
//! hits one stops and hands the error back to whoever drives it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpsError {
    /// Action index outside `[0, actions)`.
    #[error("invalid action {action}: expected an index below {actions}")]
    InvalidAction { action: usize, actions: usize },

    /// State key that was never registered in a Q-table.
    #[error("unknown state {0}: not registered in the Q-table")]
    UnknownState(u32),

    /// Rejected before any simulation component is built.
    #[error("bad configuration: {0}")]
    BadConfiguration(String),

    /// Scaled reward does not fit in an `i32`.
    #[error("reward overflow: payoff {payoff} at stakes level {state}")]
    RewardOverflow { payoff: i32, state: u32 },

    #[error("malformed payoff matrix: {0}")]
    MalformedPayoff(String),
}

/// Convenience Result type for engine operations
pub type Result<T> = std::result::Result<T, RpsError>;

/// Fail with `InvalidAction` unless `action < actions`.
pub(crate) fn check_action(action: usize, actions: usize) -> Result<()> {
    if action < actions {
        Ok(())
    } else {
        Err(RpsError::InvalidAction { action, actions })
    }
}

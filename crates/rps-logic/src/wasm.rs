//! WASM bindings for browser replay of simulations

#![cfg(feature = "wasm")]

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

use crate::{expected_payoffs as payoffs_under, run_simulation, PayoffMatrix, SimulationConfig};

/// Run a simulation with full round-by-round details
///
/// # Arguments
/// * `config_json` - JSON serialized SimulationConfig; missing fields take
///   their defaults, so `{"rounds": 100}` is enough
///
/// # Returns
/// JSON serialized SimulationReport
#[wasm_bindgen]
pub fn replay_simulation(config_json: &str) -> Result<JsValue, JsError> {
    let mut config: SimulationConfig = serde_json::from_str(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    config.record_rounds = true;

    let report = run_simulation(&config)
        .map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Default configuration JSON for a run of `rounds` rounds
#[wasm_bindgen]
pub fn default_config(rounds: u32) -> Result<String, JsError> {
    serde_json::to_string(&SimulationConfig::new(rounds))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

#[derive(serde::Serialize)]
struct AgentInfo {
    id: String,
    name: String,
    description: String,
}

/// Get all available learning rules
#[wasm_bindgen]
pub fn get_agent_types() -> Result<JsValue, JsError> {
    let types = vec![
        AgentInfo {
            id: "FictitiousPlay".to_string(),
            name: "Fictitious Play".to_string(),
            description: "Best-responds to the observed frequency of opponent moves.".to_string(),
        },
        AgentInfo {
            id: "QLearning".to_string(),
            name: "Q-Learning".to_string(),
            description: "Learns action values per stakes level, epsilon-greedy.".to_string(),
        },
    ];

    serde_wasm_bindgen::to_value(&types)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Expected payoff of every row under belief `sigma`
#[wasm_bindgen]
pub fn expected_payoffs(matrix_json: &str, sigma: &[f64]) -> Result<Float64Array, JsError> {
    let matrix: PayoffMatrix = serde_json::from_str(matrix_json)
        .map_err(|e| JsError::new(&format!("Invalid matrix: {}", e)))?;
    if sigma.len() != matrix.size() {
        return Err(JsError::new(&format!(
            "Belief has {} entries, matrix has {} actions",
            sigma.len(),
            matrix.size()
        )));
    }

    let values = payoffs_under(&matrix, sigma);
    Ok(Float64Array::from(values.as_slice()))
}

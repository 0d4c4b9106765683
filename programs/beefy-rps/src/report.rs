//! Human-readable end-of-run summaries

use std::fmt::Write;

use rps_logic::{AgentSummary, Move, SimulationReport};

fn action_label(index: usize) -> String {
    Move::from_index(index)
        .map(|m| m.to_string())
        .unwrap_or_else(|_| format!("#{}", index))
}

fn describe_agent(seat: &str, summary: &AgentSummary) -> String {
    let mut out = String::new();
    match summary {
        AgentSummary::FictitiousPlay { counts, sigma } => {
            let _ = writeln!(out, "Agent {} (fictitious play)", seat);
            let _ = writeln!(out, "  counts: {:?}", counts);
            let _ = writeln!(out, "  sigma:  {:?}", sigma);
        }
        AgentSummary::QLearning { q_table } => {
            let _ = writeln!(out, "Agent {} (q-learning) q_table:", seat);
            for (state, values) in q_table {
                let cells: Vec<String> = values
                    .iter()
                    .enumerate()
                    .map(|(a, v)| format!("{}={:.4}", action_label(a), v))
                    .collect();
                let _ = writeln!(out, "  state {}: {}", state, cells.join(" "));
            }
        }
    }
    out
}

/// Full summary of one run
pub fn describe(report: &SimulationReport) -> String {
    let mut out = String::new();
    out.push_str(&describe_agent("A", &report.player_a));
    out.push_str(&describe_agent("B", &report.player_b));
    let _ = write!(
        out,
        "Rounds: {}  rewards: A {} / B {}  final stakes: {}",
        report.rounds_played, report.total_reward_a, report.total_reward_b, report.final_state
    );
    out
}

/// One line per run plus the mean, for sweeps
pub fn describe_sweep(reports: &[SimulationReport]) -> String {
    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        let _ = writeln!(
            out,
            "run {:>4}: A {:>7}  B {:>7}  final stakes {}",
            i, report.total_reward_a, report.total_reward_b, report.final_state
        );
    }
    let mean = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.total_reward_a as f64).sum::<f64>() / reports.len() as f64
    };
    let _ = write!(out, "mean reward A over {} runs: {:.3}", reports.len(), mean);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> SimulationReport {
        SimulationReport {
            rounds_played: 3,
            total_reward_a: 1,
            total_reward_b: -1,
            final_state: 0,
            player_a: AgentSummary::FictitiousPlay {
                counts: vec![2, 1, 1],
                sigma: vec![0.5, 0.25, 0.25],
            },
            player_b: AgentSummary::QLearning {
                q_table: BTreeMap::from([(0, vec![0.0, 0.5, 0.0])]),
            },
            rounds: Vec::new(),
        }
    }

    #[test]
    fn test_describe_includes_both_agents() {
        let text = describe(&sample());
        assert!(text.contains("counts: [2, 1, 1]"));
        assert!(text.contains("sigma:  [0.5, 0.25, 0.25]"));
        assert!(text.contains("state 0: Rock=0.0000 Paper=0.5000 Scissors=0.0000"));
        assert!(text.contains("rewards: A 1 / B -1"));
    }

    #[test]
    fn test_describe_sweep_mean() {
        let mut other = sample();
        other.total_reward_a = 3;
        other.total_reward_b = -3;
        let text = describe_sweep(&[sample(), other]);
        assert!(text.ends_with("mean reward A over 2 runs: 2.000"));
    }

    #[test]
    fn test_large_action_labels() {
        assert_eq!(action_label(4), "#4");
    }
}

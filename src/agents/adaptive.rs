use crate::constants::{ADAPTIVE_BASE_FRACTION, ADAPTIVE_WARMUP_ROUNDS};
use crate::types::{AgentId, BetDecision};

use super::traits::{AgentState, AgentStrategy};

/// Online-adaptive staking from a growing log of (stake signal, outcome)
/// pairs.
///
/// The first [`ADAPTIVE_WARMUP_ROUNDS`] rounds bet a flat 1% of balance
/// while the log is too short to fit. Afterwards each `decide` refits a
/// closed-form least-squares line of outcome on stake signal over the full
/// log, predicts the outcome for the current signal, and scales the base
/// stake by `1 + prediction`. The log is never truncated.
#[derive(Debug, Clone)]
pub struct AdaptiveLearning {
    state: AgentState,
    target: f64,
    /// (stake signal, 1.0 on win / 0.0 on loss), one entry per round.
    log: Vec<(f64, f64)>,
}

impl AdaptiveLearning {
    pub fn new(id: AgentId, initial_balance: f64, target: f64) -> Self {
        Self {
            state: AgentState::new(id, initial_balance),
            target,
            log: Vec::new(),
        }
    }

    fn stake_signal(&self) -> f64 {
        self.state.balance * ADAPTIVE_BASE_FRACTION
    }

    /// Least-squares prediction of the outcome at `x` over the whole log.
    /// Zero-variance signals degrade to the mean outcome.
    fn predict(&self, x: f64) -> f64 {
        let n = self.log.len() as f64;
        let mean_x = self.log.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = self.log.iter().map(|(_, y)| y).sum::<f64>() / n;

        let var_x = self
            .log
            .iter()
            .map(|(xi, _)| (xi - mean_x).powi(2))
            .sum::<f64>();
        if var_x == 0.0 {
            return mean_y;
        }

        let cov = self
            .log
            .iter()
            .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
            .sum::<f64>();
        let slope = cov / var_x;
        let intercept = mean_y - slope * mean_x;
        intercept + slope * x
    }
}

impl AgentStrategy for AdaptiveLearning {
    fn id(&self) -> AgentId {
        self.state.id
    }

    fn name(&self) -> &str {
        "adaptive"
    }

    fn balance(&self) -> f64 {
        self.state.balance
    }

    fn history(&self) -> &[f64] {
        &self.state.history
    }

    fn decide(&self, _round_hash: &str) -> BetDecision {
        let base = self.stake_signal();
        let amount = if self.log.len() < ADAPTIVE_WARMUP_ROUNDS {
            base
        } else {
            base * (1.0 + self.predict(base))
        };
        BetDecision {
            amount,
            target_multiplier: self.target,
        }
    }

    fn observe(&mut self, payout: f64) {
        self.state.settle(payout);
        let outcome = if payout > 0.0 { 1.0 } else { 0.0 };
        let signal = self.stake_signal();
        self.log.push((signal, outcome));
    }
}

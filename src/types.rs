use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commit-reveal pair published around a round: the hash goes out before the
/// round, the seed after, so any party can re-derive the crash multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    /// Secret seed, revealed after the round resolves.
    pub seed: String,
    /// Lowercase hex SHA-256 digest of the seed bytes.
    pub hash: String,
}

/// One generated round. The multiplier is a pure function of the commitment
/// hash; the commitment is discarded once the multiplier is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub commitment: Commitment,
    pub crash_multiplier: f64,
}

/// A single round's bet: stake and the multiplier the agent tries to reach.
/// Produced fresh every round, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetDecision {
    pub amount: f64,
    pub target_multiplier: f64,
}

/// Stable identifier for an agent within one backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Risk metrics reduced from one agent's balance series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub risk_ratio: f64,
    pub final_balance: f64,
}

#[derive(Debug, Error)]
pub enum SimError {
    /// A strategy returned a non-finite amount or an unreachable target.
    /// This invalidates cross-agent comparison, so the run must abort.
    #[error("invalid decision from {agent}: amount={amount}, target={target}")]
    InvalidDecision {
        agent: AgentId,
        amount: f64,
        target: f64,
    },

    #[error("balance series is empty")]
    EmptySeries,

    #[error("backtest needs at least one round, got 0")]
    NoRounds,
}

use crate::types::{AgentId, BetDecision};

/// Contract all betting strategies implement.
///
/// `decide` must be a pure function of the strategy's own state; the engine
/// calls `observe` exactly once per participated round, after resolution.
/// Bets are proposals: the engine clamps them to the agent's balance and
/// treats non-positive amounts as sitting the round out.
pub trait AgentStrategy: Send {
    fn id(&self) -> AgentId;

    fn name(&self) -> &str;

    fn balance(&self) -> f64;

    /// Realized payouts, one per participated round, in order.
    fn history(&self) -> &[f64];

    /// Propose a stake and target multiplier for the round committed to by
    /// `round_hash`.
    fn decide(&self, round_hash: &str) -> BetDecision;

    /// Apply a realized payout (negative on loss, zero when sitting out).
    fn observe(&mut self, payout: f64);
}

/// The state every strategy owns: identity, balance and payout history.
/// Nothing else is shared between variants.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub id: AgentId,
    pub balance: f64,
    pub history: Vec<f64>,
}

impl AgentState {
    pub fn new(id: AgentId, initial_balance: f64) -> Self {
        Self {
            id,
            balance: initial_balance,
            history: Vec::new(),
        }
    }

    /// Fold one round's payout into the balance and history.
    pub fn settle(&mut self, payout: f64) {
        self.balance += payout;
        self.history.push(payout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_keeps_balance_equal_to_initial_plus_history() {
        let mut state = AgentState::new(AgentId(1), 1000.0);
        for payout in [5.0, -12.5, 0.0, 30.0] {
            state.settle(payout);
        }
        let total: f64 = state.history.iter().sum();
        assert_eq!(state.balance, 1000.0 + total);
        assert_eq!(state.history.len(), 4);
    }
}

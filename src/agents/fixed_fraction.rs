use crate::types::{AgentId, BetDecision};

use super::traits::{AgentState, AgentStrategy};

/// Bets a constant fraction of the current balance at a fixed target.
/// Stateless beyond balance and history.
#[derive(Debug, Clone)]
pub struct FixedFraction {
    state: AgentState,
    fraction: f64,
    target: f64,
}

impl FixedFraction {
    pub fn new(id: AgentId, initial_balance: f64, fraction: f64, target: f64) -> Self {
        Self {
            state: AgentState::new(id, initial_balance),
            fraction,
            target,
        }
    }
}

impl AgentStrategy for FixedFraction {
    fn id(&self) -> AgentId {
        self.state.id
    }

    fn name(&self) -> &str {
        "fixed_fraction"
    }

    fn balance(&self) -> f64 {
        self.state.balance
    }

    fn history(&self) -> &[f64] {
        &self.state.history
    }

    fn decide(&self, _round_hash: &str) -> BetDecision {
        BetDecision {
            amount: self.state.balance * self.fraction,
            target_multiplier: self.target,
        }
    }

    fn observe(&mut self, payout: f64) {
        self.state.settle(payout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bets_fraction_of_current_balance() {
        let agent = FixedFraction::new(AgentId(1), 1000.0, 0.01, 2.0);
        let decision = agent.decide("irrelevant");
        assert_eq!(decision.amount, 10.0);
        assert_eq!(decision.target_multiplier, 2.0);
    }

    #[test]
    fn stake_tracks_balance_after_observe() {
        let mut agent = FixedFraction::new(AgentId(1), 1000.0, 0.1, 2.0);
        agent.observe(-100.0);
        assert_eq!(agent.balance(), 900.0);
        assert_eq!(agent.decide("h").amount, 90.0);
    }
}

use crate::types::{AgentId, BetDecision};

use super::traits::{AgentState, AgentStrategy};

/// Doubles the stake after every loss, resets to the base bet after a win.
///
/// Escalation is unbounded by design; the engine clamps the stake to the
/// available balance.
#[derive(Debug, Clone)]
pub struct Martingale {
    state: AgentState,
    base_bet: f64,
    target: f64,
    current_bet: f64,
}

impl Martingale {
    pub fn new(id: AgentId, initial_balance: f64, base_bet: f64, target: f64) -> Self {
        Self {
            state: AgentState::new(id, initial_balance),
            base_bet,
            target,
            current_bet: base_bet,
        }
    }
}

impl AgentStrategy for Martingale {
    fn id(&self) -> AgentId {
        self.state.id
    }

    fn name(&self) -> &str {
        "martingale"
    }

    fn balance(&self) -> f64 {
        self.state.balance
    }

    fn history(&self) -> &[f64] {
        &self.state.history
    }

    fn decide(&self, _round_hash: &str) -> BetDecision {
        BetDecision {
            amount: self.current_bet,
            target_multiplier: self.target,
        }
    }

    fn observe(&mut self, payout: f64) {
        self.state.settle(payout);
        if payout < 0.0 {
            self.current_bet *= 2.0;
        } else {
            self.current_bet = self.base_bet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_after_each_loss() {
        let mut agent = Martingale::new(AgentId(3), 1000.0, 10.0, 2.0);
        assert_eq!(agent.decide("h").amount, 10.0);

        agent.observe(-10.0);
        assert_eq!(agent.decide("h").amount, 20.0);

        agent.observe(-20.0);
        assert_eq!(agent.decide("h").amount, 40.0);
    }

    #[test]
    fn resets_to_base_after_win() {
        let mut agent = Martingale::new(AgentId(3), 1000.0, 10.0, 2.0);
        agent.observe(-10.0);
        agent.observe(-20.0);
        agent.observe(60.0);
        assert_eq!(agent.decide("h").amount, 10.0);
    }

    #[test]
    fn zero_payout_counts_as_non_loss() {
        let mut agent = Martingale::new(AgentId(3), 1000.0, 10.0, 2.0);
        agent.observe(-10.0);
        agent.observe(0.0);
        assert_eq!(agent.decide("h").amount, 10.0);
    }
}

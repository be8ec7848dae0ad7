use crate::types::{AgentId, BetDecision};

use super::traits::{AgentState, AgentStrategy};

/// Optimal-growth staking: f* = (b·p − 1) / (b − 1) for win probability `p`
/// and payout odds `b`, betting `balance · f*` at target `b`.
///
/// When f* ≤ 0 the proposed amount is non-positive; the engine's clamp turns
/// that into a sit-out. The strategy itself never special-cases it.
#[derive(Debug, Clone)]
pub struct KellyCriterion {
    state: AgentState,
    win_prob: f64,
    odds: f64,
}

impl KellyCriterion {
    pub fn new(id: AgentId, initial_balance: f64, win_prob: f64, odds: f64) -> Self {
        Self {
            state: AgentState::new(id, initial_balance),
            win_prob,
            odds,
        }
    }

    pub fn stake_fraction(&self) -> f64 {
        (self.odds * self.win_prob - 1.0) / (self.odds - 1.0)
    }
}

impl AgentStrategy for KellyCriterion {
    fn id(&self) -> AgentId {
        self.state.id
    }

    fn name(&self) -> &str {
        "kelly"
    }

    fn balance(&self) -> f64 {
        self.state.balance
    }

    fn history(&self) -> &[f64] {
        &self.state.history
    }

    fn decide(&self, _round_hash: &str) -> BetDecision {
        BetDecision {
            amount: self.state.balance * self.stake_fraction(),
            target_multiplier: self.odds,
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
    fn even_odds_coin_flip_has_zero_edge() {
        let agent = KellyCriterion::new(AgentId(2), 1000.0, 0.5, 2.0);
        assert_eq!(agent.stake_fraction(), 0.0);
        assert_eq!(agent.decide("h").amount, 0.0);
    }

    #[test]
    fn positive_edge_scales_with_balance() {
        // p=0.6, b=2 -> f* = 0.2
        let agent = KellyCriterion::new(AgentId(2), 500.0, 0.6, 2.0);
        let decision = agent.decide("h");
        assert!((decision.amount - 100.0).abs() < 1e-9);
        assert_eq!(decision.target_multiplier, 2.0);
    }

    #[test]
    fn negative_edge_proposes_negative_stake() {
        let agent = KellyCriterion::new(AgentId(2), 1000.0, 0.4, 2.0);
        assert!(agent.decide("h").amount < 0.0);
    }
}

//! Bet limits and the simulation disclaimer.
//!
//! Constructed once at process start from [`SafetyConfig`](crate::config::SafetyConfig)
//! and passed by reference to whatever layer takes bets. There is no ambient
//! global instance.

use tracing::{info, warn};

pub const DISCLAIMER: &str = "\
DISCLAIMER: educational simulation only. Do not use for real gambling.\n\
No real money is involved; results are for research purposes.";

#[derive(Debug)]
pub struct SafetyManager {
    max_bet_fraction: f64,
    max_daily_loss: f64,
    daily_loss: f64,
}

impl SafetyManager {
    pub fn new(max_bet_fraction: f64, max_daily_loss: f64) -> Self {
        Self {
            max_bet_fraction,
            max_daily_loss,
            daily_loss: 0.0,
        }
    }

    /// Would this bet violate the per-bet fraction or daily loss limits?
    pub fn check_bet(&self, balance: f64, amount: f64) -> bool {
        if amount > balance * self.max_bet_fraction {
            warn!(amount, balance, "bet exceeds max fraction of balance");
            return false;
        }
        if self.daily_loss + amount > self.max_daily_loss {
            warn!(amount, daily_loss = self.daily_loss, "bet would exceed daily loss limit");
            return false;
        }
        true
    }

    /// Record a settled bet; losses accumulate toward the daily limit.
    pub fn record_outcome(&mut self, user_id: u64, amount: f64, payout: f64) {
        info!(user_id, amount, payout, "bet settled");
        if payout < 0.0 {
            self.daily_loss += payout.abs();
        }
    }

    pub fn daily_loss(&self) -> f64 {
        self.daily_loss
    }

    pub fn reset_daily_loss(&mut self) {
        self.daily_loss = 0.0;
        info!("daily loss counter reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bet_above_fraction_limit() {
        let mgr = SafetyManager::new(0.1, 500.0);
        assert!(mgr.check_bet(1000.0, 100.0));
        assert!(!mgr.check_bet(1000.0, 100.01));
    }

    #[test]
    fn losses_accumulate_toward_daily_limit() {
        let mut mgr = SafetyManager::new(1.0, 100.0);
        mgr.record_outcome(1, 60.0, -60.0);
        assert_eq!(mgr.daily_loss(), 60.0);
        assert!(mgr.check_bet(10_000.0, 40.0));
        assert!(!mgr.check_bet(10_000.0, 40.01));
    }

    #[test]
    fn wins_do_not_reduce_daily_loss() {
        let mut mgr = SafetyManager::new(1.0, 100.0);
        mgr.record_outcome(1, 50.0, -50.0);
        mgr.record_outcome(1, 50.0, 75.0);
        assert_eq!(mgr.daily_loss(), 50.0);
    }

    #[test]
    fn reset_clears_the_counter() {
        let mut mgr = SafetyManager::new(1.0, 100.0);
        mgr.record_outcome(1, 90.0, -90.0);
        mgr.reset_daily_loss();
        assert_eq!(mgr.daily_loss(), 0.0);
        assert!(mgr.check_bet(10_000.0, 100.0));
    }
}

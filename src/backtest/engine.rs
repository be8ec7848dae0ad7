use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use uuid::Uuid;

use crate::agents::AgentStrategy;
use crate::entropy::EntropySource;
use crate::round::RoundGenerator;
use crate::types::{AgentId, MetricsReport, Round, SimError};

use super::performance::MetricsCalculator;

/// Drives N independent rounds against a roster of agents.
///
/// Every agent in a round decides against the same crash multiplier without
/// seeing the others' decisions, in stable roster order. All randomness
/// (round seeds, cash-out draws) comes from the injected entropy source, so
/// a seeded source makes the whole run reproducible.
pub struct BacktestEngine {
    id: Uuid,
    entropy: Box<dyn EntropySource>,
    metrics: MetricsCalculator,
}

/// Outcome of one backtest run.
#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub id: Uuid,
    pub rounds: u32,
    /// Per-agent balance snapshots, one per round, in roster order of ids.
    pub series: BTreeMap<AgentId, Vec<f64>>,
    pub metrics: BTreeMap<AgentId, MetricsReport>,
    pub execution_time: Duration,
}

impl BacktestEngine {
    pub fn new(entropy: Box<dyn EntropySource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            entropy,
            metrics: MetricsCalculator::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run `num_rounds` rounds, mutating the agents in place.
    ///
    /// A strategy returning a non-finite stake or an unreachable target
    /// aborts the whole run: a broken strategy invalidates comparability
    /// with the rest of the roster.
    pub fn run(
        &mut self,
        agents: &mut [Box<dyn AgentStrategy>],
        num_rounds: u32,
    ) -> Result<BacktestReport, SimError> {
        if num_rounds == 0 {
            return Err(SimError::NoRounds);
        }

        let started = Instant::now();
        info!(run_id = %self.id, rounds = num_rounds, agents = agents.len(), "backtest started");

        let mut series: BTreeMap<AgentId, Vec<f64>> = agents
            .iter()
            .map(|a| (a.id(), Vec::with_capacity(num_rounds as usize)))
            .collect();

        for round_num in 0..num_rounds {
            let round = RoundGenerator::new(self.entropy.as_mut()).round();
            debug!(
                round = round_num,
                crash = round.crash_multiplier,
                hash = %round.commitment.hash,
                "round generated"
            );
            self.play_round(agents, &round, &mut series)?;
        }

        let mut metrics = BTreeMap::new();
        for (id, balances) in &series {
            metrics.insert(*id, self.metrics.compute(balances)?);
        }

        let execution_time = started.elapsed();
        info!(run_id = %self.id, elapsed_ms = execution_time.as_millis() as u64, "backtest finished");

        Ok(BacktestReport {
            id: self.id,
            rounds: num_rounds,
            series,
            metrics,
            execution_time,
        })
    }

    /// Resolve one round for every agent against the same multiplier.
    fn play_round(
        &mut self,
        agents: &mut [Box<dyn AgentStrategy>],
        round: &Round,
        series: &mut BTreeMap<AgentId, Vec<f64>>,
    ) -> Result<(), SimError> {
        for agent in agents.iter_mut() {
            let decision = agent.decide(&round.commitment.hash);

            if !decision.amount.is_finite()
                || !decision.target_multiplier.is_finite()
                || decision.target_multiplier < 1.0
            {
                return Err(SimError::InvalidDecision {
                    agent: agent.id(),
                    amount: decision.amount,
                    target: decision.target_multiplier,
                });
            }

            // Negative stakes (e.g. Kelly with no edge) and stakes above the
            // balance are normal-path clamps, not errors.
            let amount = decision.amount.max(0.0).min(agent.balance());

            let payout = if amount <= 0.0 {
                0.0
            } else {
                // The agent attempts to cash out at an unknown point before
                // or at the crash.
                let cash_out =
                    1.0 + self.entropy.uniform() * (round.crash_multiplier - 1.0);
                if cash_out <= decision.target_multiplier {
                    amount * cash_out - amount
                } else {
                    -amount
                }
            };

            agent.observe(payout);
            series
                .entry(agent.id())
                .or_default()
                .push(agent.balance());
        }
        Ok(())
    }
}
